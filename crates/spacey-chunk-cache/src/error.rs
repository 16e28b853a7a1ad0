// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Error types for the chunk cache

use std::path::PathBuf;
use thiserror::Error;

use crate::chunk::ChunkId;

/// Result type for chunk cache operations
pub type Result<T> = std::result::Result<T, CacheError>;

/// Errors raised by the chunk cache and its collaborators
#[derive(Debug, Error)]
pub enum CacheError {
    /// The store could not report a fingerprint for a chunk being compiled
    #[error("Cannot read fingerprint of chunk '{chunk}': {reason}")]
    FingerprintUnavailable {
        /// Chunk whose fingerprint was requested
        chunk: ChunkId,
        /// Underlying failure
        reason: String,
    },

    /// The store has no chunk with this id
    #[error("Unknown chunk '{0}'")]
    ChunkNotFound(ChunkId),

    /// The chunk's bytes could not be read
    #[error("Failed to load chunk '{chunk}': {source}")]
    Load {
        /// Chunk being loaded
        chunk: ChunkId,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The evaluator rejected the chunk
    #[error("Failed to evaluate chunk '{chunk}': {reason}")]
    Evaluate {
        /// Chunk being evaluated
        chunk: ChunkId,
        /// Evaluator's message
        reason: String,
    },

    /// The store could not answer a batched query
    #[error("Chunk store error: {0}")]
    Store(String),

    /// The cross-process lock could not be taken
    #[error("Failed to lock '{path}': {source}")]
    Lock {
        /// Lock file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A blocking task panicked or was cancelled
    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl CacheError {
    /// Create an evaluation error
    pub fn evaluate(chunk: &ChunkId, reason: impl Into<String>) -> Self {
        Self::Evaluate {
            chunk: chunk.clone(),
            reason: reason.into(),
        }
    }
}
