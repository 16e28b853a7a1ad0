// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Physical chunk store
//!
//! The store knows where each chunk's bytes live and reports their current
//! fingerprints. It may be rewritten by another process at any time, so
//! callers hold the chunk lock while reading from it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::fs;
use tracing::debug;
use walkdir::WalkDir;

use crate::chunk::{ChunkId, Fingerprint};
use crate::error::{CacheError, Result};

/// Source of chunk bytes and fingerprints
#[async_trait]
pub trait ChunkStore: Send + Sync {
    /// Current fingerprint of one chunk
    async fn query_fingerprint(&self, chunk: &ChunkId) -> Result<Fingerprint>;

    /// Current fingerprints of many chunks in one round trip.
    ///
    /// The answer is positional. `None` means the store does not report that
    /// chunk, either because it is gone or because reading it failed.
    async fn query_fingerprints(&self, chunks: &[ChunkId]) -> Result<Vec<Option<Fingerprint>>>;

    /// Chunk contents
    async fn load(&self, chunk: &ChunkId) -> Result<Vec<u8>>;
}

/// Chunk store backed by files on disk, fingerprinted by modification time
#[derive(Clone, Default)]
pub struct FsChunkStore {
    paths: Arc<DashMap<ChunkId, PathBuf>>,
}

impl FsChunkStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a chunk id to a file
    pub fn register(&self, chunk: ChunkId, path: impl Into<PathBuf>) {
        self.paths.insert(chunk, path.into());
    }

    /// File registered for a chunk
    pub fn path(&self, chunk: &ChunkId) -> Option<PathBuf> {
        self.paths.get(chunk).map(|path| path.clone())
    }

    /// Number of registered chunks
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Check if no chunk is registered
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Register every file under `dir` as `<prefix><relative path>`.
    ///
    /// Relative paths always use `/`. Dotfiles (such as a lock file kept in
    /// the same directory) are skipped. Returns the registered ids, sorted.
    pub fn scan(&self, dir: &Path, prefix: &str) -> Result<Vec<ChunkId>> {
        let mut registered = Vec::new();

        for entry in WalkDir::new(dir).follow_links(true) {
            let entry = entry.map_err(|e| CacheError::Store(e.to_string()))?;
            let hidden = entry.file_name().to_string_lossy().starts_with('.');
            if !entry.file_type().is_file() || hidden {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(dir) else {
                continue;
            };
            let relative: Vec<_> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            let chunk = ChunkId::new(format!("{}{}", prefix, relative.join("/")));
            self.register(chunk.clone(), entry.path());
            registered.push(chunk);
        }

        registered.sort();
        debug!("Registered {} chunks from {}", registered.len(), dir.display());
        Ok(registered)
    }

    fn require_path(&self, chunk: &ChunkId) -> Result<PathBuf> {
        self.path(chunk)
            .ok_or_else(|| CacheError::ChunkNotFound(chunk.clone()))
    }
}

fn modified(path: &Path) -> std::io::Result<Fingerprint> {
    let modified = std::fs::metadata(path)?.modified()?;
    Ok(Fingerprint::from_system_time(modified))
}

#[async_trait]
impl ChunkStore for FsChunkStore {
    async fn query_fingerprint(&self, chunk: &ChunkId) -> Result<Fingerprint> {
        let path = self.require_path(chunk)?;
        let metadata = fs::metadata(&path)
            .await
            .map_err(|e| CacheError::FingerprintUnavailable {
                chunk: chunk.clone(),
                reason: e.to_string(),
            })?;
        let modified = metadata
            .modified()
            .map_err(|e| CacheError::FingerprintUnavailable {
                chunk: chunk.clone(),
                reason: e.to_string(),
            })?;
        Ok(Fingerprint::from_system_time(modified))
    }

    async fn query_fingerprints(&self, chunks: &[ChunkId]) -> Result<Vec<Option<Fingerprint>>> {
        let paths: Vec<Option<PathBuf>> = chunks.iter().map(|chunk| self.path(chunk)).collect();

        let fingerprints = tokio::task::spawn_blocking(move || {
            paths
                .iter()
                .map(|path| path.as_deref().and_then(|p| modified(p).ok()))
                .collect::<Vec<_>>()
        })
        .await?;

        Ok(fingerprints)
    }

    async fn load(&self, chunk: &ChunkId) -> Result<Vec<u8>> {
        let path = self.require_path(chunk)?;
        fs::read(&path).await.map_err(|source| CacheError::Load {
            chunk: chunk.clone(),
            source,
        })
    }
}
