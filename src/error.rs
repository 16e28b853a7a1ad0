// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Error types for spacey-pack.

use spacey_chunk_cache::CacheError;
use spacey_import_map::ImportMapError;
use thiserror::Error;

/// Result type for spacey-pack operations.
pub type Result<T> = std::result::Result<T, PackError>;

/// Main error type for spacey-pack.
#[derive(Error, Debug)]
pub enum PackError {
    /// Import map parsing or resolution failed
    #[error(transparent)]
    ImportMap(#[from] ImportMapError),

    /// Chunk cache failure
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed configuration file
    #[error("Invalid configuration file: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A URL given on the command line did not parse
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    /// Some specifiers failed to resolve
    #[error("{0} specifier(s) failed to resolve")]
    Unresolved(usize),
}
