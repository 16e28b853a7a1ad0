// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Error and diagnostic types for import map handling

use thiserror::Error;

/// Result type for import map operations
pub type Result<T> = std::result::Result<T, ImportMapError>;

/// Errors raised while parsing an import map or resolving against one
#[derive(Debug, Error)]
pub enum ImportMapError {
    /// The document's top-level value is not a JSON object
    #[error("Import map must be a JSON object")]
    NotAnObject,

    /// `imports` is present but is not a JSON object
    #[error("Import map \"imports\" must be a JSON object")]
    ImportsNotAnObject,

    /// `scopes` is present but is not a JSON object
    #[error("Import map \"scopes\" must be a JSON object")]
    ScopesNotAnObject,

    /// A value inside `scopes` is not a JSON object
    #[error("Import map scope '{scope}' must map to a JSON object")]
    ScopeNotAnObject {
        /// Scope prefix as written in the document
        scope: String,
    },

    /// The document is not valid JSON
    #[error("Import map is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The URL an import map is resolved against could not be formed
    #[error("Invalid import map base URL '{0}'")]
    InvalidBaseUrl(String),

    /// The import map file could not be read
    #[error("Failed to read import map: {0}")]
    Io(#[from] std::io::Error),

    /// The specifier matched an entry that is deliberately unresolved
    #[error("Import '{specifier}' matched '{key}', which is mapped to null")]
    NullEntry {
        /// Specifier being resolved
        specifier: String,
        /// Map key that matched
        key: String,
    },

    /// The remainder after a prefix match could not be resolved
    #[error(
        "Import '{specifier}' matched '{key}', but '{remainder}' cannot be resolved against '{base}'"
    )]
    ImportMatch {
        /// Specifier being resolved
        specifier: String,
        /// Map key that matched
        key: String,
        /// Text after the matched prefix
        remainder: String,
        /// Address the remainder was resolved against
        base: String,
    },

    /// The remainder after a prefix match escapes the mapped address
    #[error(
        "Import '{specifier}' matched '{key}', but resolves to '{resolved}' outside of '{base}'"
    )]
    BackTracking {
        /// Specifier being resolved
        specifier: String,
        /// Map key that matched
        key: String,
        /// URL the remainder resolved to
        resolved: String,
        /// Address the result had to stay under
        base: String,
    },
}

impl ImportMapError {
    /// Whether this error comes from the document's shape rather than from a resolution
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::NotAnObject
                | Self::ImportsNotAnObject
                | Self::ScopesNotAnObject
                | Self::ScopeNotAnObject { .. }
                | Self::InvalidJson(_)
                | Self::InvalidBaseUrl(_)
        )
    }

    /// Whether this error is one of the resolution failures
    pub fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            Self::NullEntry { .. } | Self::ImportMatch { .. } | Self::BackTracking { .. }
        )
    }
}

/// Recoverable problems found while normalizing an import map.
///
/// Warnings never abort parsing. The offending entry is either dropped or
/// kept as a tombstone.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseWarning {
    /// A specifier key was the empty string and was dropped
    #[error("Invalid empty string specifier key")]
    EmptyKey,

    /// An address was not a string; the key is kept as a tombstone
    #[error("Invalid address {value} for specifier key '{key}': addresses must be strings")]
    NonStringAddress {
        /// Specifier key
        key: String,
        /// JSON rendering of the offending value
        value: String,
    },

    /// An address could not be parsed as a URL; the key is kept as a tombstone
    #[error("Invalid address '{address}' for specifier key '{key}'")]
    InvalidAddress {
        /// Specifier key
        key: String,
        /// Address as written
        address: String,
    },

    /// A trailing-slash key mapped to an address without a trailing slash
    #[error(
        "Invalid address '{address}' for package specifier key '{key}': package addresses must end with '/'"
    )]
    TrailingSlashMismatch {
        /// Specifier key
        key: String,
        /// Normalized address
        address: String,
    },

    /// A top-level key other than `imports` and `scopes`
    #[error("Invalid top-level key '{0}': only \"imports\" and \"scopes\" are allowed")]
    UnknownTopLevelKey(String),
}
