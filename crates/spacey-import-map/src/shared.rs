// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Publication cell for the active import map
//!
//! Readers take an `Arc` snapshot and resolve against it without holding any
//! lock. Writers publish a complete new map; a published map is never
//! modified afterwards.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;
use url::Url;

use crate::error::Result;
use crate::map::ImportMap;
use crate::resolver::{ResolveOptions, resolve_specifier};

/// Thread-safe holder of the current import map
pub struct SharedImportMap {
    current: RwLock<Arc<ImportMap>>,
    options: ResolveOptions,
}

impl SharedImportMap {
    /// Create a cell holding `map`
    pub fn new(map: ImportMap, options: ResolveOptions) -> Self {
        Self {
            current: RwLock::new(Arc::new(map)),
            options,
        }
    }

    /// The map currently published
    pub fn snapshot(&self) -> Arc<ImportMap> {
        self.current.read().clone()
    }

    /// Replace the published map
    pub fn publish(&self, map: ImportMap) {
        debug!(
            "Publishing import map with {} imports and {} scopes",
            map.imports().len(),
            map.scopes().len()
        );
        *self.current.write() = Arc::new(map);
    }

    /// Merge `partial` into the current map and publish the result
    pub fn publish_merged(&self, partial: &ImportMap) {
        let mut current = self.current.write();
        let merged = current.merge(partial);
        *current = Arc::new(merged);
    }

    /// Resolve against the current snapshot
    pub fn resolve(&self, specifier: &str, parent: &Url) -> Result<Option<Url>> {
        resolve_specifier(specifier, parent, &self.snapshot(), self.options)
    }
}

impl Default for SharedImportMap {
    fn default() -> Self {
        Self::new(ImportMap::default(), ResolveOptions::default())
    }
}
