// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Chunk registration cache
//!
//! Only the [`CacheCoordinator`](crate::CacheCoordinator) inserts or evicts
//! entries; everyone else gets read access.
//!
//! ```compile_fail
//! use spacey_chunk_cache::{ChunkCache, ChunkId, Fingerprint};
//!
//! let cache: ChunkCache<()> = ChunkCache::new();
//! cache.put(ChunkId::from("a"), Fingerprint::new(1), ());
//! ```

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::chunk::{ChunkId, Fingerprint};

/// Cached chunk. Entries are replaced wholesale, never patched.
struct CacheEntry<R> {
    fingerprint: Fingerprint,
    registration: Arc<R>,
}

/// Thread-safe map from chunk id to its last compiled registration
pub struct ChunkCache<R> {
    entries: DashMap<ChunkId, CacheEntry<R>>,
}

impl<R> ChunkCache<R> {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Cached registration, or `None` on a miss
    pub fn get(&self, chunk: &ChunkId) -> Option<Arc<R>> {
        self.entries
            .get(chunk)
            .map(|entry| Arc::clone(&entry.registration))
    }

    /// Stored fingerprint of a cached chunk
    pub fn fingerprint(&self, chunk: &ChunkId) -> Option<Fingerprint> {
        self.entries.get(chunk).map(|entry| entry.fingerprint)
    }

    /// Insert or replace a chunk's entry
    pub(crate) fn put(&self, chunk: ChunkId, fingerprint: Fingerprint, registration: R) -> Arc<R> {
        let registration = Arc::new(registration);
        let entry = CacheEntry {
            fingerprint,
            registration: Arc::clone(&registration),
        };
        self.entries.insert(chunk, entry);
        registration
    }

    /// Check if a chunk is cached
    pub fn contains(&self, chunk: &ChunkId) -> bool {
        self.entries.contains_key(chunk)
    }

    /// Remove a chunk only if it is still cached with `fingerprint`.
    ///
    /// An entry replaced since `fingerprint` was read is left alone.
    pub(crate) fn evict_if_unchanged(&self, chunk: &ChunkId, fingerprint: Fingerprint) -> bool {
        self.entries
            .remove_if(chunk, |_, entry| entry.fingerprint == fingerprint)
            .is_some()
    }

    /// Ids and fingerprints of every cached chunk, ordered by id
    pub fn snapshot(&self) -> Vec<(ChunkId, Fingerprint)> {
        let mut snapshot: Vec<_> = self
            .entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.fingerprint))
            .collect();
        snapshot.sort();
        snapshot
    }

    /// Evict every entry in `checked` whose current fingerprint differs.
    ///
    /// `current[i]` is the store's answer for `checked[i]`; `None` or a
    /// missing answer means the store no longer reports the chunk.
    pub(crate) fn evict_stale(
        &self,
        checked: &[(ChunkId, Fingerprint)],
        current: &[Option<Fingerprint>],
    ) -> Vec<ChunkId> {
        let mut evicted = Vec::new();
        for (index, (chunk, stored)) in checked.iter().enumerate() {
            let now = current.get(index).copied().flatten();
            if now == Some(*stored) {
                continue;
            }
            if self.evict_if_unchanged(chunk, *stored) {
                debug!(
                    "Evicted chunk '{}' (cached {}, now {})",
                    chunk,
                    stored,
                    now.map_or_else(|| "missing".to_string(), |f| f.to_string())
                );
                evicted.push(chunk.clone());
            }
        }
        evicted
    }

    /// Number of cached chunks
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<R> Default for ChunkCache<R> {
    fn default() -> Self {
        Self::new()
    }
}
