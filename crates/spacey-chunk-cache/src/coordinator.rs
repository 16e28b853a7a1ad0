// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Cache coordination
//!
//! The coordinator owns the [`ChunkCache`] and is its only mutator. Every
//! store read that decides what the cache holds happens under the
//! [`ChunkLock`]:
//!
//! - `get_or_compile` reads a missing chunk's fingerprint and bytes under the
//!   lock, then evaluates and caches it.
//! - `reload` re-queries the fingerprints of all cached chunks in one batch
//!   and evicts every entry whose fingerprint moved.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::cache::ChunkCache;
use crate::chunk::ChunkId;
use crate::error::Result;
use crate::lock::ChunkLock;
use crate::store::ChunkStore;

/// Turns a chunk's bytes into its module registration
#[async_trait]
pub trait ChunkEvaluator<R>: Send + Sync {
    /// Compile one chunk
    async fn evaluate(&self, chunk: &ChunkId, source: Vec<u8>) -> Result<R>;
}

/// Outcome of a [`CacheCoordinator::reload`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReloadReport {
    /// Number of cached chunks whose fingerprints were checked
    pub checked: usize,
    /// Chunks removed from the cache, ordered by id
    pub evicted: Vec<ChunkId>,
}

/// Keeps a [`ChunkCache`] coherent with a shared [`ChunkStore`]
pub struct CacheCoordinator<R, S, L> {
    cache: ChunkCache<R>,
    store: S,
    lock: L,
    reload_gate: Mutex<()>,
}

impl<R, S, L> CacheCoordinator<R, S, L>
where
    R: Send + Sync + 'static,
    S: ChunkStore,
    L: ChunkLock,
{
    /// Create a coordinator with an empty cache
    pub fn new(store: S, lock: L) -> Self {
        Self {
            cache: ChunkCache::new(),
            store,
            lock,
            reload_gate: Mutex::new(()),
        }
    }

    /// Read access to the cache
    pub fn cache(&self) -> &ChunkCache<R> {
        &self.cache
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Take the store lock; dropping the guard unlocks
    pub async fn lock(&self) -> Result<L::Guard> {
        self.lock.acquire().await
    }

    /// Cached registration, or `None` on a miss
    pub fn get(&self, chunk: &ChunkId) -> Option<Arc<R>> {
        self.cache.get(chunk)
    }

    /// Cached registration, compiling the chunk on a miss.
    ///
    /// A fingerprint or load failure is returned and nothing is cached.
    pub async fn get_or_compile<E>(&self, chunk: &ChunkId, evaluator: &E) -> Result<Arc<R>>
    where
        E: ChunkEvaluator<R> + ?Sized,
    {
        if let Some(registration) = self.cache.get(chunk) {
            debug!("Chunk cache hit: {}", chunk);
            return Ok(registration);
        }

        let (fingerprint, source) = {
            let _guard = self.lock.acquire().await?;
            let fingerprint = self.store.query_fingerprint(chunk).await?;
            let source = self.store.load(chunk).await?;
            (fingerprint, source)
        };

        debug!("Compiling chunk {} ({} bytes)", chunk, source.len());
        let registration = evaluator.evaluate(chunk, source).await?;
        Ok(self.cache.put(chunk.clone(), fingerprint, registration))
    }

    /// Evict every cached chunk whose fingerprint changed in the store.
    ///
    /// Chunks the store no longer reports are evicted too. If the batched
    /// query itself fails, every checked chunk is evicted and the error is
    /// returned.
    pub async fn reload(&self) -> Result<ReloadReport> {
        let _gate = self.reload_gate.lock().await;

        let checked = self.cache.snapshot();
        if checked.is_empty() {
            return Ok(ReloadReport::default());
        }
        let chunks: Vec<ChunkId> = checked.iter().map(|(chunk, _)| chunk.clone()).collect();

        let guard = self.lock.acquire().await?;
        let current = match self.store.query_fingerprints(&chunks).await {
            Ok(current) => current,
            Err(e) => {
                drop(guard);
                warn!(
                    "Fingerprint query failed, evicting {} chunks: {}",
                    checked.len(),
                    e
                );
                for (chunk, fingerprint) in &checked {
                    self.cache.evict_if_unchanged(chunk, *fingerprint);
                }
                return Err(e);
            }
        };
        drop(guard);

        let evicted = self.cache.evict_stale(&checked, &current);
        info!(
            "Reloaded chunk cache: {} checked, {} evicted",
            checked.len(),
            evicted.len()
        );

        Ok(ReloadReport {
            checked: checked.len(),
            evicted,
        })
    }
}
