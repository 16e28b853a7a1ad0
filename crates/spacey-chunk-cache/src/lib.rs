// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! # spacey-chunk-cache
//!
//! Incremental cache of compiled module chunks for the spacey-pack bundler.
//!
//! Chunks are identified by a [`ChunkId`] and fingerprinted by the store
//! they live in. The [`CacheCoordinator`] compiles chunks on demand and, on
//! [`reload`](CacheCoordinator::reload), drops every entry whose fingerprint
//! moved. All store reads happen under a [`ChunkLock`] because another
//! process may be rewriting the store at the same time.
//!
//! ```rust,ignore
//! use spacey_chunk_cache::{CacheCoordinator, FileLock, FsChunkStore};
//!
//! let store = FsChunkStore::new();
//! store.scan(Path::new("build/chunks"), "project:/")?;
//! let coordinator = CacheCoordinator::new(store, FileLock::new("build/.lock"));
//! let module = coordinator.get_or_compile(&"project:/main.js".into(), &evaluator).await?;
//! let report = coordinator.reload().await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache;
pub mod chunk;
pub mod coordinator;
pub mod error;
pub mod lock;
pub mod store;

pub use cache::ChunkCache;
pub use chunk::{ChunkId, Fingerprint};
pub use coordinator::{CacheCoordinator, ChunkEvaluator, ReloadReport};
pub use error::{CacheError, Result};
pub use lock::{ChunkLock, FileLock, FileLockGuard, LocalLock};
pub use store::{ChunkStore, FsChunkStore};
