// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Mutual exclusion around chunk store reads
//!
//! Acquiring a [`ChunkLock`] yields a guard; dropping the guard releases the
//! lock, so every exit path (including errors and panics) unlocks.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use fs2::FileExt;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, warn};

use crate::error::{CacheError, Result};

/// Lock collaborator guarding the physical chunk store
#[async_trait]
pub trait ChunkLock: Send + Sync {
    /// Held lock; released on drop
    type Guard: Send;

    /// Wait until the lock is held
    async fn acquire(&self) -> Result<Self::Guard>;
}

/// Exclusive advisory lock on a file, shared with other processes
#[derive(Debug, Clone)]
pub struct FileLock {
    path: PathBuf,
}

impl FileLock {
    /// Lock on `path`; the file is created on first acquisition
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Lock file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Held [`FileLock`]
#[derive(Debug)]
pub struct FileLockGuard {
    file: File,
    path: PathBuf,
}

impl Drop for FileLockGuard {
    fn drop(&mut self) {
        match FileExt::unlock(&self.file) {
            Ok(()) => debug!("Released lock {}", self.path.display()),
            Err(e) => warn!("Failed to release lock {}: {}", self.path.display(), e),
        }
    }
}

fn lock_file(path: PathBuf) -> Result<FileLockGuard> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(&path)
        .map_err(|source| CacheError::Lock {
            path: path.clone(),
            source,
        })?;
    FileExt::lock_exclusive(&file).map_err(|source| CacheError::Lock {
        path: path.clone(),
        source,
    })?;
    debug!("Acquired lock {}", path.display());
    Ok(FileLockGuard { file, path })
}

#[async_trait]
impl ChunkLock for FileLock {
    type Guard = FileLockGuard;

    async fn acquire(&self) -> Result<FileLockGuard> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || lock_file(path)).await?
    }
}

/// In-process lock for stores no other process writes to
#[derive(Debug, Clone, Default)]
pub struct LocalLock {
    inner: Arc<Mutex<()>>,
}

impl LocalLock {
    /// Create an unlocked lock
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChunkLock for LocalLock {
    type Guard = OwnedMutexGuard<()>;

    async fn acquire(&self) -> Result<OwnedMutexGuard<()>> {
        Ok(Arc::clone(&self.inner).lock_owned().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_file_lock_is_exclusive() {
        let dir = tempdir().unwrap();
        let lock = FileLock::new(dir.path().join("locks/chunks.lock"));

        let guard = lock.acquire().await.unwrap();
        assert!(lock.path().exists());

        let contender = FileLock::new(lock.path());
        let blocked = tokio::time::timeout(Duration::from_millis(100), contender.acquire()).await;
        assert!(blocked.is_err());

        drop(guard);
        let reacquired = tokio::time::timeout(Duration::from_secs(5), contender.acquire()).await;
        assert!(reacquired.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_local_lock_releases_on_drop() {
        let lock = LocalLock::new();
        let guard = lock.acquire().await.unwrap();
        assert!(lock.inner.try_lock().is_err());
        drop(guard);
        assert!(lock.inner.try_lock().is_ok());
    }
}
