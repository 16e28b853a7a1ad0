// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Coordinator over a real directory of chunks

use std::fs::File;
use std::path::Path;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use spacey_chunk_cache::{
    CacheCoordinator, CacheError, ChunkEvaluator, ChunkId, ChunkLock, FileLock, FsChunkStore,
    Result,
};
use tempfile::tempdir;

struct Utf8Evaluator;

#[async_trait]
impl ChunkEvaluator<String> for Utf8Evaluator {
    async fn evaluate(&self, chunk: &ChunkId, source: Vec<u8>) -> Result<String> {
        String::from_utf8(source).map_err(|e| CacheError::evaluate(chunk, e.to_string()))
    }
}

fn write_chunk(path: &Path, contents: &str, modified: SystemTime) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
    File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(modified)
        .unwrap();
}

fn at(secs: u64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000 + secs)
}

#[tokio::test]
async fn test_reload_tracks_file_changes() {
    let dir = tempdir().unwrap();
    let chunks = dir.path().join("chunks");
    write_chunk(&chunks.join("main.js"), "register(main)", at(0));
    write_chunk(&chunks.join("lib/util.js"), "register(util)", at(0));

    let store = FsChunkStore::new();
    let ids = store.scan(&chunks, "project:/").unwrap();
    assert_eq!(ids.len(), 2);

    let coordinator: CacheCoordinator<String, _, _> =
        CacheCoordinator::new(store, FileLock::new(dir.path().join(".spacey-pack.lock")));
    for chunk in &ids {
        coordinator.get_or_compile(chunk, &Utf8Evaluator).await.unwrap();
    }

    let unchanged = coordinator.reload().await.unwrap();
    assert_eq!(unchanged.checked, 2);
    assert!(unchanged.evicted.is_empty());

    write_chunk(&chunks.join("lib/util.js"), "register(util2)", at(60));
    let changed = coordinator.reload().await.unwrap();
    assert_eq!(changed.evicted, vec![ChunkId::from("project:/lib/util.js")]);
    assert!(coordinator.get(&ChunkId::from("project:/main.js")).is_some());

    let util = coordinator
        .get_or_compile(&ChunkId::from("project:/lib/util.js"), &Utf8Evaluator)
        .await
        .unwrap();
    assert_eq!(*util, "register(util2)");
}

#[tokio::test]
async fn test_deleted_file_is_evicted() {
    let dir = tempdir().unwrap();
    let chunk_path = dir.path().join("a.js");
    write_chunk(&chunk_path, "register(a)", at(0));

    let store = FsChunkStore::new();
    store.register(ChunkId::from("a"), &chunk_path);
    let coordinator: CacheCoordinator<String, _, _> =
        CacheCoordinator::new(store, FileLock::new(dir.path().join("lock")));
    coordinator
        .get_or_compile(&ChunkId::from("a"), &Utf8Evaluator)
        .await
        .unwrap();

    std::fs::remove_file(&chunk_path).unwrap();
    let report = coordinator.reload().await.unwrap();
    assert_eq!(report.evicted, vec![ChunkId::from("a")]);

    let err = coordinator
        .get_or_compile(&ChunkId::from("a"), &Utf8Evaluator)
        .await
        .unwrap_err();
    assert!(matches!(err, CacheError::FingerprintUnavailable { .. }));
    assert!(coordinator.cache().is_empty());
}

#[tokio::test]
async fn test_lock_is_free_after_operations() {
    let dir = tempdir().unwrap();
    let lock_path = dir.path().join("lock");
    let coordinator: CacheCoordinator<String, _, _> =
        CacheCoordinator::new(FsChunkStore::new(), FileLock::new(&lock_path));

    let err = coordinator
        .get_or_compile(&ChunkId::from("missing"), &Utf8Evaluator)
        .await
        .unwrap_err();
    assert!(matches!(err, CacheError::ChunkNotFound(_)));

    let other = FileLock::new(&lock_path);
    let acquired = tokio::time::timeout(Duration::from_secs(5), other.acquire()).await;
    assert!(acquired.unwrap().is_ok());
}
