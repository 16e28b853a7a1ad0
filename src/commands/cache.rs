// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Cache command implementation.

use async_trait::async_trait;
use owo_colors::OwoColorize;
use spacey_chunk_cache::{
    CacheCoordinator, CacheError, ChunkEvaluator, ChunkId, FileLock, FsChunkStore,
};
use tracing::{debug, info};

use crate::cli::CacheArgs;
use crate::commands::CommandContext;
use crate::error::Result;

/// Module registration produced from a chunk's source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRegistration {
    pub chunk: ChunkId,
    pub size: usize,
    pub source: String,
}

/// Evaluator accepting any UTF-8 chunk.
pub struct SourceEvaluator;

#[async_trait]
impl ChunkEvaluator<SourceRegistration> for SourceEvaluator {
    async fn evaluate(
        &self,
        chunk: &ChunkId,
        source: Vec<u8>,
    ) -> spacey_chunk_cache::Result<SourceRegistration> {
        let size = source.len();
        let source =
            String::from_utf8(source).map_err(|e| CacheError::evaluate(chunk, e.to_string()))?;
        Ok(SourceRegistration {
            chunk: chunk.clone(),
            size,
            source,
        })
    }
}

pub async fn run(args: &CacheArgs, ctx: &CommandContext) -> Result<()> {
    let dir = args.dir.clone().unwrap_or_else(|| ctx.config.chunk_dir.clone());
    let lock_path = match (&args.dir, &ctx.config.lock_file) {
        (_, Some(lock_file)) => lock_file.clone(),
        (Some(dir), None) => dir.join(".spacey-pack.lock"),
        (None, None) => ctx.config.lock_file_path(),
    };

    let store = FsChunkStore::new();
    let chunks = store.scan(&dir, &args.prefix)?;
    let coordinator: CacheCoordinator<SourceRegistration, _, _> =
        CacheCoordinator::new(store, FileLock::new(&lock_path));
    info!(
        "Compiling {} chunks from {} (lock {})",
        chunks.len(),
        dir.display(),
        lock_path.display()
    );

    let mut bytes = 0;
    let mut lines = 0;
    for chunk in &chunks {
        let registration = coordinator.get_or_compile(chunk, &SourceEvaluator).await?;
        debug!("Registered {} ({} bytes)", registration.chunk, registration.size);
        bytes += registration.size;
        lines += registration.source.lines().count();
    }
    println!(
        "{} {} chunks ({}, {} lines)",
        "Compiled".green().bold(),
        coordinator.cache().len(),
        format_bytes(bytes),
        lines
    );

    for round in 1..=args.rounds {
        let report = coordinator.reload().await?;
        println!(
            "{} {}: {} checked, {} evicted",
            "Reload".cyan().bold(),
            round,
            report.checked,
            report.evicted.len()
        );
        for chunk in &report.evicted {
            println!("  {} {}", "evicted".yellow(), chunk);
        }
    }

    Ok(())
}

fn format_bytes(bytes: usize) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.2} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_source_evaluator() {
        let chunk = ChunkId::from("project:/main.js");
        let registration = SourceEvaluator
            .evaluate(&chunk, b"register([], f)".to_vec())
            .await
            .unwrap();
        assert_eq!(registration.size, 15);
        assert_eq!(registration.source, "register([], f)");

        let err = SourceEvaluator
            .evaluate(&chunk, vec![0xc3, 0x28])
            .await
            .unwrap_err();
        assert!(matches!(err, CacheError::Evaluate { .. }));
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.00 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.00 MB");
    }
}
