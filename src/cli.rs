// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! CLI argument parsing for spacey-pack.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// spacey-pack - import map resolution and incremental chunk caching
#[derive(Parser, Debug)]
#[command(name = "spacey-pack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug logging for all spacey-pack crates
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file layered over the user and project files
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Consult only the most specific scope matching the importer
    #[arg(long, global = true)]
    pub exclusive_scopes: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve module specifiers through the import map
    Resolve(ResolveArgs),

    /// Validate an import map and print its normalized form
    Check(CheckArgs),

    /// Compile a chunk directory into the cache and reload it
    Cache(CacheArgs),
}

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Specifiers to resolve
    #[arg(required = true)]
    pub specifiers: Vec<String>,

    /// URL of the importing module
    #[arg(long)]
    pub parent: String,

    /// Import map file (overrides configuration)
    #[arg(long, value_name = "FILE")]
    pub import_map: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Import map file (overrides configuration)
    #[arg(long, value_name = "FILE")]
    pub import_map: Option<PathBuf>,

    /// Print the normalized map as JSON only
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CacheArgs {
    /// Chunk directory (defaults to the configured chunk_dir)
    pub dir: Option<PathBuf>,

    /// Prefix prepended to every chunk id
    #[arg(long, default_value = "")]
    pub prefix: String,

    /// Number of reload passes after compiling
    #[arg(long, default_value_t = 1)]
    pub rounds: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_resolve_args() {
        let cli = Cli::parse_from([
            "spacey-pack",
            "--exclusive-scopes",
            "resolve",
            "cc",
            "./util.js",
            "--parent",
            "file:///project/main.js",
        ]);
        assert!(cli.exclusive_scopes);
        match cli.command {
            Commands::Resolve(args) => {
                assert_eq!(args.specifiers, vec!["cc", "./util.js"]);
                assert_eq!(args.parent, "file:///project/main.js");
                assert!(args.import_map.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_cache_defaults() {
        let cli = Cli::parse_from(["spacey-pack", "cache", "build/chunks", "-v"]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Cache(args) => {
                assert_eq!(args.dir, Some(PathBuf::from("build/chunks")));
                assert_eq!(args.prefix, "");
                assert_eq!(args.rounds, 1);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
