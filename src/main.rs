// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! spacey-pack - module bundle tooling for Spacey
//!
//! This is the main entry point for the spacey-pack CLI.
//!
//! ## Commands
//!
//! - `resolve`: map specifiers through an import map
//! - `check`: validate and normalize an import map
//! - `cache`: compile a chunk directory and revalidate it against disk

mod cli;
mod commands;
mod config;
mod error;

use clap::Parser;
use owo_colors::OwoColorize;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Commands};
use commands::CommandContext;
use error::Result;

const VERBOSE_FILTER: &str = "spacey_pack=debug,spacey_import_map=debug,spacey_chunk_cache=debug";

/// Main entry point - uses tokio runtime for async operations.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let ctx = CommandContext::new(cli)?;
    init_tracing(cli.verbose, &ctx.config.log_level);
    ctx.log_config();

    match &cli.command {
        Commands::Resolve(args) => commands::resolve::run(args, &ctx),
        Commands::Check(args) => commands::check::run(args, &ctx),
        Commands::Cache(args) => commands::cache::run(args, &ctx).await,
    }
}

/// Initialize tracing; logs go to stderr so command output stays clean.
fn init_tracing(verbose: bool, log_level: &str) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(log_level))
            .unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
