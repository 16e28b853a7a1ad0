// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Command implementations for spacey-pack.

pub mod cache;
pub mod check;
pub mod resolve;

use owo_colors::OwoColorize;
use spacey_import_map::{ParseWarning, ParsedImportMap, ResolveOptions, parse_import_map};
use std::path::Path;
use tracing::debug;

use crate::cli::Cli;
use crate::config::{PackConfig, ScopeMode};
use crate::error::Result;

/// Common context for command execution.
pub struct CommandContext {
    pub config: PackConfig,
}

impl CommandContext {
    /// Create a new command context.
    pub fn new(cli: &Cli) -> Result<Self> {
        let mut config = PackConfig::load(cli.config.as_deref())?;

        // Override config with CLI options
        if cli.exclusive_scopes {
            config.scope_fallback = ScopeMode::Exclusive;
        }

        Ok(Self { config })
    }

    /// Log where the configuration came from; call once tracing is installed.
    pub fn log_config(&self) {
        for path in &self.config.sources {
            debug!("Loaded configuration from {}", path.display());
        }
        debug!(
            "Import map {}, chunks in {}, scope fallback {}",
            self.config.import_map.display(),
            self.config.chunk_dir.display(),
            self.config.scope_fallback.as_str()
        );
    }

    /// Read and parse the import map, `path` overriding the configured one.
    pub fn load_import_map(&self, path: Option<&Path>) -> Result<ParsedImportMap> {
        let path = path.unwrap_or(&self.config.import_map);
        let base = self.config.base_url_for(path)?;
        debug!("Parsing import map {} against {}", path.display(), base);

        let content = std::fs::read_to_string(path)?;
        Ok(parse_import_map(&content, &base)?)
    }

    /// Resolver options.
    pub fn resolve_options(&self) -> ResolveOptions {
        self.config.resolve_options()
    }
}

/// Print parser warnings to stderr.
pub fn print_warnings(warnings: &[ParseWarning]) {
    for warning in warnings {
        eprintln!("{}: {}", "warning".yellow().bold(), warning);
    }
}
