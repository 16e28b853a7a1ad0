// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Resolve command implementation.

use owo_colors::OwoColorize;
use spacey_import_map::SharedImportMap;
use url::Url;

use crate::cli::ResolveArgs;
use crate::commands::CommandContext;
use crate::error::{PackError, Result};

pub fn run(args: &ResolveArgs, ctx: &CommandContext) -> Result<()> {
    let parsed = ctx.load_import_map(args.import_map.as_deref())?;
    let parent = Url::parse(&args.parent).map_err(|source| PackError::InvalidUrl {
        url: args.parent.clone(),
        source,
    })?;

    let map = SharedImportMap::new(parsed.import_map, ctx.resolve_options());
    let mut failed = 0;

    for specifier in &args.specifiers {
        match map.resolve(specifier, &parent) {
            Ok(Some(url)) => println!("{} {} {}", specifier.cyan(), "->".dimmed(), url),
            Ok(None) => println!(
                "{} {} {}",
                specifier.cyan(),
                "->".dimmed(),
                "(unmapped)".dimmed()
            ),
            Err(e) => {
                failed += 1;
                eprintln!("{} {}: {}", specifier.cyan(), "error".red().bold(), e);
            }
        }
    }

    if failed > 0 {
        return Err(PackError::Unresolved(failed));
    }
    Ok(())
}
