// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Check command implementation.

use owo_colors::OwoColorize;

use crate::cli::CheckArgs;
use crate::commands::{CommandContext, print_warnings};
use crate::error::Result;

pub fn run(args: &CheckArgs, ctx: &CommandContext) -> Result<()> {
    let parsed = ctx.load_import_map(args.import_map.as_deref())?;
    let json = serde_json::to_string_pretty(&parsed.import_map.to_json())?;

    if args.json {
        println!("{}", json);
        return Ok(());
    }

    print_warnings(&parsed.warnings);

    let map = &parsed.import_map;
    println!(
        "{} {} imports, {} scopes, {} warnings",
        "Import map OK:".green().bold(),
        map.imports().len(),
        map.scopes().len(),
        parsed.warnings.len()
    );
    println!("{}", json);
    Ok(())
}
