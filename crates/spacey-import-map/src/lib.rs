// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! # spacey-import-map
//!
//! Import map support for the spacey-pack module bundler.
//!
//! An import map redirects module specifiers (bare names such as `cc`,
//! relative paths, or absolute URLs including `db://` asset URLs) to
//! concrete URLs, optionally overridden per importing scope.
//!
//! ```rust,ignore
//! use spacey_import_map::{parse_import_map, resolve_specifier, ResolveOptions};
//! use url::Url;
//!
//! let base = Url::parse("file:///project/import-map.json")?;
//! let parsed = parse_import_map(r#"{ "imports": { "cc": "./engine/cc.js" } }"#, &base)?;
//! let parent = Url::parse("file:///project/assets/main.js")?;
//! let url = resolve_specifier("cc", &parent, &parsed.import_map, ResolveOptions::default())?;
//! assert_eq!(url.unwrap().as_str(), "file:///project/engine/cc.js");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod map;
pub mod parser;
pub mod resolver;
pub mod shared;
pub mod specifier;

pub use error::{ImportMapError, ParseWarning, Result};
pub use map::{Address, ImportMap, ScopeMap, SpecifierMap};
pub use parser::{ImportMapParser, ParsedImportMap, parse_import_map, parse_import_map_value};
pub use resolver::{ResolveOptions, ScopeFallback, resolve, resolve_specifier, resolve_with};
pub use shared::SharedImportMap;
pub use specifier::{SPECIAL_SCHEMES, is_bare, is_special, parse_url_like_specifier};
