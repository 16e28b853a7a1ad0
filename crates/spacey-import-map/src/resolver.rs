// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Specifier resolution against a normalized import map
//!
//! Resolution is a pure function of its inputs. `Ok(None)` means no entry
//! applies and the caller should fall back to its default resolution;
//! `Err` means an entry applied but cannot produce a URL.

use tracing::trace;
use url::Url;

use crate::error::{ImportMapError, Result};
use crate::map::{Address, ImportMap, SpecifierMap};
use crate::specifier::{is_special, parse_url_like_specifier};

/// How scopes that apply to the importer are consulted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScopeFallback {
    /// Try every applicable scope, most specific first, then top-level imports
    #[default]
    Cascade,
    /// Only consult the most specific applicable scope, then top-level imports
    Exclusive,
}

/// Resolution options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Scope fallback policy
    pub scope_fallback: ScopeFallback,
}

impl ResolveOptions {
    /// Options with the given scope fallback policy
    pub fn with_scope_fallback(scope_fallback: ScopeFallback) -> Self {
        Self { scope_fallback }
    }
}

/// Resolve `specifier`, computing its URL form against `parent` first.
pub fn resolve_specifier(
    specifier: &str,
    parent: &Url,
    map: &ImportMap,
    options: ResolveOptions,
) -> Result<Option<Url>> {
    let as_url = parse_url_like_specifier(specifier, parent);
    resolve_with(specifier, as_url.as_ref(), parent, map, options)
}

/// Resolve with the default options.
///
/// `as_url` is the specifier parsed as a URL (see
/// [`parse_url_like_specifier`]), or `None` for bare specifiers.
pub fn resolve(
    specifier: &str,
    as_url: Option<&Url>,
    parent: &Url,
    map: &ImportMap,
) -> Result<Option<Url>> {
    resolve_with(specifier, as_url, parent, map, ResolveOptions::default())
}

/// Resolve a specifier for an importer at `parent`
pub fn resolve_with(
    specifier: &str,
    as_url: Option<&Url>,
    parent: &Url,
    map: &ImportMap,
    options: ResolveOptions,
) -> Result<Option<Url>> {
    let normalized = match as_url {
        Some(url) => url.as_str(),
        None => specifier,
    };
    let parent = parent.as_str();

    let applicable = map
        .scopes()
        .iter()
        .filter(|(prefix, _)| scope_applies(prefix, parent));

    for (prefix, scope) in applicable {
        trace!("Trying scope '{}' for '{}'", prefix, specifier);
        if let Some(url) = resolve_imports_match(specifier, normalized, as_url, scope)? {
            return Ok(Some(url));
        }
        if options.scope_fallback == ScopeFallback::Exclusive {
            break;
        }
    }

    resolve_imports_match(specifier, normalized, as_url, map.imports())
}

fn scope_applies(prefix: &str, parent: &str) -> bool {
    prefix == parent || (prefix.ends_with('/') && parent.starts_with(prefix))
}

fn resolve_imports_match(
    specifier: &str,
    normalized: &str,
    as_url: Option<&Url>,
    map: &SpecifierMap,
) -> Result<Option<Url>> {
    let prefix_allowed = as_url.map_or(true, is_special);

    for (key, address) in map.iter() {
        if key == normalized {
            return match address {
                Address::Resolved(url) => Ok(Some(url.clone())),
                Address::Tombstone => Err(null_entry(specifier, key)),
            };
        }

        if !(prefix_allowed && key.ends_with('/') && normalized.starts_with(key)) {
            continue;
        }

        let base = match address {
            Address::Resolved(url) => url,
            Address::Tombstone => return Err(null_entry(specifier, key)),
        };

        let remainder = &normalized[key.len()..];
        let url = base.join(remainder).map_err(|_| ImportMapError::ImportMatch {
            specifier: specifier.to_string(),
            key: key.to_string(),
            remainder: remainder.to_string(),
            base: base.to_string(),
        })?;

        if !url.as_str().starts_with(base.as_str()) {
            return Err(ImportMapError::BackTracking {
                specifier: specifier.to_string(),
                key: key.to_string(),
                resolved: url.to_string(),
                base: base.to_string(),
            });
        }

        return Ok(Some(url));
    }

    Ok(None)
}

fn null_entry(specifier: &str, key: &str) -> ImportMapError {
    ImportMapError::NullEntry {
        specifier: specifier.to_string(),
        key: key.to_string(),
    }
}
