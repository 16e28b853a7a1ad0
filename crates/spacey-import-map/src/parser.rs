// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Import map document parsing
//!
//! Turns a `{ "imports": {...}, "scopes": {...} }` document into a
//! normalized [`ImportMap`]. Shape errors fail the parse; per-entry problems
//! are recorded as [`ParseWarning`]s and the entry is dropped or tombstoned.

use serde_json::{Map, Value};
use tracing::warn;
use url::Url;

use crate::error::{ImportMapError, ParseWarning, Result};
use crate::map::{Address, ImportMap, ScopeMap, SpecifierMap};
use crate::specifier::parse_url_like_specifier;

/// A parsed import map together with the diagnostics collected on the way
#[derive(Debug, Clone)]
pub struct ParsedImportMap {
    /// The normalized map
    pub import_map: ImportMap,
    /// Recoverable problems, in document order
    pub warnings: Vec<ParseWarning>,
}

/// Parse import map JSON text against `base`
pub fn parse_import_map(json: &str, base: &Url) -> Result<ParsedImportMap> {
    let value: Value = serde_json::from_str(json)?;
    parse_import_map_value(&value, base)
}

/// Parse an already decoded import map document against `base`
pub fn parse_import_map_value(value: &Value, base: &Url) -> Result<ParsedImportMap> {
    ImportMapParser::new(base.clone()).parse(value)
}

/// Import map normalizer
pub struct ImportMapParser {
    base: Url,
    warnings: Vec<ParseWarning>,
}

impl ImportMapParser {
    /// Create a parser resolving relative keys and addresses against `base`
    pub fn new(base: Url) -> Self {
        Self {
            base,
            warnings: Vec::new(),
        }
    }

    /// Parse a document, consuming the parser
    pub fn parse(mut self, value: &Value) -> Result<ParsedImportMap> {
        let document = value.as_object().ok_or(ImportMapError::NotAnObject)?;

        let imports = match document.get("imports") {
            Some(Value::Object(imports)) => self.parse_specifier_map(imports),
            Some(_) => return Err(ImportMapError::ImportsNotAnObject),
            None => SpecifierMap::default(),
        };

        let scopes = match document.get("scopes") {
            Some(Value::Object(scopes)) => self.parse_scopes(scopes)?,
            Some(_) => return Err(ImportMapError::ScopesNotAnObject),
            None => ScopeMap::default(),
        };

        for key in document.keys() {
            if key != "imports" && key != "scopes" {
                self.warn(ParseWarning::UnknownTopLevelKey(key.clone()));
            }
        }

        Ok(ParsedImportMap {
            import_map: ImportMap::new(imports, scopes),
            warnings: self.warnings,
        })
    }

    fn parse_scopes(&mut self, scopes: &Map<String, Value>) -> Result<ScopeMap> {
        let mut entries = Vec::with_capacity(scopes.len());
        for (prefix, value) in scopes {
            let Value::Object(map) = value else {
                return Err(ImportMapError::ScopeNotAnObject {
                    scope: prefix.clone(),
                });
            };
            let prefix = self.normalize_key(prefix);
            entries.push((prefix, self.parse_specifier_map(map)));
        }
        Ok(ScopeMap::from_entries(entries))
    }

    fn parse_specifier_map(&mut self, map: &Map<String, Value>) -> SpecifierMap {
        let mut entries = Vec::with_capacity(map.len());
        for (key, value) in map {
            if key.is_empty() {
                self.warn(ParseWarning::EmptyKey);
                continue;
            }
            let key = self.normalize_key(key);
            let address = self.parse_address(&key, value);
            entries.push((key, address));
        }
        SpecifierMap::from_entries(entries)
    }

    fn parse_address(&mut self, key: &str, value: &Value) -> Address {
        let Some(address) = value.as_str() else {
            self.warn(ParseWarning::NonStringAddress {
                key: key.to_string(),
                value: value.to_string(),
            });
            return Address::Tombstone;
        };

        let Some(url) = parse_url_like_specifier(address, &self.base) else {
            self.warn(ParseWarning::InvalidAddress {
                key: key.to_string(),
                address: address.to_string(),
            });
            return Address::Tombstone;
        };

        if key.ends_with('/') && !url.as_str().ends_with('/') {
            self.warn(ParseWarning::TrailingSlashMismatch {
                key: key.to_string(),
                address: url.to_string(),
            });
            return Address::Tombstone;
        }

        Address::Resolved(url)
    }

    /// URL-like keys are stored serialized; bare keys verbatim.
    fn normalize_key(&self, key: &str) -> String {
        match parse_url_like_specifier(key, &self.base) {
            Some(url) => url.to_string(),
            None => key.to_string(),
        }
    }

    fn warn(&mut self, warning: ParseWarning) {
        warn!("{}", warning);
        self.warnings.push(warning);
    }
}
