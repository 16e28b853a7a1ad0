// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Normalized import map data model
//!
//! Both tables are kept de-duplicated and sorted most-specific first at all
//! times, so resolution never has to sort.

use std::cmp::Ordering;
use std::path::Path;

use serde_json::{Map, Value};
use url::Url;

use crate::error::{ImportMapError, Result};
use crate::parser::parse_import_map;
use crate::specifier::file_url;

/// Target of a specifier map entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Address {
    /// The key resolves to this URL
    Resolved(Url),
    /// The key is reserved but deliberately unresolved; matching it is an error
    Tombstone,
}

impl Address {
    /// The resolved URL, if any
    pub fn url(&self) -> Option<&Url> {
        match self {
            Address::Resolved(url) => Some(url),
            Address::Tombstone => None,
        }
    }

    /// Whether this entry is a tombstone
    pub fn is_tombstone(&self) -> bool {
        matches!(self, Address::Tombstone)
    }

    fn to_json(&self) -> Value {
        match self {
            Address::Resolved(url) => Value::String(url.to_string()),
            Address::Tombstone => Value::Null,
        }
    }
}

/// Specifier key to address table, longest key first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecifierMap {
    entries: Vec<(String, Address)>,
}

/// Longer keys first; equal lengths fall back to code-unit order.
fn specifier_key_order(a: &str, b: &str) -> Ordering {
    b.len().cmp(&a.len()).then_with(|| a.cmp(b))
}

impl SpecifierMap {
    /// Build a map from entries in document order. Later duplicates win.
    pub fn from_entries(entries: impl IntoIterator<Item = (String, Address)>) -> Self {
        let mut map = Self::default();
        for (key, address) in entries {
            map.upsert(key, address);
        }
        map.sort();
        map
    }

    fn upsert(&mut self, key: String, address: Address) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = address,
            None => self.entries.push((key, address)),
        }
    }

    fn sort(&mut self) {
        self.entries.sort_by(|(a, _), (b, _)| specifier_key_order(a, b));
    }

    /// Entries in lookup order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Address)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Look up an entry by exact key
    pub fn get(&self, key: &str) -> Option<&Address> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A new map holding both maps' entries, `other` winning on duplicates
    pub fn merged(&self, other: &SpecifierMap) -> SpecifierMap {
        SpecifierMap::from_entries(self.entries.iter().chain(other.entries.iter()).cloned())
    }

    fn to_json(&self) -> Value {
        let object: Map<String, Value> = self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect();
        Value::Object(object)
    }
}

/// Scope prefix to specifier map table, most specific scope first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeMap {
    entries: Vec<(String, SpecifierMap)>,
}

impl ScopeMap {
    /// Build a scope table. Scopes sharing a prefix are merged, later entries winning.
    pub fn from_entries(entries: impl IntoIterator<Item = (String, SpecifierMap)>) -> Self {
        let mut scopes = Self::default();
        for (prefix, map) in entries {
            match scopes.entries.iter_mut().find(|(p, _)| *p == prefix) {
                Some(slot) => slot.1 = slot.1.merged(&map),
                None => scopes.entries.push((prefix, map)),
            }
        }
        // Descending code-unit order puts every prefix after its extensions.
        scopes.entries.sort_by(|(a, _), (b, _)| b.cmp(a));
        scopes
    }

    /// Scopes in lookup order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SpecifierMap)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Look up a scope by exact prefix
    pub fn get(&self, prefix: &str) -> Option<&SpecifierMap> {
        self.entries.iter().find(|(p, _)| p == prefix).map(|(_, v)| v)
    }

    /// Number of scopes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no scopes
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn to_json(&self) -> Value {
        let object: Map<String, Value> = self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect();
        Value::Object(object)
    }
}

/// A normalized, immutable import map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportMap {
    imports: SpecifierMap,
    scopes: ScopeMap,
}

impl ImportMap {
    /// Assemble a map from already normalized tables
    pub fn new(imports: SpecifierMap, scopes: ScopeMap) -> Self {
        Self { imports, scopes }
    }

    /// Read and parse an import map file, resolving addresses against the file's own URL
    pub fn from_file(path: &Path) -> Result<Self> {
        let base = file_url(path)
            .ok_or_else(|| ImportMapError::InvalidBaseUrl(path.display().to_string()))?;
        let content = std::fs::read_to_string(path)?;
        Ok(parse_import_map(&content, &base)?.import_map)
    }

    /// Top-level specifier map
    pub fn imports(&self) -> &SpecifierMap {
        &self.imports
    }

    /// Scoped specifier maps
    pub fn scopes(&self) -> &ScopeMap {
        &self.scopes
    }

    /// Whether the map has no imports and no scopes
    pub fn is_empty(&self) -> bool {
        self.imports.is_empty() && self.scopes.is_empty()
    }

    /// Combine two maps into a fresh one; `other` wins on duplicate keys.
    pub fn merge(&self, other: &ImportMap) -> ImportMap {
        ImportMap {
            imports: self.imports.merged(&other.imports),
            scopes: ScopeMap::from_entries(
                self.scopes
                    .entries
                    .iter()
                    .chain(other.scopes.entries.iter())
                    .cloned(),
            ),
        }
    }

    /// Serialize back to the `{ imports, scopes }` document form
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        object.insert("imports".to_string(), self.imports.to_json());
        object.insert("scopes".to_string(), self.scopes.to_json());
        Value::Object(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(s: &str) -> Address {
        Address::Resolved(Url::parse(s).unwrap())
    }

    #[test]
    fn test_specifier_map_sorted_by_length() {
        let map = SpecifierMap::from_entries(vec![
            ("a".to_string(), resolved("file:///a")),
            ("abc/".to_string(), resolved("file:///abc/")),
            ("ab".to_string(), resolved("file:///ab")),
            ("zz".to_string(), resolved("file:///zz")),
        ]);
        let keys: Vec<&str> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["abc/", "ab", "zz", "a"]);
    }

    #[test]
    fn test_specifier_map_last_write_wins() {
        let map = SpecifierMap::from_entries(vec![
            ("x".to_string(), resolved("file:///one")),
            ("x".to_string(), Address::Tombstone),
        ]);
        assert_eq!(map.len(), 1);
        assert!(map.get("x").unwrap().is_tombstone());
    }

    #[test]
    fn test_scope_map_most_specific_first() {
        let scopes = ScopeMap::from_entries(vec![
            ("file:///libs/".to_string(), SpecifierMap::default()),
            ("file:///libs/foo".to_string(), SpecifierMap::default()),
            ("file:///".to_string(), SpecifierMap::default()),
        ]);
        let prefixes: Vec<&str> = scopes.iter().map(|(p, _)| p).collect();
        assert_eq!(prefixes, vec!["file:///libs/foo", "file:///libs/", "file:///"]);
    }

    #[test]
    fn test_merge_does_not_touch_inputs() {
        let first = ImportMap::new(
            SpecifierMap::from_entries(vec![("cc".to_string(), resolved("file:///cc.js"))]),
            ScopeMap::default(),
        );
        let second = ImportMap::new(
            SpecifierMap::from_entries(vec![
                ("cc".to_string(), resolved("file:///cc-debug.js")),
                ("cc/env".to_string(), resolved("file:///env.js")),
            ]),
            ScopeMap::from_entries(vec![(
                "file:///a/".to_string(),
                SpecifierMap::from_entries(vec![("x".to_string(), Address::Tombstone)]),
            )]),
        );

        let merged = first.merge(&second);
        assert_eq!(
            merged.imports().get("cc"),
            Some(&resolved("file:///cc-debug.js"))
        );
        assert_eq!(merged.imports().len(), 2);
        assert_eq!(merged.scopes().len(), 1);
        assert_eq!(first.imports().get("cc"), Some(&resolved("file:///cc.js")));
        assert!(first.scopes().is_empty());
    }

    #[test]
    fn test_to_json_writes_tombstones_as_null() {
        let map = ImportMap::new(
            SpecifierMap::from_entries(vec![("gone".to_string(), Address::Tombstone)]),
            ScopeMap::default(),
        );
        let json = map.to_json();
        assert_eq!(json["imports"]["gone"], Value::Null);
        assert!(json["scopes"].as_object().unwrap().is_empty());
    }
}
