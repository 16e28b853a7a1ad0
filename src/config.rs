// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Configuration management for spacey-pack.
//!
//! Layers, later ones winning: built-in defaults, the user config file,
//! `spacey-pack.toml` in the working directory, an explicit `--config` file,
//! then `SPACEY_PACK_*` environment variables.

use serde::Deserialize;
use spacey_import_map::specifier::file_url;
use spacey_import_map::{ResolveOptions, ScopeFallback};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use url::Url;

use crate::error::{PackError, Result};

/// Project configuration file name.
pub const PROJECT_CONFIG_FILE: &str = "spacey-pack.toml";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "SPACEY_PACK_";

const LOCK_FILE_NAME: &str = ".spacey-pack.lock";

/// How resolution treats several scopes matching the importer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeMode {
    #[default]
    Cascade,
    Exclusive,
}

impl ScopeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ScopeMode::Cascade => "cascade",
            ScopeMode::Exclusive => "exclusive",
        }
    }
}

impl FromStr for ScopeMode {
    type Err = PackError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "cascade" => Ok(ScopeMode::Cascade),
            "exclusive" => Ok(ScopeMode::Exclusive),
            other => Err(PackError::Config(format!(
                "scope_fallback must be 'cascade' or 'exclusive', got '{}'",
                other
            ))),
        }
    }
}

impl From<ScopeMode> for ScopeFallback {
    fn from(mode: ScopeMode) -> Self {
        match mode {
            ScopeMode::Cascade => ScopeFallback::Cascade,
            ScopeMode::Exclusive => ScopeFallback::Exclusive,
        }
    }
}

/// Configuration for spacey-pack.
#[derive(Debug, Clone, PartialEq)]
pub struct PackConfig {
    /// Import map file
    pub import_map: PathBuf,

    /// URL import map addresses are resolved against
    pub base_url: Option<String>,

    /// Directory of compiled chunks
    pub chunk_dir: PathBuf,

    /// Cross-process lock file for the chunk directory
    pub lock_file: Option<PathBuf>,

    /// Scope fallback policy
    pub scope_fallback: ScopeMode,

    /// Log filter used when `RUST_LOG` is unset
    pub log_level: String,

    /// Configuration files merged so far, in order
    pub sources: Vec<PathBuf>,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            import_map: PathBuf::from("import-map.json"),
            base_url: None,
            chunk_dir: PathBuf::from("chunks"),
            lock_file: None,
            scope_fallback: ScopeMode::default(),
            log_level: "warn".to_string(),
            sources: Vec::new(),
        }
    }
}

/// One configuration file; absent keys leave earlier layers alone.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigLayer {
    import_map: Option<PathBuf>,
    base_url: Option<String>,
    chunk_dir: Option<PathBuf>,
    lock_file: Option<PathBuf>,
    scope_fallback: Option<ScopeMode>,
    log_level: Option<String>,
}

impl PackConfig {
    /// Load configuration from default locations plus an optional explicit file.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut layers = Vec::new();
        if let Some(path) = user_config_path() {
            layers.push(path);
        }
        layers.push(PathBuf::from(PROJECT_CONFIG_FILE));

        let mut config = Self::from_files(&layers)?;

        // An explicit file must exist
        if let Some(path) = explicit {
            config.merge_from_file(path)?;
        }

        config.merge_env(std::env::vars())?;
        Ok(config)
    }

    /// Defaults overlaid with every existing file in `paths`, in order.
    pub fn from_files(paths: &[PathBuf]) -> Result<Self> {
        let mut config = Self::default();
        for path in paths {
            if path.exists() {
                config.merge_from_file(path)?;
            }
        }
        Ok(config)
    }

    /// Merge configuration from a TOML file.
    pub fn merge_from_file(&mut self, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path)?;
        let layer: ConfigLayer = toml::from_str(&content)?;
        self.sources.push(path.to_path_buf());

        if let Some(import_map) = layer.import_map {
            self.import_map = import_map;
        }
        if let Some(base_url) = layer.base_url {
            self.base_url = Some(base_url);
        }
        if let Some(chunk_dir) = layer.chunk_dir {
            self.chunk_dir = chunk_dir;
        }
        if let Some(lock_file) = layer.lock_file {
            self.lock_file = Some(lock_file);
        }
        if let Some(scope_fallback) = layer.scope_fallback {
            self.scope_fallback = scope_fallback;
        }
        if let Some(log_level) = layer.log_level {
            self.log_level = log_level;
        }
        Ok(())
    }

    /// Apply `SPACEY_PACK_*` variables from `vars`.
    pub fn merge_env(&mut self, vars: impl IntoIterator<Item = (String, String)>) -> Result<()> {
        for (key, value) in vars {
            if let Some(config_key) = key.strip_prefix(ENV_PREFIX) {
                self.set(&config_key.to_lowercase(), &value)?;
            }
        }
        Ok(())
    }

    /// Set a configuration value. `-` and `_` are interchangeable in keys.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key.replace('-', "_").as_str() {
            "import_map" => self.import_map = PathBuf::from(value),
            "base_url" => self.base_url = Some(value.to_string()),
            "chunk_dir" => self.chunk_dir = PathBuf::from(value),
            "lock_file" => self.lock_file = Some(PathBuf::from(value)),
            "scope_fallback" => self.scope_fallback = value.parse()?,
            "log_level" => self.log_level = value.to_string(),
            _ => return Err(PackError::Config(format!("Unknown key '{}'", key))),
        }
        Ok(())
    }

    /// Get a configuration value.
    pub fn get(&self, key: &str) -> Option<String> {
        match key.replace('-', "_").as_str() {
            "import_map" => Some(self.import_map.display().to_string()),
            "base_url" => self.base_url.clone(),
            "chunk_dir" => Some(self.chunk_dir.display().to_string()),
            "lock_file" => Some(self.lock_file_path().display().to_string()),
            "scope_fallback" => Some(self.scope_fallback.as_str().to_string()),
            "log_level" => Some(self.log_level.clone()),
            _ => None,
        }
    }

    /// Lock file, defaulting to one inside the chunk directory.
    pub fn lock_file_path(&self) -> PathBuf {
        self.lock_file
            .clone()
            .unwrap_or_else(|| self.chunk_dir.join(LOCK_FILE_NAME))
    }

    /// Base URL for an import map read from `import_map`.
    ///
    /// The configured `base_url` wins; otherwise it is the file's own URL.
    pub fn base_url_for(&self, import_map: &Path) -> Result<Url> {
        match &self.base_url {
            Some(base) => Url::parse(base).map_err(|source| PackError::InvalidUrl {
                url: base.clone(),
                source,
            }),
            None => file_url(import_map).ok_or_else(|| {
                PackError::Config(format!(
                    "Cannot build a file URL for '{}'",
                    import_map.display()
                ))
            }),
        }
    }

    /// Resolver options.
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions::with_scope_fallback(self.scope_fallback.into())
    }
}

/// Get the user config path.
fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("spacey-pack").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn env(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = PackConfig::default();
        assert!(config.sources.is_empty());
        assert_eq!(config.scope_fallback, ScopeMode::Cascade);
        assert_eq!(config.lock_file_path(), PathBuf::from("chunks/.spacey-pack.lock"));
        assert_eq!(config.resolve_options(), ResolveOptions::default());
    }

    #[test]
    fn test_later_files_win() {
        let dir = tempdir().unwrap();
        let user = dir.path().join("user.toml");
        let project = dir.path().join("project.toml");
        std::fs::write(&user, "chunk_dir = \"user-chunks\"\nlog_level = \"info\"\n").unwrap();
        std::fs::write(&project, "chunk_dir = \"build/chunks\"\nscope_fallback = \"exclusive\"\n")
            .unwrap();

        let config = PackConfig::from_files(&[
            user.clone(),
            dir.path().join("missing.toml"),
            project.clone(),
        ])
        .unwrap();

        assert_eq!(config.sources, vec![user, project]);
        assert_eq!(config.chunk_dir, PathBuf::from("build/chunks"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.scope_fallback, ScopeMode::Exclusive);
        assert_eq!(
            config.lock_file_path(),
            PathBuf::from("build/chunks/.spacey-pack.lock")
        );
    }

    #[test]
    fn test_unknown_file_key_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "chunks = \"x\"\n").unwrap();

        let err = PackConfig::default().merge_from_file(&path).unwrap_err();
        assert!(matches!(err, PackError::Toml(_)));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = PackConfig::default();
        config
            .merge_env(env(&[
                ("SPACEY_PACK_IMPORT_MAP", "maps/dev.json"),
                ("SPACEY_PACK_SCOPE_FALLBACK", "exclusive"),
                ("HOME", "/home/dev"),
            ]))
            .unwrap();

        assert_eq!(config.import_map, PathBuf::from("maps/dev.json"));
        assert_eq!(config.scope_fallback, ScopeMode::Exclusive);
    }

    #[test]
    fn test_set_and_get() {
        let mut config = PackConfig::default();
        config.set("lock-file", "/tmp/pack.lock").unwrap();
        config.set("base_url", "db://assets/").unwrap();

        assert_eq!(config.get("lock_file").unwrap(), "/tmp/pack.lock");
        assert_eq!(config.get("base-url").unwrap(), "db://assets/");
        assert_eq!(config.get("scope_fallback").unwrap(), "cascade");
        assert!(config.get("nope").is_none());

        assert!(config.set("scope_fallback", "sometimes").is_err());
        assert!(config.set("nope", "1").is_err());
    }

    #[test]
    fn test_base_url() {
        let mut config = PackConfig::default();
        let url = config
            .base_url_for(Path::new("/project/import-map.json"))
            .unwrap();
        assert_eq!(url.as_str(), "file:///project/import-map.json");

        config.base_url = Some("db://assets/import-map.json".to_string());
        let url = config.base_url_for(Path::new("ignored.json")).unwrap();
        assert_eq!(url.as_str(), "db://assets/import-map.json");

        config.base_url = Some("not a url".to_string());
        assert!(matches!(
            config.base_url_for(Path::new("x.json")),
            Err(PackError::InvalidUrl { .. })
        ));
    }
}
