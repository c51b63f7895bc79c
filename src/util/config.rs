//! Configuration file support for Capstan.
//!
//! Capstan supports two configuration file locations:
//! - Global: `~/.capstan/config.toml` - User-wide defaults
//! - Project: `.capstan/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config, and the process
//! environment takes precedence over both (see `util::overrides`).
//!
//! The `[env]` table supplies override values by variable name:
//! ```toml
//! [env]
//! CAPSTAN_NETWORK = "slingshot"
//! CAPSTAN_ATOMICS = "cstdlib"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};

/// Capstan configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Override values keyed by variable name.
    pub env: BTreeMap<String, String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    /// Load configuration, returning defaults if the file is missing or
    /// malformed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring config {}: {:#}", path.display(), e);
                Config::default()
            }
        }
    }

    /// Merge another config into this one. Values from `other` win.
    pub fn merge(&mut self, other: Config) {
        for (name, value) in other.env {
            self.env.insert(name, value);
        }
    }
}

/// Path to the global config file, if a home directory exists.
pub fn global_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(".capstan").join("config.toml"))
}

/// Path to the project config file relative to a working directory.
pub fn project_config_path(cwd: &Path) -> PathBuf {
    cwd.join(".capstan").join("config.toml")
}

/// Load and merge global and project configuration.
///
/// Missing files are fine; project config overrides global.
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    if global_path.exists() {
        let global = Config::load_or_default(global_path);
        config.merge(global);
    }

    if project_path.exists() {
        let project = Config::load_or_default(project_path);
        config.merge(project);
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_table() {
        let config: Config = toml::from_str(
            r#"
            [env]
            CAPSTAN_NETWORK = "slingshot"
            CAPSTAN_COMM = "ofi"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.env.get("CAPSTAN_NETWORK").map(String::as_str),
            Some("slingshot")
        );
        assert_eq!(
            config.env.get("CAPSTAN_COMM").map(String::as_str),
            Some("ofi")
        );
    }

    #[test]
    fn test_merge_project_wins() {
        let mut global = Config::default();
        global
            .env
            .insert("CAPSTAN_NETWORK".to_string(), "ethernet".to_string());
        global
            .env
            .insert("CAPSTAN_COMM".to_string(), "gasnet".to_string());

        let mut project = Config::default();
        project
            .env
            .insert("CAPSTAN_NETWORK".to_string(), "infiniband".to_string());

        global.merge(project);
        assert_eq!(
            global.env.get("CAPSTAN_NETWORK").map(String::as_str),
            Some("infiniband")
        );
        assert_eq!(
            global.env.get("CAPSTAN_COMM").map(String::as_str),
            Some("gasnet")
        );
    }

    #[test]
    fn test_load_config_missing_files() {
        let tmp = tempfile::tempdir().unwrap();
        let config = load_config(
            &tmp.path().join("nope.toml"),
            &tmp.path().join("also-nope.toml"),
        );
        assert!(config.env.is_empty());
    }
}
