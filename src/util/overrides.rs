//! The override source: user-supplied values keyed by variable name.
//!
//! Overrides come from the process environment layered over the `[env]`
//! table of the config files. They are snapshotted once at construction
//! and immutable thereafter. An empty string is treated the same as an
//! absent variable, so accidentally-exported empty environment variables
//! cannot select a value.

use std::collections::BTreeMap;

use crate::util::config::Config;

/// Prefix for every override recognized in the process environment.
pub const ENV_PREFIX: &str = "CAPSTAN_";

/// Immutable, read-only lookup of user-supplied override values.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    values: BTreeMap<String, String>,
}

impl Overrides {
    /// Snapshot overrides from the config file layer and the process
    /// environment. Environment values win over config values; empty
    /// values are discarded in both layers.
    pub fn from_env(config: &Config) -> Self {
        let mut values = BTreeMap::new();

        for (name, value) in &config.env {
            if !value.is_empty() {
                values.insert(name.clone(), value.clone());
            }
        }

        for (name, value) in std::env::vars() {
            if name.starts_with(ENV_PREFIX) && !value.is_empty() {
                values.insert(name, value);
            }
        }

        Overrides { values }
    }

    /// Build an override source from explicit pairs. Primarily useful for
    /// embedding and for tests; empty values are discarded here too.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let values = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(_, v)| !v.is_empty())
            .collect();
        Overrides { values }
    }

    /// Look up an override value. Pure lookup, no validation.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Whether the user explicitly set this variable.
    pub fn is_set(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }
}
