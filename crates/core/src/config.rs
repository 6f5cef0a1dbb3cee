//! Engine configuration
//!
//! A read-only map of option name to value, built once at startup. Only
//! `config` (path to knife's own configuration file) becomes a command flag;
//! other options are retained untouched.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Option naming knife's configuration file
pub const KNIFE_CONFIG_KEY: &str = "config";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Configuration {
    options: BTreeMap<String, String>,
}

impl Configuration {
    /// Build a configuration from option pairs
    ///
    /// Later duplicates replace earlier ones.
    pub fn from_options<I, K, V>(options: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let options: BTreeMap<String, String> = options
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();

        if let Some(value) = options.get(KNIFE_CONFIG_KEY) {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyValue {
                    key: KNIFE_CONFIG_KEY.to_string(),
                });
            }
        }

        Ok(Self { options })
    }

    /// Path to knife's configuration file, if set
    pub fn knife_config(&self) -> Option<&str> {
        self.get(KNIFE_CONFIG_KEY)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    /// Flags appended to every knife command
    pub fn knife_flags(&self) -> Vec<String> {
        let mut flags = Vec::new();
        if let Some(path) = self.knife_config() {
            flags.push("-c".to_string());
            flags.push(path.to_string());
        }
        flags
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.options.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}
