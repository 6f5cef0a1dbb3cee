//! Settings file management
//!
//! Settings come from TOML, first match wins:
//! 1. `--settings <FILE>` (must exist)
//! 2. `<root>/.knifewatch.toml`
//! 3. `<config dir>/knifewatch/config.toml`
//! 4. Built-in defaults
//!
//! Command-line flags are applied on top afterwards.

use anyhow::{Context, Result};
use kw_core::config::KNIFE_CONFIG_KEY;
use kw_core::Configuration;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use watcher::{IgnoreConfig, WatchOptions};

/// Per-repository settings file name
pub const SETTINGS_FILE_NAME: &str = ".knifewatch.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Options handed to the engine (`config` = knife.rb path)
    #[serde(default)]
    pub knife: BTreeMap<String, String>,

    #[serde(default)]
    pub watch: WatchSettings,

    #[serde(default)]
    pub upload: UploadSettings,

    #[serde(default)]
    pub notify: NotifySettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchSettings {
    /// Quiet period before a batch is processed (default: 200ms)
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Skip paths matched by the root .gitignore (default: true)
    #[serde(default = "default_true")]
    pub use_gitignore: bool,

    /// Extra ignore patterns, gitignore syntax
    #[serde(default)]
    pub ignore: Vec<String>,
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            use_gitignore: true,
            ignore: vec![],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadSettings {
    /// Knife executable (default: knife from PATH)
    #[serde(default = "default_program")]
    pub program: String,

    /// Kill knife after this many seconds (default: no limit)
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            program: default_program(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifySettings {
    /// Also send desktop notifications via notify-send
    #[serde(default)]
    pub desktop: bool,
}

fn default_debounce_ms() -> u64 {
    200
}

fn default_program() -> String {
    kw_core::dispatch::KNIFE_PROGRAM.to_string()
}

fn default_true() -> bool {
    true
}

/// Command-line values that take precedence over the settings file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub knife_config: Option<String>,
    pub knife_bin: Option<String>,
    pub timeout_secs: Option<u64>,
    pub desktop: bool,
}

impl Settings {
    /// Parse settings from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(text).context("Invalid settings file")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings, returning the file they came from (if any)
    pub fn load(explicit: Option<&Path>, repo_root: &Path) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            let settings = Self::read(path)?;
            return Ok((settings, Some(path.to_path_buf())));
        }

        for candidate in discovery_paths(repo_root) {
            if candidate.is_file() {
                let settings = Self::read(&candidate)?;
                return Ok((settings, Some(candidate)));
            }
        }

        Ok((Self::default(), None))
    }

    fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("In {}", path.display()))
    }

    /// Validate value ranges
    pub fn validate(&self) -> Result<()> {
        if !(10..=10_000).contains(&self.watch.debounce_ms) {
            anyhow::bail!(
                "watch.debounce_ms must be between 10 and 10000 (got {})",
                self.watch.debounce_ms
            );
        }

        if let Some(secs) = self.upload.timeout_secs {
            if !(1..=86_400).contains(&secs) {
                anyhow::bail!("upload.timeout_secs must be between 1 and 86400 (got {})", secs);
            }
        }

        if self.upload.program.trim().is_empty() {
            anyhow::bail!("upload.program must not be empty");
        }

        Ok(())
    }

    /// Apply command-line overrides
    pub fn apply(&mut self, overrides: &Overrides) -> Result<()> {
        if let Some(ref path) = overrides.knife_config {
            self.knife.insert(KNIFE_CONFIG_KEY.to_string(), path.clone());
        }
        if let Some(ref program) = overrides.knife_bin {
            self.upload.program = program.clone();
        }
        if overrides.timeout_secs.is_some() {
            self.upload.timeout_secs = overrides.timeout_secs;
        }
        if overrides.desktop {
            self.notify.desktop = true;
        }
        self.validate()
    }

    /// Engine configuration, falling back to `~/.chef/knife.rb` when it exists
    pub fn configuration(&self) -> Result<Configuration> {
        self.configuration_with_default(default_knife_config())
    }

    /// Engine configuration with an explicit fallback knife config
    ///
    /// `~/` prefixes are expanded since knife is started without a shell.
    pub fn configuration_with_default(&self, fallback: Option<String>) -> Result<Configuration> {
        let mut options = self.knife.clone();
        if !options.contains_key(KNIFE_CONFIG_KEY) {
            if let Some(path) = fallback {
                options.insert(KNIFE_CONFIG_KEY.to_string(), path);
            }
        }
        if let Some(path) = options.get_mut(KNIFE_CONFIG_KEY) {
            *path = expand_tilde(path);
        }

        Configuration::from_options(options).context("Invalid [knife] settings")
    }

    pub fn ignore_config(&self) -> IgnoreConfig {
        IgnoreConfig {
            use_gitignore: self.watch.use_gitignore,
            patterns: self.watch.ignore.clone(),
        }
    }

    pub fn watch_options(&self) -> WatchOptions {
        WatchOptions {
            debounce: Duration::from_millis(self.watch.debounce_ms),
            ignore: self.ignore_config(),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.upload.timeout_secs.map(Duration::from_secs)
    }
}

/// Settings locations tried when none is given explicitly
pub fn discovery_paths(repo_root: &Path) -> Vec<PathBuf> {
    let mut paths = vec![repo_root.join(SETTINGS_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("knifewatch").join("config.toml"));
    }
    paths
}

/// `~/.chef/knife.rb` if present
pub fn default_knife_config() -> Option<String> {
    let path = dirs::home_dir()?.join(".chef").join("knife.rb");
    path.is_file().then(|| path.display().to_string())
}

/// Expand a leading `~/` to the home directory
pub fn expand_tilde(path: &str) -> String {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest).display().to_string(),
        _ => path.to_string(),
    }
}

/// Example settings file
pub fn example_settings() -> &'static str {
    r#"# knifewatch settings (.knifewatch.toml)

[knife]
# Passed to knife as -c <path>
config = "~/.chef/knife.rb"

[watch]
debounce_ms = 200
use_gitignore = true
ignore = ["*.bak", "cookbooks/*/.kitchen/"]

[upload]
program = "knife"
# timeout_secs = 300

[notify]
desktop = false
"#
}
