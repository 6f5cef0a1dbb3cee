//! Ignore pattern management for the repository watcher
//!
//! Supports multiple sources of ignore patterns:
//! 1. Built-in directories (.git/, .chef/, ... - always active)
//! 2. .gitignore patterns (optional, enabled by default)
//! 3. Config-based patterns (gitignore syntax)
//!
//! Editor swap and backup files are not handled here; the normalizer drops
//! those for every batch source.

use crate::Result;
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Directories never worth uploading from
const BUILTIN_DIRS: &[&str] = &[
    ".git",
    ".svn",
    ".hg",
    ".chef",
    ".kitchen",
    ".vagrant",
    ".bundle",
];

/// Ignore rule manager
pub struct IgnoreRules {
    /// Repository root directory
    repo_root: PathBuf,

    /// Gitignore patterns (optional)
    gitignore: Option<Gitignore>,

    /// Patterns from configuration (optional)
    extra: Option<Gitignore>,

    /// Configuration
    config: IgnoreConfig,
}

impl IgnoreRules {
    /// Load ignore rules for repository
    pub fn load(repo_root: &Path, config: IgnoreConfig) -> Result<Self> {
        let mut rules = Self {
            repo_root: repo_root.to_path_buf(),
            gitignore: None,
            extra: None,
            config,
        };

        rules.reload()?;
        Ok(rules)
    }

    /// Rebuild matchers from disk and configuration
    ///
    /// This can be called to pick up changes to .gitignore
    pub fn reload(&mut self) -> Result<()> {
        self.gitignore = None;
        if self.config.use_gitignore {
            let gitignore_path = self.repo_root.join(".gitignore");
            if gitignore_path.exists() {
                let mut builder = GitignoreBuilder::new(&self.repo_root);
                if let Some(err) = builder.add(&gitignore_path) {
                    warn!("Partially invalid {}: {}", gitignore_path.display(), err);
                }
                self.gitignore = Some(builder.build()?);
            }
        }

        self.extra = None;
        if !self.config.patterns.is_empty() {
            let mut builder = GitignoreBuilder::new(&self.repo_root);
            for pattern in &self.config.patterns {
                builder.add_line(None, pattern)?;
            }
            self.extra = Some(builder.build()?);
        }

        Ok(())
    }

    /// Check if a repository-relative path should be ignored
    pub fn should_ignore(&self, rel_path: &str) -> bool {
        // 1. Built-in directories (always enforced)
        if rel_path.split('/').any(|part| BUILTIN_DIRS.contains(&part)) {
            return true;
        }

        let path = Path::new(rel_path);
        let is_dir = self.repo_root.join(path).is_dir();

        // 2. .gitignore
        if let Some(ref gitignore) = self.gitignore {
            if gitignore.matched_path_or_any_parents(path, is_dir).is_ignore() {
                return true;
            }
        }

        // 3. Config patterns
        if let Some(ref extra) = self.extra {
            if extra.matched_path_or_any_parents(path, is_dir).is_ignore() {
                return true;
            }
        }

        false
    }

    /// Get number of active ignore sources
    pub fn active_sources(&self) -> usize {
        1 + usize::from(self.gitignore.is_some()) + usize::from(self.extra.is_some())
    }

    /// Get repository root
    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    pub fn config(&self) -> &IgnoreConfig {
        &self.config
    }
}

/// Ignore configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgnoreConfig {
    /// Use .gitignore patterns (default: true)
    #[serde(default = "default_true")]
    pub use_gitignore: bool,

    /// Additional patterns, gitignore syntax
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl Default for IgnoreConfig {
    fn default() -> Self {
        Self {
            use_gitignore: true,
            patterns: vec![],
        }
    }
}

fn default_true() -> bool {
    true
}
