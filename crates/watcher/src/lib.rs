//! File system watching for Chef repositories
//!
//! This crate provides:
//! - Debounced change batches from the OS watcher
//! - Ignore rules (VCS/tool directories, .gitignore, custom patterns)
//! - Full-tree scans for one-off syncs

pub mod batch;
pub mod ignore;
pub mod scan;

pub use self::batch::{ChangeBatch, RepoWatcher, WatchOptions};
pub use self::ignore::{IgnoreConfig, IgnoreRules};
pub use self::scan::scan;

use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// File system event, after filtering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEvent {
    /// Repository-relative path (`/`-separated)
    pub path: String,
    /// Type of change
    pub kind: EventKind,
}

/// Type of file system event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// File created, modified or renamed into place
    Modify,
    /// File deleted or renamed away
    Delete,
}

/// Watcher errors
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("file watcher error: {0}")]
    Notify(#[from] notify::Error),

    #[error("invalid ignore pattern: {0}")]
    Ignore(#[from] ::ignore::Error),

    #[error("failed to walk repository: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("file watcher stopped unexpectedly")]
    Disconnected,
}

/// Result type for watcher operations
pub type Result<T> = std::result::Result<T, WatchError>;

/// Path of `path` relative to `root`, joined with `/`
///
/// Returns `None` for the root itself and for paths outside it.
pub fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;

    let mut parts = Vec::new();
    for component in rel.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            _ => return None,
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Resolve the repository root the same way the OS watcher reports paths
pub fn canonical_root(root: &Path) -> Result<PathBuf> {
    Ok(root.canonicalize()?)
}
