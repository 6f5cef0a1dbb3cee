//! Full repository scan
//!
//! Walks the repository once and returns every file that passes the ignore
//! rules, for syncing a whole tree instead of waiting for changes.

use crate::ignore::IgnoreRules;
use crate::{relative_path, Result};
use kw_core::is_loose_cookbook_file;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// List repository-relative file paths under `root`, sorted by path
///
/// Files lying directly in `cookbooks/` are left out.
pub fn scan(root: &Path, rules: &IgnoreRules) -> Result<Vec<String>> {
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| match relative_path(root, entry.path()) {
            Some(rel) => !rules.should_ignore(&rel),
            None => true, // root itself
        });

    for entry in walker {
        let entry = entry?;

        // Only files
        if !entry.file_type().is_file() {
            continue;
        }

        if let Some(rel) = relative_path(root, entry.path()) {
            if !is_loose_cookbook_file(&rel) {
                files.push(rel);
            }
        }
    }

    debug!("Scanned {} files under {}", files.len(), root.display());
    Ok(files)
}
