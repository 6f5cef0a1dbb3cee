//! Path normalization for one change batch
//!
//! Turns the raw paths delivered by the watcher into the candidate list the
//! classifier sees:
//! 1. Editor artifacts (swap, backup, lock files) are dropped
//! 2. Anything under `cookbooks/<name>/` collapses to `cookbooks/<name>`
//! 3. Exact duplicates are removed, first occurrence wins

use ahash::AHashSet;

const COOKBOOKS_PREFIX: &str = "cookbooks/";

/// Normalized paths plus how many raw paths were dropped as editor artifacts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedBatch {
    pub paths: Vec<String>,
    pub transient: usize,
}

/// Normalize a batch of raw paths, keeping first-seen order
pub fn normalize<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    normalize_batch(raw).paths
}

/// Same as [`normalize`] but also reports dropped editor artifacts
pub fn normalize_batch<I, S>(raw: I) -> NormalizedBatch
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = AHashSet::new();
    let mut batch = NormalizedBatch::default();

    for path in raw {
        let Some(cleaned) = clean_path(path.as_ref()) else {
            continue;
        };

        if is_transient(&cleaned) {
            batch.transient += 1;
            continue;
        }

        let candidate = collapse_cookbook(&cleaned).unwrap_or(cleaned);
        if seen.insert(candidate.clone()) {
            batch.paths.push(candidate);
        }
    }

    batch
}

/// Check if the final path segment is an editor or OS artifact
///
/// Covers: Vim swap/backup/write-test files, Emacs autosave and lock files,
/// MacOS metadata.
pub fn is_transient(path: &str) -> bool {
    let filename = path.rsplit('/').next().unwrap_or(path);

    // Vim swap files (.swp, .swo, .swn, .swm)
    if filename.ends_with(".swp")
        || filename.ends_with(".swo")
        || filename.ends_with(".swn")
        || filename.ends_with(".swm") {
        return true;
    }

    // Vim write test file
    if filename == "4913" {
        return true;
    }

    // Vim/Emacs backup files (~)
    if filename.ends_with('~') {
        return true;
    }

    // Emacs auto-save files (#*#)
    if filename.len() > 1 && filename.starts_with('#') && filename.ends_with('#') {
        return true;
    }

    // Emacs lock files (.#*)
    if filename.starts_with(".#") {
        return true;
    }

    filename == ".DS_Store"
}

/// Check if a known file path sits directly in `cookbooks/`
///
/// `cookbooks/README.md` or `cookbooks/chefignore` belong to no cookbook.
/// Only meaningful for sources that report files; a bare `cookbooks/<name>`
/// from the command line names a whole cookbook.
pub fn is_loose_cookbook_file(path: &str) -> bool {
    path.strip_prefix(COOKBOOKS_PREFIX)
        .is_some_and(|rest| !rest.is_empty() && !rest.contains('/'))
}

fn clean_path(raw: &str) -> Option<String> {
    let unified = raw.replace('\\', "/");
    let mut path = unified.as_str();

    while let Some(rest) = path.strip_prefix("./") {
        path = rest;
    }
    let path = path.trim_end_matches('/');

    if path.trim_matches('/').is_empty() || path == "." {
        return None;
    }

    Some(path.to_string())
}

/// `cookbooks/<name>/anything` -> `cookbooks/<name>`
fn collapse_cookbook(path: &str) -> Option<String> {
    let rest = path.strip_prefix(COOKBOOKS_PREFIX)?;
    let (name, _) = rest.split_once('/')?;
    if name.is_empty() {
        return None;
    }
    Some(format!("{}{}", COOKBOOKS_PREFIX, name))
}
