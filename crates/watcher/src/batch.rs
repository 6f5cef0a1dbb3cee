//! Debounced change batches
//!
//! Raw notify events are collected until the repository has been quiet for
//! the debounce window, then handed out as one batch of changed and deleted
//! paths in first-seen order.

use crate::ignore::{IgnoreConfig, IgnoreRules};
use crate::{canonical_root, relative_path, EventKind, Result, WatchError, WatchEvent};
use crossbeam_channel::{Receiver, RecvTimeoutError};
use kw_core::{is_loose_cookbook_file, ChangeEvent};
use notify::event::ModifyKind;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// A batch is flushed after this many debounce windows even if events keep coming
const MAX_WINDOWS_PER_BATCH: u32 = 10;

/// Watcher options
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Quiet period that closes a batch
    pub debounce: Duration,
    pub ignore: IgnoreConfig,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(200),
            ignore: IgnoreConfig::default(),
        }
    }
}

/// Changed and deleted paths from one quiet period
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeBatch {
    pub changed: Vec<String>,
    pub deleted: Vec<String>,
}

impl ChangeBatch {
    /// Record an event; the latest kind for a path wins
    pub fn push(&mut self, event: WatchEvent) {
        match event.kind {
            EventKind::Modify => {
                self.deleted.retain(|p| *p != event.path);
                if !self.changed.contains(&event.path) {
                    self.changed.push(event.path);
                }
            }
            EventKind::Delete => {
                self.changed.retain(|p| *p != event.path);
                if !self.deleted.contains(&event.path) {
                    self.deleted.push(event.path);
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.changed.is_empty() && self.deleted.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changed.len() + self.deleted.len()
    }

    /// Flatten into engine change events, changed paths first
    pub fn events(&self) -> Vec<ChangeEvent> {
        self.changed
            .iter()
            .map(ChangeEvent::modified)
            .chain(self.deleted.iter().map(ChangeEvent::deleted))
            .collect()
    }
}

/// Recursive watcher over a repository root
pub struct RepoWatcher {
    root: PathBuf,
    rules: IgnoreRules,
    debounce: Duration,
    events: Receiver<notify::Result<notify::Event>>,
    /// Keep alive: dropping the watcher stops OS notifications
    _watcher: RecommendedWatcher,
}

impl RepoWatcher {
    /// Start watching `root` recursively
    pub fn start(root: &Path, options: WatchOptions) -> Result<Self> {
        let root = canonical_root(root)?;
        let rules = IgnoreRules::load(&root, options.ignore)?;

        let (tx, rx) = crossbeam_channel::unbounded::<notify::Result<notify::Event>>();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            let _ = tx.send(res);
        })?;
        watcher.watch(&root, RecursiveMode::Recursive)?;

        info!(
            "Watching {} ({} ignore sources, debounce {:?})",
            root.display(),
            rules.active_sources(),
            options.debounce
        );

        Ok(Self {
            root,
            rules,
            debounce: options.debounce,
            events: rx,
            _watcher: watcher,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Wait up to `timeout` for activity, then collect one batch
    ///
    /// Returns `Ok(None)` when nothing relevant happened.
    pub fn next_batch(&self, timeout: Duration) -> Result<Option<ChangeBatch>> {
        let first = match self.events.recv_timeout(timeout) {
            Ok(event) => event,
            Err(RecvTimeoutError::Timeout) => return Ok(None),
            Err(RecvTimeoutError::Disconnected) => return Err(WatchError::Disconnected),
        };

        let mut batch = ChangeBatch::default();
        self.absorb(first, &mut batch);

        let cutoff = Instant::now() + self.debounce * MAX_WINDOWS_PER_BATCH;
        loop {
            if Instant::now() >= cutoff {
                debug!("Flushing batch early; repository still busy");
                break;
            }
            match self.events.recv_timeout(self.debounce) {
                Ok(event) => self.absorb(event, &mut batch),
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        if batch.is_empty() {
            Ok(None)
        } else {
            debug!("Collected batch: {} changed, {} deleted", batch.changed.len(), batch.deleted.len());
            Ok(Some(batch))
        }
    }

    fn absorb(&self, event: notify::Result<notify::Event>, batch: &mut ChangeBatch) {
        let event = match event {
            Ok(event) => event,
            Err(e) => {
                warn!("Watcher error: {}", e);
                return;
            }
        };

        for path in &event.paths {
            let Some(rel) = relative_path(&self.root, path) else {
                continue;
            };
            if self.rules.should_ignore(&rel) || is_loose_cookbook_file(&rel) {
                continue;
            }
            if let Some(kind) = classify_kind(&event.kind, path) {
                batch.push(WatchEvent { path: rel, kind });
            }
        }
    }
}

/// Map a notify event kind onto a change kind
///
/// Directory-level events are dropped; the files inside report their own.
fn classify_kind(kind: &notify::EventKind, path: &Path) -> Option<EventKind> {
    use notify::EventKind as N;

    match kind {
        N::Remove(_) => Some(EventKind::Delete),
        N::Access(_) | N::Other => None,
        N::Modify(ModifyKind::Name(_)) | N::Any => {
            if path.exists() {
                file_change(path)
            } else {
                Some(EventKind::Delete)
            }
        }
        N::Create(_) | N::Modify(_) => file_change(path),
    }
}

fn file_change(path: &Path) -> Option<EventKind> {
    if path.is_dir() {
        None
    } else {
        Some(EventKind::Modify)
    }
}
