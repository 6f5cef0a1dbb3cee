//! Batch engine
//!
//! One batch runs start to finish on the calling thread:
//! normalize, then classify → dispatch → execute → report for each
//! surviving path, in normalized order. A failing path never stops the rest.

use crate::executor::UploadExecutor;
use crate::notify::Notifier;
use crate::report::OutcomeReporter;
use kw_core::normalize::normalize_batch;
use kw_core::{classify, ActionDispatcher, ChangeEvent, ChangeKind, Configuration};
use std::ops::AddAssign;
use tracing::{debug, debug_span, info};

/// What happened to a single normalized path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathResult {
    /// Not a Chef resource; nothing was run
    Unmatched,
    Uploaded,
    Failed,
}

/// Counts for one or more batches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub uploaded: usize,
    pub failed: usize,
    pub unmatched: usize,
    pub skipped_transient: usize,
}

impl BatchSummary {
    pub fn record(&mut self, result: PathResult) {
        match result {
            PathResult::Unmatched => self.unmatched += 1,
            PathResult::Uploaded => self.uploaded += 1,
            PathResult::Failed => self.failed += 1,
        }
    }

    /// Number of uploads attempted
    pub fn attempted(&self) -> usize {
        self.uploaded + self.failed
    }

    /// True when no upload failed
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

impl AddAssign for BatchSummary {
    fn add_assign(&mut self, other: Self) {
        self.uploaded += other.uploaded;
        self.failed += other.failed;
        self.unmatched += other.unmatched;
        self.skipped_transient += other.skipped_transient;
    }
}

/// Classification and dispatch engine
///
/// Holds the read-only configuration (through the dispatcher) for its
/// whole lifetime; nothing else survives a batch.
#[derive(Debug)]
pub struct Engine<E, N> {
    dispatcher: ActionDispatcher,
    executor: E,
    reporter: OutcomeReporter<N>,
}

impl<E: UploadExecutor, N: Notifier> Engine<E, N> {
    pub fn new(config: Configuration, executor: E, notifier: N) -> Self {
        Self::with_dispatcher(ActionDispatcher::new(config), executor, notifier)
    }

    pub fn with_dispatcher(dispatcher: ActionDispatcher, executor: E, notifier: N) -> Self {
        Self {
            dispatcher,
            executor,
            reporter: OutcomeReporter::new(notifier),
        }
    }

    pub fn dispatcher(&self) -> &ActionDispatcher {
        &self.dispatcher
    }

    pub fn notifier(&self) -> &N {
        self.reporter.notifier()
    }

    /// Handle a batch of changed paths
    pub fn on_changed<S: AsRef<str>>(&self, paths: &[S]) -> BatchSummary {
        let batch = normalize_batch(paths);
        let mut summary = BatchSummary {
            skipped_transient: batch.transient,
            ..BatchSummary::default()
        };

        if batch.paths.is_empty() {
            debug!("Change batch of {} paths had nothing to process", paths.len());
            return summary;
        }

        debug!(
            "Processing {} candidate paths from a batch of {}",
            batch.paths.len(),
            paths.len()
        );

        for path in &batch.paths {
            summary.record(self.process_path(path));
        }

        info!(
            "Batch done: {} uploaded, {} failed, {} unmatched",
            summary.uploaded, summary.failed, summary.unmatched
        );
        summary
    }

    /// Handle a batch of deleted paths
    ///
    /// Deletions are accepted but never acted on; remote state is not pruned.
    pub fn on_deleted<S: AsRef<str>>(&self, paths: &[S]) -> BatchSummary {
        if !paths.is_empty() {
            debug!("Ignoring {} deleted paths", paths.len());
        }
        BatchSummary::default()
    }

    /// Handle a mixed batch, keeping the relative order within each kind
    pub fn handle(&self, events: &[ChangeEvent]) -> BatchSummary {
        let (changed, deleted): (Vec<&ChangeEvent>, Vec<&ChangeEvent>) = events
            .iter()
            .partition(|event| event.kind == ChangeKind::Modified);

        let changed: Vec<&str> = changed.iter().map(|e| e.path.as_str()).collect();
        let deleted: Vec<&str> = deleted.iter().map(|e| e.path.as_str()).collect();

        let mut summary = self.on_changed(&changed[..]);
        summary += self.on_deleted(&deleted[..]);
        summary
    }

    /// Classify, dispatch, execute and report one normalized path
    pub fn process_path(&self, path: &str) -> PathResult {
        let Some(reference) = classify(path).into_reference() else {
            debug!("Unmatched path: {}", path);
            return PathResult::Unmatched;
        };

        let span = debug_span!("upload", path = %path, resource = %reference);
        let _guard = span.enter();

        let command = self.dispatcher.command_for(&reference);
        let outcome = self.executor.execute(reference, &command);
        self.reporter.report(&outcome);

        if outcome.succeeded {
            PathResult::Uploaded
        } else {
            PathResult::Failed
        }
    }
}
