//! Knife integration for change batches
//!
//! This crate provides:
//! - Upload execution (`knife` as a child process, or a dry run)
//! - The notifier capability and outcome reporting
//! - The batch engine tying normalize → classify → dispatch → execute → report

pub mod engine;
pub mod executor;
pub mod notify;
pub mod report;

// Re-exports
pub use engine::{BatchSummary, Engine, PathResult};
pub use executor::{DryRunExecutor, ProcessExecutor, UploadExecutor};
pub use notify::{LogNotifier, NotifyError, Notifier, Severity};
pub use report::{OutcomeReporter, NOTIFICATION_TITLE};
