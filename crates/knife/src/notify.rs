//! Notifier capability
//!
//! The display surface is injected; this crate only defines the contract.

use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Success,
    Failure,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Success => write!(f, "success"),
            Severity::Failure => write!(f, "failure"),
        }
    }
}

/// Errors a notifier may return; the reporter never propagates them
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notifier I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("notifier rejected message: {0}")]
    Rejected(String),
}

/// Something that can show a message to the user
pub trait Notifier {
    fn notify(&self, message: &str, severity: Severity, title: &str) -> Result<(), NotifyError>;
}

impl<T: Notifier + ?Sized> Notifier for Box<T> {
    fn notify(&self, message: &str, severity: Severity, title: &str) -> Result<(), NotifyError> {
        (**self).notify(message, severity, title)
    }
}

impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    fn notify(&self, message: &str, severity: Severity, title: &str) -> Result<(), NotifyError> {
        (**self).notify(message, severity, title)
    }
}

impl<T: Notifier + ?Sized> Notifier for &T {
    fn notify(&self, message: &str, severity: Severity, title: &str) -> Result<(), NotifyError> {
        (**self).notify(message, severity, title)
    }
}

/// Sends notifications to the tracing log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str, severity: Severity, title: &str) -> Result<(), NotifyError> {
        match severity {
            Severity::Success => info!("[{}] {}", title, message),
            Severity::Failure => error!("[{}] {}", title, message),
        }
        Ok(())
    }
}
