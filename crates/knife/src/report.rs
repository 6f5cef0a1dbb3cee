//! Outcome reporting

use crate::notify::{Notifier, Severity};
use kw_core::UploadOutcome;
use tracing::warn;

/// Title attached to every notification
pub const NOTIFICATION_TITLE: &str = "Knife";

/// Turns upload outcomes into notifications
#[derive(Debug)]
pub struct OutcomeReporter<N> {
    notifier: N,
}

impl<N: Notifier> OutcomeReporter<N> {
    pub fn new(notifier: N) -> Self {
        Self { notifier }
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Message text for an outcome
    pub fn message_for(outcome: &UploadOutcome) -> String {
        let reference = &outcome.reference;
        if outcome.succeeded {
            format!("Uploaded {} {}", reference.kind_label(), reference.identifier())
        } else {
            format!(
                "Failed to upload {} {} ({})",
                reference.kind_label(),
                reference.identifier(),
                outcome.exit_message
            )
        }
    }

    /// Forward an outcome to the notifier
    ///
    /// Notifier errors are logged and dropped.
    pub fn report(&self, outcome: &UploadOutcome) {
        let severity = if outcome.succeeded {
            Severity::Success
        } else {
            Severity::Failure
        };
        let message = Self::message_for(outcome);

        if let Err(e) = self.notifier.notify(&message, severity, NOTIFICATION_TITLE) {
            warn!("Failed to deliver notification '{}': {}", message, e);
        }
    }
}
