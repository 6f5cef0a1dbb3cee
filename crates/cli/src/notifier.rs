//! Notifiers shown to the person running knifewatch

use knife::{Notifier, NotifyError, Severity};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::process::{Command, Stdio};
use tracing::debug;

/// Prints one colored line per outcome to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalNotifier;

impl TerminalNotifier {
    /// Write one notification line
    ///
    /// Write errors (a closed pipe, a full disk) are returned, never panicked on.
    pub fn write_line<W: Write>(
        out: &mut W,
        message: &str,
        severity: Severity,
        title: &str,
    ) -> io::Result<()> {
        let tag = format!("[{}]", title);
        match severity {
            Severity::Success => writeln!(out, "{} {}", tag.green(), message)?,
            Severity::Failure => writeln!(out, "{} {}", tag.red().bold(), message)?,
        }
        out.flush()
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, message: &str, severity: Severity, title: &str) -> Result<(), NotifyError> {
        Self::write_line(&mut io::stdout().lock(), message, severity, title)?;
        Ok(())
    }
}

/// Desktop notifications through `notify-send`
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    program: String,
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self {
            program: "notify-send".to_string(),
        }
    }
}

impl DesktopNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn urgency(severity: Severity) -> &'static str {
        match severity {
            Severity::Success => "normal",
            Severity::Failure => "critical",
        }
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, message: &str, severity: Severity, title: &str) -> Result<(), NotifyError> {
        let status = Command::new(&self.program)
            .args(["-a", title, "-u", Self::urgency(severity), title, message])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()?;

        if status.success() {
            debug!("Desktop notification sent ({})", severity);
            Ok(())
        } else {
            Err(NotifyError::Rejected(format!("{} exited with {}", self.program, status)))
        }
    }
}

/// Delivers to every inner notifier; the first error is returned after all ran
#[derive(Default)]
pub struct Fanout {
    notifiers: Vec<Box<dyn Notifier + Send>>,
}

impl Fanout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, notifier: impl Notifier + Send + 'static) -> Self {
        self.notifiers.push(Box::new(notifier));
        self
    }

    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

impl Notifier for Fanout {
    fn notify(&self, message: &str, severity: Severity, title: &str) -> Result<(), NotifyError> {
        let mut first_error = None;
        for notifier in &self.notifiers {
            if let Err(e) = notifier.notify(message, severity, title) {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
