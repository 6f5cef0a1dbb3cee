//! Knifewatch CLI internals
//!
//! Settings, notifiers, logging setup and the command implementations
//! behind the `knifewatch` binary.

pub mod app;
pub mod cmd;
pub mod logging;
pub mod notifier;
pub mod settings;
