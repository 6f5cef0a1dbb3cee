//! CLI command implementations

pub mod classify;
pub mod config;
pub mod sync;
pub mod upload;
pub mod watch;
