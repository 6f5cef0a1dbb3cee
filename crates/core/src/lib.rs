//! Change classification for Chef repositories
//!
//! This crate provides:
//! - Change events and typed resource references
//! - Path normalization (transient files, cookbook collapsing, dedup)
//! - Ordered path classification into resource references
//! - Knife command construction from references and configuration

pub mod classify;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod normalize;
pub mod reference;

// Re-exports
pub use classify::{classify, Classification};
pub use config::Configuration;
pub use dispatch::{ActionDispatcher, CommandSpec};
pub use error::{ConfigError, Result};
pub use normalize::{is_loose_cookbook_file, is_transient, normalize};
pub use reference::{ChangeEvent, ChangeKind, ResourceReference, UploadOutcome};
