//! Error types for configuration handling

use thiserror::Error;

/// Errors raised while building a [`Configuration`](crate::Configuration)
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A recognized option was present but empty
    #[error("option `{key}` must not be empty")]
    EmptyValue { key: String },
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, ConfigError>;
