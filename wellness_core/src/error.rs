//! Error types for the wellness_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for wellness_core operations
///
/// "Not enough history yet" is never an error: components return `None`,
/// an empty series or a zero count for that.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A caller-supplied argument is out of its valid domain
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Unknown IANA timezone identifier
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }
}
