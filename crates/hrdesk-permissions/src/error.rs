//! Error types for the permissions system

use thiserror::Error;

/// Result type for permissions operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the collaborators around the evaluator.
///
/// The evaluator itself is total and never produces one of these.
#[derive(Error, Debug)]
pub enum Error {
    /// Deliberately carries no page, action or reason.
    #[error("Access denied")]
    AccessDenied,

    #[error("Role not found: {0}")]
    RoleNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}
