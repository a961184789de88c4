//! Error types for store operations

use thiserror::Error;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors raised by a key-value store backend
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    /// Could not reach or authenticate against the backend
    #[error("store connection failed: {message}")]
    Connection { message: String },

    /// Backend rejected or failed a command
    #[error("store command failed on key '{key}': {message}")]
    Command { key: String, message: String },

    /// Invalid backend configuration
    #[error("invalid store configuration: {message}")]
    InvalidConfig { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub(crate) fn command(key: &str, err: impl std::fmt::Display) -> Self {
        Self::Command {
            key: key.to_string(),
            message: err.to_string(),
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Connection {
            message: e.to_string(),
        }
    }
}

impl From<fred::error::Error> for StoreError {
    fn from(e: fred::error::Error) -> Self {
        StoreError::Connection {
            message: e.to_string(),
        }
    }
}
