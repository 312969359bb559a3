//! Error types for the Weave command engine.

use std::path::PathBuf;
use thiserror::Error;

/// Persistence-related errors
///
/// Raised while a Reference is being finalized or written. Any of these aborts the
/// in-flight `store` call before the token index is touched.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Decorator '{decorator}' failed: {message}")]
    Decorator { decorator: String, message: String },

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Command and routing errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Execution failed: {0}")]
    Execution(String),

    #[error("Command '{command}' timed out after {seconds}s")]
    Timeout { command: String, seconds: u64 },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unknown command: {0}. Run `weave list` to see available commands.")]
    UnknownCommand(String),

    #[error("Failed to load command module {path}: {message}")]
    CommandLoad { path: PathBuf, message: String },

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),
}

impl ApiError {
    /// Short stable category name, used in summaries and logs.
    pub fn category(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "not_found",
            ApiError::Validation(_) => "validation",
            ApiError::Execution(_) => "execution",
            ApiError::Timeout { .. } => "timeout",
            ApiError::ConfigError(_) | ApiError::CommandLoad { .. } => "configuration",
            ApiError::UnknownCommand(_) => "unknown_command",
            ApiError::StorageError(_) => "storage",
        }
    }

    /// Process exit code for this error category. Always non-zero.
    pub fn exit_code(&self) -> i32 {
        match self {
            ApiError::NotFound(_) => 3,
            ApiError::Validation(_) => 4,
            ApiError::Execution(_) => 5,
            ApiError::Timeout { .. } => 6,
            ApiError::ConfigError(_) | ApiError::CommandLoad { .. } => 7,
            ApiError::UnknownCommand(_) => 2,
            ApiError::StorageError(_) => 1,
        }
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<regex::Error> for ApiError {
    fn from(err: regex::Error) -> Self {
        ApiError::Validation(format!("Invalid pattern: {}", err))
    }
}
