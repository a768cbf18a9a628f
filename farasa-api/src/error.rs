//! API error types

use farasa_engine::{EngineError, Task};
use thiserror::Error;

/// API-level errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// Engine error
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// I/O error while reading input
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 conversion error
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Worker output could not be parsed into structured tokens
    #[error("malformed {task} output: {reason}")]
    Parse {
        /// Task whose output was being parsed
        task: Task,
        /// What was wrong with it
        reason: String,
    },
}

/// Result type for API operations
pub type Result<T> = std::result::Result<T, ApiError>;
