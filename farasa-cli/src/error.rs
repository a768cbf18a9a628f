//! Error handling for the CLI application

use std::fmt;

/// Custom error type for CLI-specific errors
#[derive(Debug)]
pub enum CliError {
    /// Glob patterns matched no files
    NoFilesMatched(String),
    /// Neither files, `--text` nor piped stdin were given
    NoInput,
    /// Configuration error
    ConfigError(String),
    /// No cache directory could be determined
    CacheUnavailable,
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NoFilesMatched(patterns) => {
                write!(f, "No files found matching: {patterns}")
            }
            CliError::NoInput => write!(f, "No input given: use -i, --text or pipe text on stdin"),
            CliError::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
            CliError::CacheUnavailable => {
                write!(f, "No cache directory available: pass --cache-dir")
            }
        }
    }
}

impl std::error::Error for CliError {}

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, anyhow::Error>;
