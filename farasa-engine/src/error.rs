//! Layered error types
//!
//! Every process-level failure names the task it belongs to so callers can
//! tell a crashed worker apart from bad input. Cache failures never appear
//! here; they are logged and treated as misses.

use crate::task::{ExecutionMode, Task};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// The interpreter or worker binary could not be started
    #[error("failed to launch `{program}` for task {task}: {source}")]
    Launch {
        /// Task whose worker was being started
        task: Task,
        /// Program that failed to start
        program: String,
        /// Underlying spawn error
        #[source]
        source: std::io::Error,
    },

    /// The resolved worker binary does not exist
    #[error("binary for task {task} not found at {}", path.display())]
    BinaryNotFound {
        /// Task the binary belongs to
        task: Task,
        /// Path that was checked
        path: PathBuf,
    },

    /// A standalone worker exited with a non-zero status
    #[error("task {task} worker exited with {}: {stderr}", code.map_or_else(|| "signal".to_string(), |c| format!("code {c}")))]
    Execution {
        /// Task that failed
        task: Task,
        /// Exit code, `None` if the worker was killed by a signal
        code: Option<i32>,
        /// Captured standard output
        stdout: String,
        /// Captured standard error
        stderr: String,
    },

    /// The interactive pipe failed even after one respawn
    #[error("pipe to task {task} worker failed in {mode} mode: {source}")]
    Pipe {
        /// Task that failed
        task: Task,
        /// Mode the worker was running in
        mode: ExecutionMode,
        /// Underlying pipe error
        #[source]
        source: std::io::Error,
    },

    /// The worker did not answer within the configured timeout
    #[error("task {task} worker timed out after {timeout:?} in {mode} mode")]
    Timeout {
        /// Task that timed out
        task: Task,
        /// Mode the worker was running in
        mode: ExecutionMode,
        /// Configured timeout
        timeout: Duration,
    },

    /// Interactive call before initialization or after termination
    #[error("interactive session for task {task} is not initialized")]
    NotInitialized {
        /// Task of the session
        task: Task,
    },

    /// Unusable input text
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// Why the input was rejected
        reason: String,
    },

    /// Configuration error
    #[error("invalid configuration: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding error (UTF-8)
    #[error("encoding error: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

impl EngineError {
    /// Whether the failure came from the worker process rather than the input
    pub fn is_worker_failure(&self) -> bool {
        matches!(
            self,
            EngineError::Launch { .. }
                | EngineError::Execution { .. }
                | EngineError::Pipe { .. }
                | EngineError::Timeout { .. }
        )
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_error_display() {
        let error = EngineError::Execution {
            task: Task::Stem,
            code: Some(2),
            stdout: String::new(),
            stderr: "missing model".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "task stem worker exited with code 2: missing model"
        );
        assert!(error.is_worker_failure());
    }

    #[test]
    fn test_execution_error_killed_by_signal() {
        let error = EngineError::Execution {
            task: Task::Ner,
            code: None,
            stdout: String::new(),
            stderr: String::new(),
        };
        assert!(error.to_string().contains("exited with signal"));
    }

    #[test]
    fn test_pipe_error_names_task_and_mode() {
        let error = EngineError::Pipe {
            task: Task::Pos,
            mode: ExecutionMode::Interactive,
            source: std::io::Error::from(std::io::ErrorKind::BrokenPipe),
        };
        let msg = error.to_string();
        assert!(msg.contains("POS"));
        assert!(msg.contains("interactive"));
    }

    #[test]
    fn test_input_errors_are_not_worker_failures() {
        let error = EngineError::InvalidInput {
            reason: "empty text".to_string(),
        };
        assert!(!error.is_worker_failure());
        assert_eq!(error.to_string(), "invalid input: empty text");
    }
}
