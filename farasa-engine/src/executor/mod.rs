//! Execution strategies for worker requests

use crate::error::Result;
use crate::ExecutionMode;

pub mod interactive;
pub mod standalone;

// Re-export executors
pub use interactive::{InteractiveSession, SessionStatus};
pub use standalone::StandaloneExecutor;

/// Pluggable execution strategy behind a task processor
///
/// Takes `&mut self`: one executor serves one request at a time, so callers
/// sharing a processor must serialize access themselves.
pub trait Executor: Send {
    /// Run the worker on already-trimmed, non-empty text and return its raw output
    fn execute(&mut self, text: &str) -> Result<String>;

    /// Get the execution mode
    fn mode(&self) -> ExecutionMode;

    /// Release any worker process held by this executor
    fn terminate(&mut self) {}
}
