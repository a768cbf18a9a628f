//! Process orchestration for the Farasa Arabic NLP toolkit
//!
//! This crate drives the toolkit's external worker binaries, either as one
//! fresh process per request (standalone mode) or as a long-lived process
//! speaking a line protocol (interactive mode), and memoizes their outputs
//! in a content-addressed on-disk cache.

#![warn(missing_docs)]

pub mod cache;
pub mod command;
pub mod config;
pub mod error;
pub mod executor;
pub mod process;
pub mod processor;
pub mod runtime;
pub mod task;

// Re-export key types
pub use cache::{CacheStats, CacheStore};
pub use command::{CommandDescriptor, Interpreter};
pub use config::{CacheSettings, EngineConfig};
pub use error::{EngineError, Result};
pub use executor::{Executor, InteractiveSession, SessionStatus, StandaloneExecutor};
pub use processor::{TaskProcessor, TaskProcessorBuilder};
pub use task::{ExecutionMode, Task};
