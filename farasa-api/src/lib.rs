//! Public API for the Farasa Arabic NLP toolkit
//!
//! Each linguistic task gets its own facade (`Segmenter`, `Stemmer`,
//! `PosTagger`, ...) that hides worker processes, temp files and the result
//! cache behind a single blocking call.
//!
//! ```no_run
//! use farasa_api::{Config, Stemmer};
//!
//! let mut stemmer = Stemmer::with_config(Config::interactive())?;
//! println!("{}", stemmer.stem("يستخدم البرنامج")?);
//! # Ok::<(), farasa_api::ApiError>(())
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod dto;
pub mod error;
pub mod postprocess;
pub mod tasks;

// Re-export key types
pub use config::{Config, ConfigBuilder};
pub use dto::{DependencyToken, Input, ProcessedTag, TaggedToken};
pub use error::{ApiError, Result};
pub use tasks::{
    run_task, DependencyParser, Diacritizer, Lemmatizer, NamedEntityRecognizer, PosTagger,
    Segmenter, SpellChecker, Stemmer,
};

pub use farasa_engine::runtime::{check_java_version, JavaVersion, MIN_JAVA_VERSION};
pub use farasa_engine::{
    CacheSettings, CacheStats, CacheStore, CommandDescriptor, EngineConfig, EngineError,
    ExecutionMode, Interpreter, Task, TaskProcessor,
};
