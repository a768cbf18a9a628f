//! Task processor and builder
//!
//! Binds a task and an execution mode to a worker command, consults the
//! cache, and routes misses to the configured executor.

use crate::{
    cache::CacheStore,
    command::{CommandDescriptor, Interpreter},
    config::{CacheSettings, EngineConfig},
    error::{EngineError, Result},
    executor::{Executor, InteractiveSession, StandaloneExecutor},
    runtime, ExecutionMode, Task,
};
use std::path::PathBuf;
use std::time::Duration;

/// One task bound to one executor
///
/// The mode is fixed at construction. In interactive mode the processor
/// owns exactly one worker process, primed before `new` returns.
pub struct TaskProcessor {
    task: Task,
    mode: ExecutionMode,
    executor: Box<dyn Executor>,
    cache: Option<CacheStore>,
}

impl std::fmt::Debug for TaskProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskProcessor")
            .field("task", &self.task)
            .field("mode", &self.mode)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl TaskProcessor {
    /// Create a processor for `task` with `config`
    pub fn new(task: Task, config: EngineConfig) -> Result<Self> {
        let mode = config.execution_mode;
        if mode == ExecutionMode::Interactive && !task.supports_interactive() {
            return Err(EngineError::Config(format!(
                "interactive mode is not supported for {task}; use standalone mode"
            )));
        }

        let command = CommandDescriptor::for_task(
            task,
            &config.interpreter,
            &config.bin_dir,
            config.binary_override.as_deref(),
        )?;

        if config.verify_runtime {
            tracing::debug!(%task, "checking interpreter version");
            runtime::check_java_version(command.program(), task)?;
        }
        command.ensure_binary_exists()?;

        let cache = open_cache(task, &config.cache);

        let executor: Box<dyn Executor> = match mode {
            ExecutionMode::Standalone => {
                tracing::info!(%task, "task initialized in standalone mode");
                Box::new(StandaloneExecutor::new(
                    command,
                    config.resolve_temp_dir(),
                    config.timeout,
                )?)
            }
            ExecutionMode::Interactive => {
                tracing::warn!(
                    "long lines may break interactive mode; use standalone mode for such input"
                );
                let mut session =
                    InteractiveSession::new(command, config.priming_token, config.timeout);
                session.initialize()?;
                tracing::info!(%task, "task initialized in interactive mode");
                Box::new(session)
            }
        };

        Ok(Self {
            task,
            mode,
            executor,
            cache,
        })
    }

    /// Create a processor around a caller-supplied executor
    pub fn with_executor(task: Task, executor: Box<dyn Executor>, cache: &CacheSettings) -> Self {
        Self {
            task,
            mode: executor.mode(),
            executor,
            cache: open_cache(task, cache),
        }
    }

    /// Task this processor runs
    pub fn task(&self) -> Task {
        self.task
    }

    /// Execution mode
    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Result cache, if enabled
    pub fn cache(&self) -> Option<&CacheStore> {
        self.cache.as_ref()
    }

    /// Run the task on `text`.
    ///
    /// The text is trimmed first; empty text is rejected. Cached results are
    /// returned without touching the worker.
    pub fn execute(&mut self, text: &str) -> Result<String> {
        let text = text.trim();
        if text.is_empty() {
            return Err(EngineError::InvalidInput {
                reason: "text is empty".to_string(),
            });
        }

        if let Some(hit) = self
            .cache
            .as_ref()
            .and_then(|cache| cache.lookup(self.task, self.mode, text))
        {
            return Ok(hit);
        }

        let output = self.executor.execute(text)?;

        if let Some(cache) = &self.cache {
            cache.store(self.task, self.mode, text, &output);
        }
        Ok(output)
    }

    /// Drop every cached result for this task
    pub fn clear_cache(&self) {
        match &self.cache {
            Some(cache) => cache.clear(self.task),
            None => tracing::info!(task = %self.task, "cache is disabled, nothing to clear"),
        }
    }

    /// Stop the worker, if any
    pub fn terminate(&mut self) {
        self.executor.terminate();
    }
}

fn open_cache(task: Task, settings: &CacheSettings) -> Option<CacheStore> {
    if !settings.enabled {
        return None;
    }
    let Some(root) = settings.resolve_root() else {
        tracing::warn!(%task, "no cache directory available; disabling cache");
        return None;
    };
    let store = CacheStore::new(root);
    match store.prepare(task) {
        Ok(()) => Some(store),
        Err(e) => {
            tracing::warn!(%task, "failed to set up cache directory: {e}; disabling cache");
            None
        }
    }
}

/// Builder for TaskProcessor
///
/// Provides a fluent interface over [`EngineConfig`].
pub struct TaskProcessorBuilder {
    task: Task,
    config: EngineConfig,
    executor: Option<Box<dyn Executor>>,
}

impl TaskProcessorBuilder {
    /// Create a new builder with the standalone preset
    pub fn new(task: Task) -> Self {
        Self {
            task,
            config: EngineConfig::default(),
            executor: None,
        }
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the execution mode
    pub fn execution_mode(mut self, mode: ExecutionMode) -> Self {
        self.config.execution_mode = mode;
        self
    }

    /// Shorthand for interactive or standalone mode
    pub fn interactive(self, interactive: bool) -> Self {
        self.execution_mode(if interactive {
            ExecutionMode::Interactive
        } else {
            ExecutionMode::Standalone
        })
    }

    /// Set the interpreter
    pub fn interpreter(mut self, interpreter: Interpreter) -> Self {
        self.config.interpreter = interpreter;
        self
    }

    /// Set the directory holding the bundled binaries
    pub fn bin_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.bin_dir = dir.into();
        self
    }

    /// Use an explicit worker binary
    pub fn binary(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.binary_override = Some(path.into());
        self
    }

    /// Enable or disable the result cache
    pub fn cache(mut self, enabled: bool) -> Self {
        self.config.cache.enabled = enabled;
        self
    }

    /// Set the cache root
    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.cache.root = Some(dir.into());
        self
    }

    /// Set the scratch directory for standalone temp files
    pub fn temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.temp_dir = Some(dir.into());
        self
    }

    /// Set the per-call timeout
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the priming line
    pub fn priming_token(mut self, token: impl Into<String>) -> Self {
        self.config.priming_token = token.into();
        self
    }

    /// Run the interpreter version preflight at build time
    pub fn verify_runtime(mut self, verify: bool) -> Self {
        self.config.verify_runtime = verify;
        self
    }

    /// Use a custom executor instead of spawning workers
    pub fn executor(mut self, executor: Box<dyn Executor>) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Build the processor
    pub fn build(self) -> Result<TaskProcessor> {
        match self.executor {
            Some(executor) => Ok(TaskProcessor::with_executor(
                self.task,
                executor,
                &self.config.cache,
            )),
            None => TaskProcessor::new(self.task, self.config),
        }
    }
}
