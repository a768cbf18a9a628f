//! High-level configuration API

use crate::error::{ApiError, Result};
use farasa_engine::{EngineConfig, ExecutionMode, Interpreter};
use std::path::PathBuf;
use std::time::Duration;

/// High-level configuration shared by every task facade
#[derive(Debug, Clone, Default)]
pub struct Config {
    inner: EngineConfig,
}

impl Config {
    /// Create a standalone configuration
    pub fn standalone() -> Self {
        Self {
            inner: EngineConfig::standalone(),
        }
    }

    /// Create an interactive configuration
    pub fn interactive() -> Self {
        Self {
            inner: EngineConfig::interactive(),
        }
    }

    /// Create a builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Execution mode
    pub fn execution_mode(&self) -> ExecutionMode {
        self.inner.execution_mode
    }

    /// Underlying engine configuration
    pub fn engine(&self) -> &EngineConfig {
        &self.inner
    }

    /// Consume into the engine configuration
    pub fn into_engine(self) -> EngineConfig {
        self.inner
    }
}

impl From<EngineConfig> for Config {
    fn from(inner: EngineConfig) -> Self {
        Self { inner }
    }
}

/// Configuration builder
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Run in interactive (`true`) or standalone (`false`) mode
    pub fn interactive(mut self, interactive: bool) -> Self {
        self.config.inner.execution_mode = if interactive {
            ExecutionMode::Interactive
        } else {
            ExecutionMode::Standalone
        };
        self
    }

    /// Use an explicit worker binary instead of the bundled one
    pub fn binary_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.inner.binary_override = Some(path.into());
        self
    }

    /// Directory holding the extracted toolkit binaries
    pub fn bin_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.inner.bin_dir = dir.into();
        self
    }

    /// Enable or disable the result cache
    pub fn cache(mut self, enabled: bool) -> Self {
        self.config.inner.cache.enabled = enabled;
        self
    }

    /// Cache root override
    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.inner.cache.root = Some(dir.into());
        self
    }

    /// Scratch directory for standalone temp files
    pub fn temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.inner.temp_dir = Some(dir.into());
        self
    }

    /// Per-call timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.inner.timeout = Some(timeout);
        self
    }

    /// Interpreter used to run the binaries
    pub fn interpreter(mut self, interpreter: Interpreter) -> Self {
        self.config.inner.interpreter = interpreter;
        self
    }

    /// Priming line for interactive workers
    pub fn priming_token(mut self, token: impl Into<String>) -> Self {
        self.config.inner.priming_token = token.into();
        self
    }

    /// Check the interpreter version when a facade is created
    pub fn verify_runtime(mut self, verify: bool) -> Self {
        self.config.inner.verify_runtime = verify;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<Config> {
        let inner = &self.config.inner;
        if inner.interpreter.program.trim().is_empty() {
            return Err(ApiError::Config("interpreter program is empty".to_string()));
        }
        if inner.timeout.is_some_and(|t| t.is_zero()) {
            return Err(ApiError::Config("timeout must be non-zero".to_string()));
        }
        let token = inner.priming_token.trim();
        if token.is_empty() || token.contains('\n') {
            return Err(ApiError::Config(
                "priming token must be a single non-empty line".to_string(),
            ));
        }
        if let Some(path) = &inner.binary_override {
            if !path.is_file() {
                return Err(ApiError::Config(format!(
                    "binary {} not found",
                    path.display()
                )));
            }
        }
        Ok(self.config)
    }
}
