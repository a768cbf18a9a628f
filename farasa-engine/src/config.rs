//! Configuration types for the engine

use crate::command::Interpreter;
use crate::ExecutionMode;
use std::path::PathBuf;
use std::time::Duration;

/// Word sent to a fresh interactive worker to absorb model loading
pub const DEFAULT_PRIMING_TOKEN: &str = "اختبار";

/// Folder name appended to the OS cache and data directories
pub const APP_DIR_NAME: &str = "farasa";

/// Result cache settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    /// Whether results are memoized at all
    pub enabled: bool,
    /// Cache root override (None = OS cache dir)
    pub root: Option<PathBuf>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            root: None,
        }
    }
}

impl CacheSettings {
    /// Settings with caching switched off
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            root: None,
        }
    }

    /// Cache root in effect: the override, else `<os cache dir>/farasa`
    pub fn resolve_root(&self) -> Option<PathBuf> {
        self.root
            .clone()
            .or_else(|| dirs::cache_dir().map(|dir| dir.join(APP_DIR_NAME)))
    }
}

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Execution mode, fixed for the lifetime of a processor
    pub execution_mode: ExecutionMode,
    /// Interpreter used to run the worker binaries
    pub interpreter: Interpreter,
    /// Directory holding the bundled binaries
    pub bin_dir: PathBuf,
    /// Explicit binary path, overrides the bundled one
    pub binary_override: Option<PathBuf>,
    /// Result cache settings
    pub cache: CacheSettings,
    /// Scratch directory for standalone temp files (None = OS temp dir)
    pub temp_dir: Option<PathBuf>,
    /// Per-call timeout (None = block until the worker answers)
    pub timeout: Option<Duration>,
    /// Priming line sent when an interactive worker starts
    pub priming_token: String,
    /// Run the interpreter version preflight at construction
    pub verify_runtime: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            execution_mode: ExecutionMode::Standalone,
            interpreter: Interpreter::default(),
            bin_dir: default_bin_dir(),
            binary_override: None,
            cache: CacheSettings::default(),
            temp_dir: None,
            timeout: None,
            priming_token: DEFAULT_PRIMING_TOKEN.to_string(),
            verify_runtime: true,
        }
    }
}

impl EngineConfig {
    /// Create a standalone configuration
    pub fn standalone() -> Self {
        Self::default()
    }

    /// Create an interactive configuration
    pub fn interactive() -> Self {
        Self {
            execution_mode: ExecutionMode::Interactive,
            ..Self::default()
        }
    }

    /// Scratch directory in effect for standalone temp files
    pub fn resolve_temp_dir(&self) -> PathBuf {
        self.temp_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(APP_DIR_NAME))
    }
}

/// Default location of the extracted toolkit archive
pub fn default_bin_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
        .join("farasa_bin")
}
