//! Configuration module
//!
//! Optional TOML file whose values act as defaults for command-line flags.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration structure
#[derive(Debug, Deserialize, Serialize, Default, PartialEq)]
pub struct CliConfig {
    /// Worker runtime configuration
    #[serde(default)]
    pub runtime: RuntimeConfig,

    /// Result cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

impl CliConfig {
    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Load `path` if given, else defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

/// Worker runtime configuration
#[derive(Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Interpreter command line, program first
    pub interpreter: Option<Vec<String>>,

    /// Directory holding the toolkit binaries
    pub bin_dir: Option<PathBuf>,

    /// Keep one worker alive per task
    pub interactive: bool,

    /// Per-call timeout in milliseconds
    pub timeout_ms: Option<u64>,

    /// Scratch directory for standalone temp files
    pub temp_dir: Option<PathBuf>,

    /// Check the Java version before starting workers
    pub verify_java: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            interpreter: None,
            bin_dir: None,
            interactive: false,
            timeout_ms: None,
            temp_dir: None,
            verify_java: true,
        }
    }
}

/// Result cache configuration
#[derive(Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct CacheConfig {
    /// Memoize worker outputs on disk
    pub enabled: bool,

    /// Cache root
    pub dir: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: None,
        }
    }
}

/// Output-related configuration
#[derive(Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format
    pub format: String,

    /// Pretty print JSON output
    pub pretty_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
            pretty_json: true,
        }
    }
}
