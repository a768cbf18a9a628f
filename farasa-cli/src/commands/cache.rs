//! Cache command implementation

use crate::error::CliError;
use anyhow::Result;
use clap::{Args, Subcommand};
use farasa_api::{CacheSettings, CacheStore, Task};
use std::path::PathBuf;

/// Cache subcommands
#[derive(Debug, Subcommand)]
pub enum CacheCommands {
    /// Show entry counts and sizes
    Info(CacheArgs),

    /// Delete cached results
    Clear(CacheArgs),
}

/// Arguments shared by the cache subcommands
#[derive(Debug, Args)]
pub struct CacheArgs {
    /// Restrict to one task (default: all tasks)
    #[arg(value_name = "TASK")]
    pub task: Option<Task>,

    /// Cache directory
    #[arg(long, value_name = "DIR", env = "FARASA_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,
}

impl CacheArgs {
    fn store(&self) -> Result<CacheStore> {
        let settings = CacheSettings {
            enabled: true,
            root: self.cache_dir.clone(),
        };
        let root = settings.resolve_root().ok_or(CliError::CacheUnavailable)?;
        Ok(CacheStore::new(root))
    }

    fn tasks(&self) -> Vec<Task> {
        match self.task {
            Some(task) => vec![task],
            None => Task::ALL.to_vec(),
        }
    }
}

impl CacheCommands {
    /// Execute the cache subcommand
    pub fn execute(&self) -> Result<()> {
        match self {
            CacheCommands::Info(args) => {
                let store = args.store()?;
                println!("Cache directory: {}", store.root().display());
                for task in args.tasks() {
                    let stats = store.stats(task);
                    println!(
                        "  {:<12} {:>8} entries {:>12} bytes",
                        task.as_str(),
                        stats.entries,
                        stats.bytes
                    );
                }
            }
            CacheCommands::Clear(args) => {
                let store = args.store()?;
                for task in args.tasks() {
                    store.clear(task);
                    println!("Cleared {task} cache");
                }
            }
        }
        Ok(())
    }
}
