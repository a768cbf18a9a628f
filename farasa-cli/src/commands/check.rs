//! Check command implementation

use super::{init_logging, parse_interpreter_line};
use crate::error::CliError;
use anyhow::Result;
use clap::Args;
use farasa_api::{
    check_java_version, CommandDescriptor, Config, Interpreter, Task, MIN_JAVA_VERSION,
};
use std::path::{Path, PathBuf};

/// Arguments for the check command
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Interpreter command line (default: java -Dfile.encoding=UTF-8 -jar)
    #[arg(long, value_name = "COMMAND")]
    pub interpreter: Option<String>,

    /// Directory holding the toolkit binaries
    #[arg(long, value_name = "DIR", env = "FARASA_BIN_DIR")]
    pub bin_dir: Option<PathBuf>,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Presence of one task's binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinaryStatus {
    /// Bundled binary exists
    Found(PathBuf),
    /// Bundled binary is expected but absent
    Missing(PathBuf),
    /// Not shipped with the toolkit; `--binary` is needed
    NotBundled,
}

/// Resolve the bundled binary of `task` under `bin_dir`
pub fn binary_status(task: Task, interpreter: &Interpreter, bin_dir: &Path) -> BinaryStatus {
    match CommandDescriptor::for_task(task, interpreter, bin_dir, None) {
        Ok(command) if command.binary().is_file() => {
            BinaryStatus::Found(command.binary().to_path_buf())
        }
        Ok(command) => BinaryStatus::Missing(command.binary().to_path_buf()),
        Err(_) => BinaryStatus::NotBundled,
    }
}

impl CheckArgs {
    /// Execute the check command
    pub fn execute(&self) -> Result<()> {
        init_logging(self.verbose, false);

        let interpreter = match &self.interpreter {
            Some(line) => parse_interpreter_line(line)?,
            None => Interpreter::default(),
        };
        let bin_dir = match &self.bin_dir {
            Some(dir) => dir.clone(),
            None => Config::default().engine().bin_dir.clone(),
        };

        let java_ok = match check_java_version(&interpreter.program, Task::Segment) {
            Ok(Some(version)) if version.is_supported() => {
                println!("Java: {} (ok)", version.number);
                true
            }
            Ok(Some(version)) => {
                println!(
                    "Java: {} (too old, {MIN_JAVA_VERSION} or above required)",
                    version.number
                );
                true
            }
            Ok(None) => {
                println!("Java: {} runs, version unknown", interpreter.program);
                true
            }
            Err(e) => {
                println!("Java: not available ({e})");
                false
            }
        };

        println!("Binary directory: {}", bin_dir.display());
        for task in Task::ALL {
            let status = match binary_status(task, &interpreter, &bin_dir) {
                BinaryStatus::Found(path) => format!("found {}", path.display()),
                BinaryStatus::Missing(path) => format!("missing {}", path.display()),
                BinaryStatus::NotBundled => "not bundled, use --binary".to_string(),
            };
            println!("  {:<12} {status}", task.as_str());
        }

        if !java_ok {
            return Err(CliError::ConfigError(format!(
                "interpreter '{}' could not be started",
                interpreter.program
            ))
            .into());
        }
        Ok(())
    }
}
