//! Standalone execution strategy
//!
//! One fresh worker process per request, exchanging data through a pair of
//! temporary files that are removed on every exit path.

use crate::{
    command::CommandDescriptor,
    error::{EngineError, Result},
    executor::Executor,
    process, ExecutionMode,
};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::{Builder, NamedTempFile};

/// File-based single-shot executor
///
/// Holds no state between calls; `run` can be called from many threads at
/// once because every call gets its own temp files and child process.
#[derive(Debug, Clone)]
pub struct StandaloneExecutor {
    command: CommandDescriptor,
    work_dir: PathBuf,
    timeout: Option<Duration>,
}

impl StandaloneExecutor {
    /// Create an executor writing its temp files under `work_dir`
    pub fn new(
        command: CommandDescriptor,
        work_dir: impl Into<PathBuf>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let work_dir = work_dir.into();
        fs::create_dir_all(&work_dir)?;
        Ok(Self {
            command,
            work_dir,
            timeout,
        })
    }

    /// Directory the temp files live in
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Run one request: `input` goes to the worker via `-i`, the trimmed
    /// contents of the `-o` file come back.
    pub fn run(&self, input: &[u8]) -> Result<String> {
        let task = self.command.task();
        let mut input_file = self.temp_file("farasa-in-")?;
        input_file.write_all(input)?;
        // The child opens the file by path; make the bytes visible first
        input_file.flush()?;
        let output_file = self.temp_file("farasa-out-")?;

        let cmd = self
            .command
            .to_command_with_files(input_file.path(), output_file.path());
        let completed = process::run_to_completion(cmd, task, self.timeout)?;

        if !completed.status.success() {
            tracing::error!(
                %task,
                code = ?completed.status.code(),
                stdout = %completed.stdout,
                stderr = %completed.stderr,
                "worker exited unsuccessfully"
            );
            return Err(EngineError::Execution {
                task,
                code: completed.status.code(),
                stdout: completed.stdout,
                stderr: completed.stderr,
            });
        }

        let bytes = fs::read(output_file.path())?;
        Ok(String::from_utf8(bytes)?.trim().to_string())
    }

    fn temp_file(&self, prefix: &str) -> Result<NamedTempFile> {
        Ok(Builder::new()
            .prefix(prefix)
            .suffix(".txt")
            .tempfile_in(&self.work_dir)?)
    }
}

impl Executor for StandaloneExecutor {
    fn execute(&mut self, text: &str) -> Result<String> {
        self.run(text.as_bytes())
    }

    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Standalone
    }
}
