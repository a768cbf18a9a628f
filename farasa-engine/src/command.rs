//! Command descriptors for the worker binaries

use crate::error::{EngineError, Result};
use crate::Task;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Program and flags that run a worker binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpreter {
    /// Interpreter executable
    pub program: String,
    /// Flags placed before the binary path
    pub args: Vec<String>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::java()
    }
}

impl Interpreter {
    /// `java -Dfile.encoding=UTF-8 -jar`
    pub fn java() -> Self {
        Self {
            program: "java".to_string(),
            args: vec!["-Dfile.encoding=UTF-8".to_string(), "-jar".to_string()],
        }
    }

    /// Arbitrary interpreter with flags
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

/// Immutable command line for one task
///
/// `<program> <interpreter flags> <binary> <task flags>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDescriptor {
    task: Task,
    program: String,
    args: Vec<OsString>,
    binary: PathBuf,
}

impl CommandDescriptor {
    /// Build the command line for `task`.
    ///
    /// The binary is `binary_override` when given, else the task's bundled
    /// binary under `bin_dir`. Tasks without a bundled binary require the
    /// override.
    pub fn for_task(
        task: Task,
        interpreter: &Interpreter,
        bin_dir: &Path,
        binary_override: Option<&Path>,
    ) -> Result<Self> {
        let binary = match (binary_override, task.bundled_binary()) {
            (Some(path), _) => path.to_path_buf(),
            (None, Some(relative)) => bin_dir.join(relative),
            (None, None) => {
                return Err(EngineError::Config(format!(
                    "the {task} binary is not bundled with the toolkit; download it separately and pass its path as the binary override"
                )))
            }
        };

        let mut args: Vec<OsString> = interpreter.args.iter().map(OsString::from).collect();
        args.push(binary.clone().into_os_string());
        args.extend(task.task_flags().iter().map(OsString::from));

        Ok(Self {
            task,
            program: interpreter.program.clone(),
            args,
            binary,
        })
    }

    /// Task this command runs
    pub fn task(&self) -> Task {
        self.task
    }

    /// Interpreter program
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments after the program
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Resolved worker binary
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Fail fast when the worker binary is missing
    pub fn ensure_binary_exists(&self) -> Result<()> {
        if self.binary.is_file() {
            Ok(())
        } else {
            Err(EngineError::BinaryNotFound {
                task: self.task,
                path: self.binary.clone(),
            })
        }
    }

    /// Command for interactive use (no I/O file flags)
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }

    /// Command for standalone use, with `-i <input> -o <output>` appended
    pub fn to_command_with_files(&self, input: &Path, output: &Path) -> Command {
        let mut cmd = self.to_command();
        cmd.arg("-i").arg(input).arg("-o").arg(output);
        cmd
    }

    /// Human-readable command line for logs
    pub fn display(&self) -> String {
        std::iter::once(self.program.clone())
            .chain(self.args.iter().map(|a| a.to_string_lossy().into_owned()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_of(descriptor: &CommandDescriptor) -> Vec<String> {
        descriptor
            .args()
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_segment_uses_bundled_jar() {
        let descriptor =
            CommandDescriptor::for_task(Task::Segment, &Interpreter::java(), Path::new("/opt/bin"), None)
                .unwrap();
        assert_eq!(descriptor.program(), "java");
        assert_eq!(
            args_of(&descriptor),
            vec![
                "-Dfile.encoding=UTF-8",
                "-jar",
                "/opt/bin/lib/FarasaSegmenterJar.jar"
            ]
        );
    }

    #[test]
    fn test_stem_appends_flags_after_binary() {
        let descriptor =
            CommandDescriptor::for_task(Task::Stem, &Interpreter::java(), Path::new("/opt/bin"), None)
                .unwrap();
        let args = args_of(&descriptor);
        assert_eq!(&args[2..], &["/opt/bin/lib/FarasaSegmenterJar.jar", "-l", "true"]);
    }

    #[test]
    fn test_override_replaces_bundled_binary() {
        let descriptor = CommandDescriptor::for_task(
            Task::Ner,
            &Interpreter::new("sh", Vec::<String>::new()),
            Path::new("/opt/bin"),
            Some(Path::new("/work/ner.sh")),
        )
        .unwrap();
        assert_eq!(descriptor.display(), "sh /work/ner.sh");
        assert_eq!(descriptor.binary(), Path::new("/work/ner.sh"));
    }

    #[test]
    fn test_unbundled_task_requires_override() {
        for task in [Task::SpellCheck, Task::Lemmatize, Task::DepParse] {
            let result =
                CommandDescriptor::for_task(task, &Interpreter::java(), Path::new("/opt/bin"), None);
            assert!(matches!(result, Err(EngineError::Config(_))));
        }
    }

    #[test]
    fn test_standalone_command_appends_io_flags() {
        let descriptor =
            CommandDescriptor::for_task(Task::Pos, &Interpreter::java(), Path::new("/b"), None)
                .unwrap();
        let cmd = descriptor.to_command_with_files(Path::new("/t/in"), Path::new("/t/out"));
        let args: Vec<String> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(&args[args.len() - 4..], &["-i", "/t/in", "-o", "/t/out"]);
    }

    #[test]
    fn test_missing_binary_is_reported() {
        let descriptor = CommandDescriptor::for_task(
            Task::Diacritize,
            &Interpreter::java(),
            Path::new("/nonexistent/farasa_bin"),
            None,
        )
        .unwrap();
        match descriptor.ensure_binary_exists() {
            Err(EngineError::BinaryNotFound { task, path }) => {
                assert_eq!(task, Task::Diacritize);
                assert!(path.ends_with("FarasaDiacritizeJar.jar"));
            }
            other => panic!("expected BinaryNotFound, got {other:?}"),
        }
    }
}
