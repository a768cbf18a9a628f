//! Worker process supervision
//!
//! Spawns worker binaries with piped standard streams and owns their
//! lifecycle. Restart policy lives in the interactive session; nothing here
//! retries.

use crate::command::CommandDescriptor;
use crate::error::{EngineError, Result};
use crate::{ExecutionMode, Task};
use std::io::{self, BufRead, BufReader, Read, Write};
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Handle to one live worker process
///
/// Responses are read by a dedicated thread and handed over a channel, so a
/// read can be bounded by a timeout. Standard error is drained to the log.
pub struct WorkerProcess {
    task: Task,
    pid: u32,
    // Taken on terminate
    child: Option<Child>,
    stdin: ChildStdin,
    responses: Receiver<io::Result<String>>,
}

impl std::fmt::Debug for WorkerProcess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerProcess")
            .field("task", &self.task)
            .field("pid", &self.pid)
            .finish()
    }
}

/// Start the worker described by `command` with all three streams piped
pub fn spawn(command: &CommandDescriptor) -> Result<WorkerProcess> {
    let task = command.task();
    let mut child = command
        .to_command()
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| EngineError::Launch {
            task,
            program: command.program().to_string(),
            source,
        })?;

    let stdin = child.stdin.take().ok_or_else(|| missing_pipe("stdin"))?;
    let stdout = child.stdout.take().ok_or_else(|| missing_pipe("stdout"))?;
    let stderr = child.stderr.take().ok_or_else(|| missing_pipe("stderr"))?;

    let (tx, responses) = mpsc::channel();
    thread::Builder::new()
        .name(format!("farasa-{task}-stdout"))
        .spawn(move || {
            let mut reader = BufReader::new(stdout);
            loop {
                let mut buf = Vec::new();
                let line = match reader.read_until(b'\n', &mut buf) {
                    Ok(0) => break,
                    Ok(_) => String::from_utf8(buf)
                        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
                    Err(e) => Err(e),
                };
                let failed = line.is_err();
                if tx.send(line).is_err() || failed {
                    break;
                }
            }
        })?;

    thread::Builder::new()
        .name(format!("farasa-{task}-stderr"))
        .spawn(move || {
            for line in BufReader::new(stderr).lines() {
                match line {
                    Ok(line) => tracing::debug!(%task, "worker stderr: {line}"),
                    Err(_) => break,
                }
            }
        })?;

    tracing::debug!(%task, pid = child.id(), command = %command.display(), "spawned worker");

    Ok(WorkerProcess {
        task,
        pid: child.id(),
        child: Some(child),
        stdin,
        responses,
    })
}

fn missing_pipe(name: &str) -> EngineError {
    EngineError::Io(io::Error::new(
        io::ErrorKind::BrokenPipe,
        format!("worker {name} was not captured"),
    ))
}

impl WorkerProcess {
    /// OS process id
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Write `line` plus a newline and flush
    pub fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.stdin.write_all(line.as_bytes())?;
        self.stdin.write_all(b"\n")?;
        self.stdin.flush()
    }

    /// Read the next response line, without its trailing whitespace.
    ///
    /// A closed stdout is `UnexpectedEof`; an expired timeout is `TimedOut`.
    pub fn read_line(&mut self, timeout: Option<Duration>) -> io::Result<String> {
        let received = match timeout {
            None => self
                .responses
                .recv()
                .map_err(|_| io::Error::from(io::ErrorKind::UnexpectedEof)),
            Some(limit) => self.responses.recv_timeout(limit).map_err(|e| match e {
                RecvTimeoutError::Timeout => io::Error::from(io::ErrorKind::TimedOut),
                RecvTimeoutError::Disconnected => io::Error::from(io::ErrorKind::UnexpectedEof),
            }),
        };
        received?.map(|line| line.trim_end().to_string())
    }

    /// Whether the process is still running
    pub fn is_alive(&mut self) -> bool {
        self.child
            .as_mut()
            .is_some_and(|child| matches!(child.try_wait(), Ok(None)))
    }

    /// Send a kill signal. Idempotent and does not wait for exit.
    ///
    /// A child that has not exited yet is handed to a detached thread that
    /// reaps it.
    pub fn terminate(&mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };
        let (task, pid) = (self.task, self.pid);
        match child.kill() {
            Ok(()) => tracing::debug!(%task, pid, "terminated worker"),
            // Already exited
            Err(e) if e.kind() == io::ErrorKind::InvalidInput => {}
            Err(e) => tracing::warn!(%task, pid, "failed to kill worker: {e}"),
        }
        if let Ok(Some(_)) = child.try_wait() {
            return;
        }
        let reaper = thread::Builder::new()
            .name(format!("farasa-{task}-reaper"))
            .spawn(move || {
                if let Err(e) = child.wait() {
                    tracing::warn!(%task, pid, "failed to reap worker: {e}");
                }
            });
        if let Err(e) = reaper {
            tracing::warn!(%task, pid, "could not start reaper thread: {e}");
        }
    }
}

impl Drop for WorkerProcess {
    fn drop(&mut self) {
        self.terminate();
    }
}

/// Exit status and captured output of a finished process
#[derive(Debug)]
pub struct CompletedProcess {
    /// Exit status
    pub status: ExitStatus,
    /// Captured standard output (lossy UTF-8)
    pub stdout: String,
    /// Captured standard error (lossy UTF-8)
    pub stderr: String,
}

/// Run `cmd` to completion with stdout and stderr captured.
///
/// With a timeout the child is polled and killed once the deadline passes.
pub fn run_to_completion(
    mut cmd: Command,
    task: Task,
    timeout: Option<Duration>,
) -> Result<CompletedProcess> {
    let program = cmd.get_program().to_string_lossy().into_owned();
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| EngineError::Launch {
            task,
            program,
            source,
        })?;

    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let status = match timeout {
        None => child.wait()?,
        Some(limit) => match wait_with_deadline(&mut child, limit)? {
            Some(status) => status,
            None => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(EngineError::Timeout {
                    task,
                    mode: ExecutionMode::Standalone,
                    timeout: limit,
                });
            }
        },
    };

    Ok(CompletedProcess {
        status,
        stdout: collect(stdout),
        stderr: collect(stderr),
    })
}

fn wait_with_deadline(child: &mut Child, limit: Duration) -> io::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + limit;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    })
}

fn collect(handle: Option<JoinHandle<Vec<u8>>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::command::Interpreter;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn script(dir: &Path, body: &str) -> CommandDescriptor {
        let path = dir.join("worker.sh");
        fs::write(&path, body).unwrap();
        CommandDescriptor::for_task(
            Task::Segment,
            &Interpreter::new("sh", Vec::<String>::new()),
            dir,
            Some(&path),
        )
        .unwrap()
    }

    #[test]
    fn test_spawn_and_exchange_line() {
        let dir = TempDir::new().unwrap();
        let command = script(
            dir.path(),
            "while IFS= read -r line; do printf 'echo:%s  \\n' \"$line\"; done\n",
        );
        let mut worker = spawn(&command).unwrap();
        worker.write_line("hello").unwrap();
        assert_eq!(worker.read_line(None).unwrap(), "echo:hello");
        assert!(worker.is_alive());
        worker.terminate();
        worker.terminate();
    }

    #[test]
    fn test_spawn_missing_interpreter_is_launch_error() {
        let command = CommandDescriptor::for_task(
            Task::Ner,
            &Interpreter::new("definitely-not-a-real-interpreter", Vec::<String>::new()),
            Path::new("/tmp"),
            Some(Path::new("/tmp/ner.jar")),
        )
        .unwrap();
        match spawn(&command) {
            Err(EngineError::Launch { task, program, .. }) => {
                assert_eq!(task, Task::Ner);
                assert_eq!(program, "definitely-not-a-real-interpreter");
            }
            other => panic!("expected Launch error, got {other:?}"),
        }
    }

    #[test]
    fn test_read_after_exit_is_eof() {
        let dir = TempDir::new().unwrap();
        let command = script(dir.path(), "exit 0\n");
        let mut worker = spawn(&command).unwrap();
        let err = worker.read_line(None).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_read_timeout() {
        let dir = TempDir::new().unwrap();
        let command = script(dir.path(), "sleep 5\n");
        let mut worker = spawn(&command).unwrap();
        let err = worker
            .read_line(Some(Duration::from_millis(50)))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::TimedOut);
    }

    #[test]
    fn test_run_to_completion_captures_output() {
        let dir = TempDir::new().unwrap();
        let command = script(dir.path(), "echo out; echo err >&2; exit 3\n");
        let completed = run_to_completion(command.to_command(), Task::Segment, None).unwrap();
        assert_eq!(completed.status.code(), Some(3));
        assert_eq!(completed.stdout.trim(), "out");
        assert_eq!(completed.stderr.trim(), "err");
    }

    #[test]
    fn test_run_to_completion_timeout_kills_child() {
        let dir = TempDir::new().unwrap();
        let command = script(dir.path(), "sleep 5\n");
        let started = Instant::now();
        let result = run_to_completion(
            command.to_command(),
            Task::Segment,
            Some(Duration::from_millis(100)),
        );
        assert!(matches!(result, Err(EngineError::Timeout { .. })));
        assert!(started.elapsed() < Duration::from_secs(4));
    }
}
