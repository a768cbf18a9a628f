//! Interactive execution strategy
//!
//! A long-lived worker exchanging one response line per request line over
//! its standard streams. A broken pipe triggers exactly one respawn and retry.

use crate::{
    command::CommandDescriptor,
    error::{EngineError, Result},
    executor::Executor,
    process::{self, WorkerProcess},
    ExecutionMode,
};
use std::io;
use std::time::Duration;

/// Observable session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No worker started yet
    Uninitialized,
    /// Worker running and primed
    Ready,
    /// Worker lost after a failed recovery or a timeout; reinitialize to continue
    Faulted,
    /// Explicitly terminated
    Terminated,
}

#[derive(Debug)]
enum SessionState {
    Uninitialized,
    Ready(WorkerProcess),
    Faulted,
    Terminated,
}

/// Line-framed session over one worker process
///
/// Requests are strictly ordered: a response is read before the next line
/// is written.
#[derive(Debug)]
pub struct InteractiveSession {
    command: CommandDescriptor,
    priming_token: String,
    timeout: Option<Duration>,
    state: SessionState,
    respawns: usize,
}

impl InteractiveSession {
    /// Create an uninitialized session
    pub fn new(
        command: CommandDescriptor,
        priming_token: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            command,
            priming_token: priming_token.into(),
            timeout,
            state: SessionState::Uninitialized,
            respawns: 0,
        }
    }

    /// Spawn the worker and send the priming line, discarding its response.
    ///
    /// Calling this on a running session replaces the worker.
    pub fn initialize(&mut self) -> Result<()> {
        let task = self.command.task();
        self.state = SessionState::Faulted;
        let worker = process::spawn(&self.command)?;
        tracing::info!(%task, pid = worker.pid(), "initializing interactive worker");
        self.state = SessionState::Ready(worker);

        let token = self.priming_token.clone();
        let primed = self.submit_line(&token)?;
        tracing::debug!(%task, response = %primed, "worker primed");
        Ok(())
    }

    /// Current state
    pub fn status(&self) -> SessionStatus {
        match self.state {
            SessionState::Uninitialized => SessionStatus::Uninitialized,
            SessionState::Ready(_) => SessionStatus::Ready,
            SessionState::Faulted => SessionStatus::Faulted,
            SessionState::Terminated => SessionStatus::Terminated,
        }
    }

    /// Number of times the worker was respawned after a broken pipe
    pub fn respawn_count(&self) -> usize {
        self.respawns
    }

    /// Process id of the live worker
    pub fn worker_pid(&self) -> Option<u32> {
        match &self.state {
            SessionState::Ready(worker) => Some(worker.pid()),
            _ => None,
        }
    }

    /// Send one line and return the worker's one-line response
    pub fn submit_line(&mut self, line: &str) -> Result<String> {
        if line.contains('\n') {
            return Err(EngineError::InvalidInput {
                reason: "a request line must not contain a line break".to_string(),
            });
        }
        let task = self.command.task();
        let worker = match &mut self.state {
            SessionState::Ready(worker) => worker,
            _ => return Err(EngineError::NotInitialized { task }),
        };

        match exchange(worker, line, self.timeout) {
            Ok(response) => Ok(response),
            Err(e) if is_broken_pipe(&e) => {
                tracing::error!(
                    %task,
                    "pipe broke ({e}); reinitializing the worker, this may take a while"
                );
                self.retry_on_fresh_worker(line)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Submit every line of `text` in order and join the non-empty responses
    pub fn submit_text(&mut self, text: &str) -> Result<String> {
        let mut outputs = Vec::new();
        for line in text.lines() {
            let response = self.submit_line(line)?;
            if !response.is_empty() {
                outputs.push(response);
            }
        }
        Ok(outputs.join("\n"))
    }

    /// Kill the worker. Later submissions fail with `NotInitialized`.
    pub fn terminate(&mut self) {
        if let SessionState::Ready(worker) = &mut self.state {
            worker.terminate();
        }
        self.state = SessionState::Terminated;
    }

    fn retry_on_fresh_worker(&mut self, line: &str) -> Result<String> {
        // Dropping the old handle kills it
        self.state = SessionState::Faulted;
        let mut worker = process::spawn(&self.command)?;
        self.respawns += 1;
        tracing::warn!(task = %self.command.task(), pid = worker.pid(), "worker respawned");

        match exchange(&mut worker, line, self.timeout) {
            Ok(response) => {
                self.state = SessionState::Ready(worker);
                Ok(response)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    fn fail(&mut self, source: io::Error) -> EngineError {
        let task = self.command.task();
        let mode = ExecutionMode::Interactive;
        self.state = SessionState::Faulted;
        if source.kind() == io::ErrorKind::TimedOut {
            if let Some(timeout) = self.timeout {
                return EngineError::Timeout {
                    task,
                    mode,
                    timeout,
                };
            }
        }
        tracing::error!(%task, "interactive worker failed: {source}");
        EngineError::Pipe { task, mode, source }
    }
}

fn exchange(worker: &mut WorkerProcess, line: &str, timeout: Option<Duration>) -> io::Result<String> {
    worker.write_line(line)?;
    worker.read_line(timeout)
}

/// Worker died or closed one of its streams
fn is_broken_pipe(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::BrokenPipe | io::ErrorKind::UnexpectedEof
    )
}

impl Executor for InteractiveSession {
    fn execute(&mut self, text: &str) -> Result<String> {
        self.submit_text(text)
    }

    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Interactive
    }

    fn terminate(&mut self) {
        InteractiveSession::terminate(self);
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::command::Interpreter;
    use crate::Task;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const ECHO_WORKER: &str = r#"while IFS= read -r line; do
  if [ -z "$line" ]; then echo; else printf 'out:%s\n' "$line"; fi
done
"#;

    fn session(dir: &Path, body: &str, timeout: Option<Duration>) -> InteractiveSession {
        let script = dir.join("worker.sh");
        fs::write(&script, body).unwrap();
        let command = CommandDescriptor::for_task(
            Task::Segment,
            &Interpreter::new("sh", Vec::<String>::new()),
            dir,
            Some(&script),
        )
        .unwrap();
        InteractiveSession::new(command, "warmup", timeout)
    }

    #[test]
    fn test_submit_before_initialize_fails() {
        let dir = TempDir::new().unwrap();
        let mut session = session(dir.path(), ECHO_WORKER, None);
        assert_eq!(session.status(), SessionStatus::Uninitialized);
        assert!(matches!(
            session.submit_line("x"),
            Err(EngineError::NotInitialized { task: Task::Segment })
        ));
    }

    #[test]
    fn test_priming_response_is_discarded() {
        let dir = TempDir::new().unwrap();
        let mut session = session(dir.path(), ECHO_WORKER, None);
        session.initialize().unwrap();
        assert_eq!(session.status(), SessionStatus::Ready);
        // The first real request gets its own response, not the priming one
        assert_eq!(session.submit_line("first").unwrap(), "out:first");
    }

    #[test]
    fn test_submit_text_drops_empty_responses() {
        let dir = TempDir::new().unwrap();
        let mut session = session(dir.path(), ECHO_WORKER, None);
        session.initialize().unwrap();
        let output = session.submit_text("one\n\ntwo\nthree").unwrap();
        assert_eq!(output, "out:one\nout:two\nout:three");
    }

    #[test]
    fn test_line_breaks_rejected_in_single_line() {
        let dir = TempDir::new().unwrap();
        let mut session = session(dir.path(), ECHO_WORKER, None);
        session.initialize().unwrap();
        assert!(matches!(
            session.submit_line("a\nb"),
            Err(EngineError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_terminate_then_submit_fails() {
        let dir = TempDir::new().unwrap();
        let mut session = session(dir.path(), ECHO_WORKER, None);
        session.initialize().unwrap();
        session.terminate();
        session.terminate();
        assert_eq!(session.status(), SessionStatus::Terminated);
        assert!(session.worker_pid().is_none());
        assert!(matches!(
            session.submit_line("x"),
            Err(EngineError::NotInitialized { .. })
        ));
    }

    #[test]
    fn test_timeout_faults_session() {
        let dir = TempDir::new().unwrap();
        let body = r#"IFS= read -r line; echo primed
while IFS= read -r line; do sleep 5; echo late; done
"#;
        let mut session = session(dir.path(), body, Some(Duration::from_millis(100)));
        session.initialize().unwrap();
        assert!(matches!(
            session.submit_line("slow"),
            Err(EngineError::Timeout { .. })
        ));
        assert_eq!(session.status(), SessionStatus::Faulted);
        assert!(matches!(
            session.submit_line("next"),
            Err(EngineError::NotInitialized { .. })
        ));
    }

    #[test]
    fn test_reinitialize_after_terminate() {
        let dir = TempDir::new().unwrap();
        let mut session = session(dir.path(), ECHO_WORKER, None);
        session.initialize().unwrap();
        session.terminate();
        session.initialize().unwrap();
        assert_eq!(session.submit_line("again").unwrap(), "out:again");
    }
}
