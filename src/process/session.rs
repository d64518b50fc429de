use std::io::Write;
use std::path::Path;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use super::bridge::{self, ExitNotice};
use super::{signal, ProcessError, SessionEvent, SessionId, StreamKind};
use crate::console::OutputSink;

/// A running child whose stdin receives forwarded lines and whose output is
/// bridged to the console by two detached reader threads.
pub struct ProcessSession {
    id: SessionId,
    child: Child,
    stdin: ChildStdin,
}

impl ProcessSession {
    /// Starts `command_line` in `dir` with the inherited environment.
    ///
    /// The line is split on whitespace; the first token names the program.
    /// Both reader threads are running by the time this returns.
    pub fn spawn(
        id: SessionId,
        command_line: &str,
        dir: &Path,
        sink: Arc<dyn OutputSink>,
        events: Sender<SessionEvent>,
        grace: Duration,
    ) -> Result<Self, ProcessError> {
        let spawn_error = |source: std::io::Error| ProcessError::Spawn {
            command: command_line.to_string(),
            source,
        };

        let mut tokens = command_line.split_whitespace();
        let program = tokens.next().ok_or_else(|| {
            spawn_error(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "empty command line",
            ))
        })?;

        let mut child = Command::new(program)
            .args(tokens)
            .current_dir(dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_error)?;

        let pipes = (child.stdin.take(), child.stdout.take(), child.stderr.take());
        let (stdin, stdout, stderr) = match pipes {
            (Some(stdin), Some(stdout), Some(stderr)) => (stdin, stdout, stderr),
            _ => {
                reap(child);
                return Err(spawn_error(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    "child pipes unavailable",
                )));
            }
        };

        let notice = ExitNotice {
            session: id,
            events,
            grace,
        };
        let started =
            bridge::spawn_reader(stdout, StreamKind::Stdout, Arc::clone(&sink), Some(notice))
                .and_then(|_| bridge::spawn_reader(stderr, StreamKind::Stderr, sink, None));
        if let Err(e) = started {
            reap(child);
            return Err(spawn_error(e));
        }

        tracing::debug!(
            session = id,
            pid = child.id(),
            command = command_line,
            "spawned"
        );
        Ok(Self { id, child, stdin })
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn pid(&self) -> u32 {
        self.child.id()
    }

    /// Writes `line` plus a newline to the child's stdin and flushes.
    pub fn forward(&mut self, line: &str) -> Result<(), ProcessError> {
        self.stdin
            .write_all(line.as_bytes())
            .and_then(|_| self.stdin.write_all(b"\n"))
            .and_then(|_| self.stdin.flush())
            .map_err(ProcessError::Forward)
    }

    pub fn interrupt(&self) -> Result<(), ProcessError> {
        signal::interrupt(self.child.id())
    }

    /// Releases the child. Its stdin closes here; its exit status is
    /// collected now or by a background waiter.
    pub fn detach(self) {
        let Self { id, child, stdin } = self;
        drop(stdin);
        tracing::debug!(session = id, "detached");
        reap(child);
    }
}

fn reap(mut child: Child) {
    match child.try_wait() {
        Ok(Some(status)) => tracing::debug!(pid = child.id(), %status, "child exited"),
        Ok(None) => {
            let pid = child.id();
            let waiter = thread::Builder::new()
                .name(format!("reap-{}", pid))
                .spawn(move || match child.wait() {
                    Ok(status) => tracing::debug!(pid, %status, "child exited"),
                    Err(e) => tracing::warn!(pid, error = %e, "failed to wait for child"),
                });
            if let Err(e) = waiter {
                tracing::warn!(pid, error = %e, "failed to start reaper thread");
            }
        }
        Err(e) => tracing::warn!(pid = child.id(), error = %e, "failed to poll child"),
    }
}
