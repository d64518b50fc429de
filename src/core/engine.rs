use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use super::commands::{BuiltinRegistry, Command, CommandContext};
use super::state::WorkingDirectory;
use crate::console::OutputSink;
use crate::process::{ProcessError, ProcessSession, SessionEvent, SessionId};

/// Whether input lines are interpreted locally or forwarded to a child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Local,
    Attached,
}

#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// How long the stdout reader waits after end-of-stream before
    /// announcing the exit, so trailing stderr output lands first.
    pub exit_grace: Duration,
    /// Prefix of echoed lines while attached.
    pub attached_marker: String,
    /// Whether submitted lines are echoed to the sink. Front-ends whose
    /// editor already leaves the typed line on screen turn this off.
    pub echo_input: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            exit_grace: Duration::from_millis(100),
            attached_marker: "[APP]".to_string(),
            echo_input: true,
        }
    }
}

struct EngineState {
    cwd: WorkingDirectory,
    session: Option<ProcessSession>,
    next_session: SessionId,
    events: Receiver<SessionEvent>,
}

impl EngineState {
    /// Applies exit notices posted by reader threads. Notices for a session
    /// that is already gone are dropped.
    fn apply_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                SessionEvent::Exited(id) => {
                    if self.session.as_ref().map(ProcessSession::id) == Some(id) {
                        self.detach();
                    } else {
                        tracing::debug!(session = id, "stale exit notice");
                    }
                }
            }
        }
    }

    fn detach(&mut self) {
        if let Some(session) = self.session.take() {
            session.detach();
        }
    }
}

/// Decides, line by line, between built-ins, spawning a child, and
/// forwarding to the attached child.
///
/// `submit_line` must be called from one thread at a time. The engine is
/// `Sync`, so other threads may query it or call [`ShellEngine::interrupt`].
pub struct ShellEngine {
    state: Mutex<EngineState>,
    events: Sender<SessionEvent>,
    registry: BuiltinRegistry,
    sink: Arc<dyn OutputSink>,
    options: EngineOptions,
}

impl ShellEngine {
    /// Engine rooted at the process's launch directory.
    pub fn new(sink: Arc<dyn OutputSink>) -> std::io::Result<Self> {
        let cwd = WorkingDirectory::from_process()?;
        Ok(Self::with_directory(sink, cwd, EngineOptions::default()))
    }

    pub fn with_directory(
        sink: Arc<dyn OutputSink>,
        cwd: WorkingDirectory,
        options: EngineOptions,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        Self {
            state: Mutex::new(EngineState {
                cwd,
                session: None,
                next_session: 1,
                events: events_rx,
            }),
            events: events_tx,
            registry: BuiltinRegistry::new(),
            sink,
            options,
        }
    }

    fn lock(&self) -> MutexGuard<'_, EngineState> {
        let mut state = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        state.apply_events();
        state
    }

    /// Handles one line of user input.
    pub fn submit_line(&self, text: &str) {
        if text.trim().is_empty() {
            return;
        }

        let mut state = self.lock();
        if state.session.is_some() {
            self.forward(&mut state, text);
        } else {
            self.run_local(&mut state, text);
        }
    }

    fn forward(&self, state: &mut EngineState, text: &str) {
        self.echo(&self.options.attached_marker, text);

        let Some(session) = state.session.as_mut() else {
            return;
        };
        if let Err(e) = session.forward(text) {
            tracing::debug!(error = %e, "forward failed, detaching");
            self.sink.append(&e.report());
            state.detach();
        }
    }

    fn run_local(&self, state: &mut EngineState, text: &str) {
        self.echo(&state.cwd.path().display().to_string(), text);

        let args: Vec<String> = text.split_whitespace().map(String::from).collect();
        if let Some(command) = self.registry.get(&args[0]) {
            let mut ctx = CommandContext {
                cwd: &mut state.cwd,
                sink: self.sink.as_ref(),
            };
            if let Err(e) = command.execute(&mut ctx, &args) {
                self.sink.append(&format!("\n{}", e));
            }
            return;
        }

        match self.spawn(state, text) {
            Ok(session) => state.session = Some(session),
            Err(e) => {
                tracing::debug!(error = %e, "spawn failed");
                self.sink.append(&e.report());
            }
        }
    }

    fn echo(&self, prompt: &str, text: &str) {
        if self.options.echo_input {
            self.sink.append(&format!("\n{}> {}", prompt, text));
        }
    }

    fn spawn(&self, state: &mut EngineState, text: &str) -> Result<ProcessSession, ProcessError> {
        let id = state.next_session;
        state.next_session += 1;
        ProcessSession::spawn(
            id,
            text,
            state.cwd.path(),
            Arc::clone(&self.sink),
            self.events.clone(),
            self.options.exit_grace,
        )
    }

    /// Sends SIGINT to the attached child. Returns `false` when nothing is
    /// attached. The engine still detaches only once the child's output ends.
    pub fn interrupt(&self) -> Result<bool, ProcessError> {
        let state = self.lock();
        match state.session.as_ref() {
            Some(session) => {
                tracing::debug!(pid = session.pid(), "interrupting child");
                session.interrupt()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn mode(&self) -> Mode {
        if self.lock().session.is_some() {
            Mode::Attached
        } else {
            Mode::Local
        }
    }

    pub fn is_attached(&self) -> bool {
        self.mode() == Mode::Attached
    }

    pub fn working_directory(&self) -> PathBuf {
        self.lock().cwd.path().to_path_buf()
    }

    pub fn builtin_names(&self) -> Vec<String> {
        self.registry.names().map(String::from).collect()
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }
}
