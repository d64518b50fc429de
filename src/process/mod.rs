use std::fmt;
use std::io;

pub mod bridge;
pub mod session;
pub mod signal;

pub use session::ProcessSession;

/// Identity of one attachment. Events carrying a stale id are ignored.
pub type SessionId = u64;

/// Posted by reader threads back to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The trigger stream reached end-of-stream.
    Exited(SessionId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamKind::Stdout => write!(f, "stdout"),
            StreamKind::Stderr => write!(f, "stderr"),
        }
    }
}

#[derive(Debug)]
pub enum ProcessError {
    Spawn { command: String, source: io::Error },
    Forward(io::Error),
    StreamRead { stream: StreamKind, source: io::Error },
    Signal(String),
}

impl ProcessError {
    /// Short name of the underlying failure, e.g. `NotFound`.
    pub fn kind_name(&self) -> String {
        match self {
            ProcessError::Spawn { source, .. }
            | ProcessError::Forward(source)
            | ProcessError::StreamRead { source, .. } => format!("{:?}", source.kind()),
            ProcessError::Signal(_) => "Signal".to_string(),
        }
    }

    /// The line shown on the console for this failure.
    pub fn report(&self) -> String {
        match self {
            ProcessError::Spawn { source, .. } => {
                format!("\n\n{} - {}", self.kind_name(), source)
            }
            ProcessError::Forward(source) => {
                format!("\n{} - {}", self.kind_name(), source)
            }
            other => format!("\n{}", other),
        }
    }
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessError::Spawn { command, source } => {
                write!(f, "failed to start '{}': {}", command, source)
            }
            ProcessError::Forward(e) => write!(f, "failed to forward input: {}", e),
            ProcessError::StreamRead { stream, source } => {
                write!(f, "{} read error: {}", stream, source)
            }
            ProcessError::Signal(msg) => write!(f, "Signal error: {}", msg),
        }
    }
}

impl std::error::Error for ProcessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProcessError::Spawn { source, .. }
            | ProcessError::Forward(source)
            | ProcessError::StreamRead { source, .. } => Some(source),
            ProcessError::Signal(_) => None,
        }
    }
}
