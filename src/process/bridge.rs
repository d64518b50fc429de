use std::io::{self, Read};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use super::{ProcessError, SessionEvent, SessionId, StreamKind};
use crate::console::OutputSink;

pub const EXIT_MARKER: &str = "\n\t\t[Application exit]";

/// What the trigger stream does once it hits end-of-stream.
pub struct ExitNotice {
    pub session: SessionId,
    pub events: Sender<SessionEvent>,
    pub grace: Duration,
}

impl ExitNotice {
    fn fire(self, sink: &dyn OutputSink) {
        // Gives the stderr reader a moment to drain its last bytes.
        thread::sleep(self.grace);
        sink.append(EXIT_MARKER);
        if self.events.send(SessionEvent::Exited(self.session)).is_err() {
            tracing::debug!(session = self.session, "engine gone before exit notice");
        }
    }
}

/// Incremental UTF-8 decoder fed one byte at a time.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the text completed by `byte`, if any. Malformed input turns
    /// into U+FFFD.
    pub fn push(&mut self, byte: u8) -> Option<String> {
        self.pending.push(byte);
        match std::str::from_utf8(&self.pending) {
            Ok(text) => {
                let text = text.to_string();
                self.pending.clear();
                Some(text)
            }
            // Incomplete sequence, wait for more bytes.
            Err(e) if e.error_len().is_none() => None,
            Err(e) => {
                let valid = e.valid_up_to();
                let bad = e.error_len().unwrap_or(1);
                let mut text = String::from_utf8_lossy(&self.pending[..valid + bad]).into_owned();
                let rest = self.pending.split_off(valid + bad);
                self.pending.clear();
                for byte in rest {
                    if let Some(more) = self.push(byte) {
                        text.push_str(&more);
                    }
                }
                Some(text)
            }
        }
    }

    /// Flushes a truncated trailing sequence.
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let text = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        Some(text)
    }
}

/// Copies `stream` into `sink` one byte at a time until end-of-stream.
///
/// Returns `Ok(())` on a clean end-of-stream; the caller decides whether
/// that means the process exited.
pub fn pump<R: Read>(
    mut stream: R,
    kind: StreamKind,
    sink: &dyn OutputSink,
) -> Result<(), ProcessError> {
    let mut decoder = Utf8Decoder::new();
    let mut byte = [0u8; 1];
    loop {
        match stream.read(&mut byte) {
            Ok(0) => {
                if let Some(rest) = decoder.finish() {
                    sink.append(&rest);
                }
                return Ok(());
            }
            Ok(_) => {
                if let Some(text) = decoder.push(byte[0]) {
                    sink.append(&text);
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(source) => {
                return Err(ProcessError::StreamRead {
                    stream: kind,
                    source,
                })
            }
        }
    }
}

/// Starts a detached reader thread for one child stream.
///
/// Only the reader given an `ExitNotice` reports the process exit, and only
/// after a clean end-of-stream. A read error stops this reader alone.
pub fn spawn_reader<R>(
    stream: R,
    kind: StreamKind,
    sink: Arc<dyn OutputSink>,
    on_exit: Option<ExitNotice>,
) -> io::Result<()>
where
    R: Read + Send + 'static,
{
    thread::Builder::new()
        .name(format!("{}-reader", kind))
        .spawn(move || match pump(stream, kind, sink.as_ref()) {
            Ok(()) => {
                tracing::debug!(%kind, "end of stream");
                if let Some(notice) = on_exit {
                    notice.fire(sink.as_ref());
                }
            }
            Err(e) => {
                tracing::warn!(%kind, error = %e, "reader stopped");
                sink.append(&e.report());
            }
        })?;
    Ok(())
}
