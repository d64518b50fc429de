use std::io::{self, Write};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use rustyline::ExternalPrinter;

use super::OutputSink;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Output is gathered until producers stay quiet this long, so text read a
/// byte at a time reaches the editor in whole chunks.
const SETTLE: Duration = Duration::from_millis(15);
const MAX_BATCH: usize = 4096;
const FLUSH_TIMEOUT: Duration = Duration::from_secs(1);

/// Printer handed out by the line editor. It redraws the prompt and the
/// half-typed line around every message.
pub type Printer = Box<dyn ExternalPrinter + Send>;

enum Chunk {
    Text(String),
    Flush(Sender<()>),
}

enum Target {
    Editor(Printer),
    Stdout,
}

impl Target {
    fn print(&mut self, text: String) {
        if let Target::Editor(printer) = self {
            match printer.print(text.clone()) {
                Ok(()) => return,
                Err(e) => {
                    tracing::warn!(error = %e, "editor printer failed, writing to stdout");
                    *self = Target::Stdout;
                }
            }
        }
        let mut stdout = io::stdout().lock();
        if let Err(e) = stdout.write_all(text.as_bytes()).and_then(|_| stdout.flush()) {
            tracing::debug!(error = %e, "stdout write failed");
        }
    }
}

/// Sink for the terminal front-end.
///
/// Appends are queued to a single output thread, which batches them and
/// prints through the line editor while it is reading. Without an editor
/// printer (stdout is not a terminal) the batches go straight to stdout.
pub struct TerminalSink {
    chunks: Mutex<Sender<Chunk>>,
}

impl TerminalSink {
    pub fn new(printer: Option<Printer>) -> io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        let target = match printer {
            Some(printer) => Target::Editor(printer),
            None => Target::Stdout,
        };
        thread::Builder::new()
            .name("terminal-output".to_string())
            .spawn(move || print_batches(rx, target))?;
        Ok(Self {
            chunks: Mutex::new(tx),
        })
    }

    /// Blocks until everything appended so far has been printed.
    pub fn flush(&self) {
        let (ack, done) = mpsc::channel();
        self.send(Chunk::Flush(ack));
        if done.recv_timeout(FLUSH_TIMEOUT).is_err() {
            tracing::debug!("terminal flush timed out");
        }
    }

    fn send(&self, chunk: Chunk) {
        let chunks = match self.chunks.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if chunks.send(chunk).is_err() {
            tracing::debug!("terminal output thread is gone");
        }
    }
}

impl OutputSink for TerminalSink {
    fn append(&self, text: &str) {
        if !text.is_empty() {
            self.send(Chunk::Text(text.to_string()));
        }
    }

    fn clear(&self) {
        self.send(Chunk::Text(CLEAR_SCREEN.to_string()));
    }
}

fn print_batches(chunks: Receiver<Chunk>, mut target: Target) {
    while let Ok(first) = chunks.recv() {
        let mut batch = String::new();
        let mut ack = None;
        let mut next = Some(first);
        while let Some(chunk) = next.take() {
            match chunk {
                Chunk::Text(text) => batch.push_str(&text),
                Chunk::Flush(done) => {
                    ack = Some(done);
                    break;
                }
            }
            if batch.len() >= MAX_BATCH {
                break;
            }
            next = chunks.recv_timeout(SETTLE).ok();
        }

        if !batch.is_empty() {
            target.print(batch);
        }
        if let Some(done) = ack {
            let _ = done.send(());
        }
    }
}
