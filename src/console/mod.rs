use std::sync::Mutex;

mod terminal;

pub use terminal::{Printer, TerminalSink};

/// Append-only text target shared by the engine and the stream readers.
///
/// `append` is called concurrently from the UI thread and from both reader
/// threads of an attached process, so each call must land atomically. No
/// ordering is promised between different callers.
pub trait OutputSink: Send + Sync {
    fn append(&self, text: &str);

    /// Drop everything emitted so far.
    fn clear(&self);
}

/// In-memory sink. Used by tests and by embedders that render the text
/// themselves.
#[derive(Debug, Default)]
pub struct BufferSink {
    buffer: Mutex<String>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        match self.buffer.lock() {
            Ok(buffer) => buffer.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl OutputSink for BufferSink {
    fn append(&self, text: &str) {
        match self.buffer.lock() {
            Ok(mut buffer) => buffer.push_str(text),
            Err(poisoned) => poisoned.into_inner().push_str(text),
        }
    }

    fn clear(&self) {
        match self.buffer.lock() {
            Ok(mut buffer) => buffer.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_buffer_append_and_clear() {
        let sink = BufferSink::new();
        sink.append("hello");
        sink.append(" world");
        assert_eq!(sink.contents(), "hello world");

        sink.clear();
        assert_eq!(sink.contents(), "");
    }

    #[test]
    fn test_concurrent_appends_keep_per_producer_order() {
        let sink = Arc::new(BufferSink::new());
        let producers: Vec<_> = ['a', 'b']
            .into_iter()
            .map(|tag| {
                let sink = Arc::clone(&sink);
                thread::spawn(move || {
                    for i in 0..200 {
                        sink.append(&format!("{}{};", tag, i));
                    }
                })
            })
            .collect();
        for producer in producers {
            producer.join().expect("producer thread panicked");
        }

        let contents = sink.contents();
        for tag in ['a', 'b'] {
            let seen: Vec<usize> = contents
                .split(';')
                .filter_map(|item| item.strip_prefix(tag))
                .filter_map(|n| n.parse().ok())
                .collect();
            assert_eq!(seen, (0..200).collect::<Vec<_>>());
        }
    }
}
