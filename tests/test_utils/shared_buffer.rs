//! Shared buffer used to capture sink output in integration tests.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Thread-safe byte buffer usable as the writer of a `WriterSink`.
///
/// The inner buffer is kept private so tests can't bypass the `Write`
/// implementation or mutate the buffer without locking.
#[derive(Clone, Default)]
pub struct SharedBuf {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuf {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a snapshot of the buffer contents as UTF-8 text.
    pub fn text(&self) -> String {
        let bytes = self.buffer.lock().expect("SharedBuf mutex poisoned").clone();
        String::from_utf8(bytes).expect("buffer contains invalid UTF-8")
    }

    #[allow(dead_code)]
    pub fn lines(&self) -> Vec<String> {
        self.text().lines().map(str::to_owned).collect()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer
            .lock()
            .expect("SharedBuf mutex poisoned")
            .write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
