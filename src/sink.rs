//! Sinks consume rendered log lines.
//!
//! A [`Sink`] is attached to one or more logger nodes and receives every
//! line the dispatch engine emits through them. Writes are synchronous and
//! performed under the sink's own lock, so a sink is safe to share between
//! loggers and threads.

use std::any::Any;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

use crate::log_record::LogEvent;

/// Errors a sink may report while accepting or flushing output.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The underlying writer failed.
    #[error("sink I/O error: {0}")]
    Io(#[from] io::Error),
    /// The sink was closed and no longer accepts output.
    #[error("sink is closed")]
    Closed,
    /// The sink refused the line for a reason of its own.
    #[error("sink rejected line: {0}")]
    Rejected(String),
}

/// Trait implemented by all sinks.
///
/// `Sink` is `Send + Sync` so a single instance can be attached to several
/// nodes and invoked from any thread.
pub trait Sink: Send + Sync {
    /// Accept a rendered line together with the event it was rendered from.
    fn accept(&self, line: &str, event: &LogEvent) -> Result<(), SinkError>;

    /// Flush buffered output.
    fn flush(&self) -> Result<(), SinkError> {
        Ok(())
    }

    /// Return the sink as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;
}

/// Reference-counted sink handle as stored on logger nodes.
pub type SharedSink = Arc<dyn Sink>;

/// Sink writing each line, newline terminated, to an `io::Write`.
pub struct WriterSink<W: Write + Send> {
    writer: Mutex<Option<W>>,
    immediate_flush: bool,
}

impl<W: Write + Send> WriterSink<W> {
    /// Create a sink that flushes after every line.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(Some(writer)),
            immediate_flush: true,
        }
    }

    /// Control whether the writer is flushed after every line.
    pub fn with_immediate_flush(mut self, flag: bool) -> Self {
        self.immediate_flush = flag;
        self
    }

    /// Flush and drop the writer; later lines fail with [`SinkError::Closed`].
    pub fn close(&self) -> Result<(), SinkError> {
        match self.writer.lock().take() {
            Some(mut writer) => writer.flush().map_err(SinkError::from),
            None => Ok(()),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.writer.lock().is_none()
    }
}

impl WriterSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl WriterSink<io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write + Send + 'static> Sink for WriterSink<W> {
    fn accept(&self, line: &str, _event: &LogEvent) -> Result<(), SinkError> {
        let mut guard = self.writer.lock();
        let writer = guard.as_mut().ok_or(SinkError::Closed)?;
        writeln!(writer, "{line}")?;
        if self.immediate_flush {
            writer.flush()?;
        }
        Ok(())
    }

    fn flush(&self) -> Result<(), SinkError> {
        match self.writer.lock().as_mut() {
            Some(writer) => writer.flush().map_err(SinkError::from),
            None => Err(SinkError::Closed),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Sink writing to a file, truncating or appending on open.
pub struct FileSink {
    path: PathBuf,
    inner: WriterSink<BufWriter<File>>,
}

impl FileSink {
    /// Create (or truncate) the file at `path`.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        Self::open(path, false)
    }

    /// Open `path` for appending, creating it when missing.
    pub fn append(path: impl AsRef<Path>) -> io::Result<Self> {
        Self::open(path, true)
    }

    fn open(path: impl AsRef<Path>, append: bool) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut options = OpenOptions::new();
        options.create(true);
        if append {
            options.append(true);
        } else {
            options.write(true).truncate(true);
        }
        let file = options.open(&path)?;
        Ok(Self {
            path,
            inner: WriterSink::new(BufWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush and close the file.
    pub fn close(&self) -> Result<(), SinkError> {
        self.inner.close()
    }
}

impl Sink for FileSink {
    fn accept(&self, line: &str, event: &LogEvent) -> Result<(), SinkError> {
        self.inner.accept(line, event)
    }

    fn flush(&self) -> Result<(), SinkError> {
        self.inner.flush()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A line captured by a [`MemorySink`].
#[derive(Clone, Debug)]
pub struct CapturedLine {
    pub line: String,
    pub event: LogEvent,
}

/// Sink that keeps every line in memory.
///
/// Clones share the same buffer, so a clone can be attached to a hierarchy
/// while the original is kept for inspection.
#[derive(Clone, Default)]
pub struct MemorySink {
    captured: Arc<Mutex<Vec<CapturedLine>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the rendered lines received so far.
    pub fn lines(&self) -> Vec<String> {
        self.captured.lock().iter().map(|c| c.line.clone()).collect()
    }

    /// Snapshot of the messages of the events received so far.
    pub fn messages(&self) -> Vec<String> {
        self.captured
            .lock()
            .iter()
            .map(|c| c.event.message.clone())
            .collect()
    }

    pub fn captured(&self) -> Vec<CapturedLine> {
        self.captured.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.captured.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.captured.lock().is_empty()
    }

    /// All lines joined with `\n`, newline terminated, as a file sink would
    /// have written them.
    pub fn contents(&self) -> String {
        self.captured
            .lock()
            .iter()
            .map(|c| format!("{}\n", c.line))
            .collect()
    }

    pub fn clear(&self) {
        self.captured.lock().clear();
    }
}

impl Sink for MemorySink {
    fn accept(&self, line: &str, event: &LogEvent) -> Result<(), SinkError> {
        self.captured.lock().push(CapturedLine {
            line: line.to_owned(),
            event: event.clone(),
        });
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;
    use static_assertions::assert_impl_all;
    use std::fs;

    fn event() -> LogEvent {
        LogEvent::new("core", Level::Info, "hello")
    }

    #[test]
    fn sinks_are_send_sync() {
        assert_impl_all!(WriterSink<Vec<u8>>: Send, Sync);
        assert_impl_all!(FileSink: Send, Sync);
        assert_impl_all!(MemorySink: Send, Sync);
    }

    #[test]
    fn writer_sink_terminates_lines() {
        let sink = WriterSink::new(Vec::new());
        sink.accept("INFO - hello", &event()).expect("accept");
        sink.accept("INFO - again", &event()).expect("accept");
        let guard = sink.writer.lock();
        let bytes = guard.as_ref().expect("open writer");
        assert_eq!(bytes.as_slice(), b"INFO - hello\nINFO - again\n");
    }

    #[test]
    fn closed_writer_sink_rejects_lines() {
        let sink = WriterSink::new(Vec::new());
        sink.close().expect("close");
        assert!(sink.is_closed());
        assert!(matches!(
            sink.accept("x", &event()),
            Err(SinkError::Closed)
        ));
    }

    #[test]
    fn file_sink_truncates_then_appends() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.log");
        fs::write(&path, "stale\n").expect("seed file");

        let sink = FileSink::create(&path).expect("create");
        sink.accept("first", &event()).expect("accept");
        sink.close().expect("close");
        assert_eq!(fs::read_to_string(&path).expect("read"), "first\n");

        let sink = FileSink::append(&path).expect("append");
        sink.accept("second", &event()).expect("accept");
        sink.flush().expect("flush");
        assert_eq!(fs::read_to_string(&path).expect("read"), "first\nsecond\n");
        assert_eq!(sink.path(), path.as_path());
    }

    #[test]
    fn memory_sink_clones_share_buffer() {
        let sink = MemorySink::new();
        let attached = sink.clone();
        attached.accept("INFO - hello", &event()).expect("accept");
        assert_eq!(sink.lines(), vec!["INFO - hello".to_string()]);
        assert_eq!(sink.messages(), vec!["hello".to_string()]);
        assert_eq!(sink.contents(), "INFO - hello\n");
        sink.clear();
        assert!(attached.is_empty());
    }
}
