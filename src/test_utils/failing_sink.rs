//! Sinks with scripted behaviour for dispatch tests.

use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::log_record::LogEvent;
use crate::sink::{Sink, SinkError};

/// Sink that rejects every line and counts the attempts.
#[derive(Clone, Default)]
pub struct FailingSink {
    attempts: Arc<AtomicUsize>,
}

impl FailingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl Sink for FailingSink {
    fn accept(&self, _line: &str, _event: &LogEvent) -> Result<(), SinkError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(SinkError::Rejected("scripted failure".into()))
    }

    fn flush(&self) -> Result<(), SinkError> {
        Err(SinkError::Closed)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Sink that appends `label` to a shared journal on every line.
///
/// Several recording sinks sharing one journal expose the order in which
/// dispatch visited them.
#[derive(Clone)]
pub struct RecordingSink {
    label: &'static str,
    journal: Arc<Mutex<Vec<&'static str>>>,
}

impl RecordingSink {
    pub fn new(label: &'static str, journal: Arc<Mutex<Vec<&'static str>>>) -> Self {
        Self { label, journal }
    }
}

impl Sink for RecordingSink {
    fn accept(&self, _line: &str, _event: &LogEvent) -> Result<(), SinkError> {
        self.journal.lock().push(self.label);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
