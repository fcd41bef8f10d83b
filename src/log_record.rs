//! Log event representation.
//!
//! This module defines the [`LogEvent`] struct that is rendered by layouts
//! and handed to sinks, along with the contextual metadata captured at the
//! call site: timestamp, thread and source location.

use std::fmt;
use std::panic::Location;
use std::thread::{self, ThreadId};
use std::time::SystemTime;

use crate::error_payload::ErrorPayload;
use crate::level::Level;

/// Additional context associated with a log event.
#[derive(Clone, Debug)]
pub struct EventMetadata {
    /// Source file name for the log call.
    pub filename: String,
    /// Line number in the source file.
    pub line_number: u32,
    /// Time the event was created.
    pub timestamp: SystemTime,
    /// ID of the thread that created the event.
    pub thread_id: ThreadId,
    /// Name of the thread that created the event (if any).
    pub thread_name: Option<String>,
}

impl EventMetadata {
    /// Capture timestamp, thread info and the caller's location.
    #[track_caller]
    pub fn capture() -> Self {
        Self::at(Location::caller())
    }

    /// Capture timestamp and thread info for a known source location.
    pub fn at(location: &Location<'_>) -> Self {
        Self::for_source(location.file(), location.line())
    }

    pub fn for_source(filename: &str, line_number: u32) -> Self {
        let current = thread::current();
        Self {
            filename: filename.to_string(),
            line_number,
            timestamp: SystemTime::now(),
            thread_id: current.id(),
            thread_name: current.name().map(ToString::to_string),
        }
    }

    /// Thread name, falling back to the debug form of the thread id.
    pub fn thread_label(&self) -> String {
        self.thread_name
            .clone()
            .unwrap_or_else(|| format!("{:?}", self.thread_id))
    }
}

#[derive(Clone, Debug)]
pub struct LogEvent {
    /// Name of the logger the call was issued against.
    pub logger: String,
    pub level: Level,
    pub message: String,
    /// Error attached to the call, if any.
    pub error: Option<ErrorPayload>,
    pub metadata: EventMetadata,
}

impl LogEvent {
    /// Construct a new event, capturing metadata at the caller's location.
    #[track_caller]
    pub fn new(logger: &str, level: Level, message: &str) -> Self {
        Self {
            logger: logger.to_owned(),
            level,
            message: message.to_owned(),
            error: None,
            metadata: EventMetadata::capture(),
        }
    }

    /// Construct an event with explicitly supplied metadata.
    pub fn with_metadata(
        logger: &str,
        level: Level,
        message: &str,
        metadata: EventMetadata,
    ) -> Self {
        Self {
            logger: logger.to_owned(),
            level,
            message: message.to_owned(),
            error: None,
            metadata,
        }
    }

    #[must_use]
    pub fn with_error(mut self, error: ErrorPayload) -> Self {
        self.error = Some(error);
        self
    }
}

impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.level, self.message)
    }
}
