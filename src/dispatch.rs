//! Emit-or-suppress decision and additive fan-out to sinks.
//!
//! A call is emitted when its level is at least both the logger's effective
//! level and the repository threshold. The sinks are collected from the
//! logger and its ancestors while the registry read lock is held; the lock
//! is released before rendering and delivery so a sink may itself log
//! through the same hierarchy.

use std::panic::Location;

use log::{debug, warn};

use crate::error_payload::ErrorPayload;
use crate::hierarchy::{Hierarchy, LoggerId};
use crate::level::Level;
use crate::log_record::{EventMetadata, LogEvent};
use crate::sink::SinkError;

/// Outcome of a single log call.
#[derive(Debug)]
pub enum Dispatch {
    /// The call was below a threshold; nothing was rendered or written.
    Suppressed,
    /// The call was rendered and offered to every collected sink.
    Emitted(DispatchReport),
}

impl Dispatch {
    pub fn is_emitted(&self) -> bool {
        matches!(self, Self::Emitted(_))
    }

    pub fn is_suppressed(&self) -> bool {
        matches!(self, Self::Suppressed)
    }

    pub fn report(&self) -> Option<&DispatchReport> {
        match self {
            Self::Emitted(report) => Some(report),
            Self::Suppressed => None,
        }
    }

    /// The rendered text, when the call was emitted.
    pub fn rendered(&self) -> Option<&str> {
        self.report().map(|r| r.line.as_str())
    }
}

/// Delivery summary for an emitted call.
#[derive(Debug)]
pub struct DispatchReport {
    /// Text produced by the layout.
    pub line: String,
    /// Sinks that accepted the line.
    pub delivered: usize,
    /// Sinks that failed, in dispatch order.
    pub failures: Vec<SinkFailure>,
}

impl DispatchReport {
    /// `true` when every collected sink accepted the line.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Total sinks the line was offered to.
    pub fn attempted(&self) -> usize {
        self.delivered + self.failures.len()
    }
}

/// A sink that failed to accept an emitted line.
#[derive(Debug)]
pub struct SinkFailure {
    /// Position of the sink in dispatch order.
    pub sink_index: usize,
    pub error: SinkError,
}

impl Hierarchy {
    /// Log `message` at `level` through the logger `id`.
    ///
    /// Sink failures never abort delivery; they are reported in the returned
    /// [`DispatchReport`] and logged as warnings. A stale id is suppressed.
    #[track_caller]
    pub fn log(
        &self,
        id: LoggerId,
        level: Level,
        message: &str,
        error: Option<ErrorPayload>,
    ) -> Dispatch {
        let location = Location::caller();
        self.dispatch(id, level, |logger| {
            let mut event =
                LogEvent::with_metadata(logger, level, message, EventMetadata::at(location));
            event.error = error;
            event
        })
    }

    /// Decide whether to emit, then build the event and fan it out.
    ///
    /// `make_event` runs only for emitted calls and receives the logger name.
    pub(crate) fn dispatch<F>(&self, id: LoggerId, level: Level, make_event: F) -> Dispatch
    where
        F: FnOnce(&str) -> LogEvent,
    {
        // Diagnostics may route back into this hierarchy, so nothing is
        // logged until the guard is dropped.
        let collected = {
            let registry = self.read();
            registry.resolve(id).map(|index| {
                is_enabled(level, registry.effective_level(index), registry.threshold).then(|| {
                    (
                        registry.node(index).name.clone(),
                        registry.collect_sinks(index),
                        registry.layout.clone(),
                    )
                })
            })
        };
        let (logger, sinks, layout) = match collected {
            Ok(Some(collected)) => collected,
            Ok(None) => return Dispatch::Suppressed,
            Err(err) => {
                debug!("hierlog: dropping call on stale logger: {err}");
                return Dispatch::Suppressed;
            }
        };

        let event = make_event(&logger);
        let line = layout.render(&event);

        let mut delivered = 0;
        let mut failures = Vec::new();
        for (sink_index, sink) in sinks.iter().enumerate() {
            match sink.accept(&line, &event) {
                Ok(()) => delivered += 1,
                Err(error) => {
                    warn!("hierlog: sink {sink_index} for logger '{logger}' failed: {error}");
                    failures.push(SinkFailure { sink_index, error });
                }
            }
        }
        Dispatch::Emitted(DispatchReport {
            line,
            delivered,
            failures,
        })
    }

    /// Return whether a call at `level` through `id` would be emitted.
    pub fn is_enabled_for(&self, id: LoggerId, level: Level) -> bool {
        let registry = self.read();
        match registry.resolve(id) {
            Ok(index) => is_enabled(level, registry.effective_level(index), registry.threshold),
            Err(_) => false,
        }
    }
}

/// `Off` is never a valid call level, so it is never emitted.
fn is_enabled(level: Level, effective: Level, threshold: Level) -> bool {
    level != Level::Off && level.at_least(effective) && level.at_least(threshold)
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod dispatch_tests;
