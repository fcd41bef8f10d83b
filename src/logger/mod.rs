//! Borrowed handles to logger nodes.
//!
//! A [`Logger`] pairs a [`Hierarchy`] reference with the [`LoggerId`] of one
//! node. It is cheap to clone and carries no state of its own: levels,
//! additivity and sinks live in the hierarchy, so every handle to the same
//! name observes the same configuration.

mod convenience_methods;

use std::fmt;

use crate::dispatch::Dispatch;
use crate::error_payload::ErrorPayload;
use crate::hierarchy::{Hierarchy, HierarchyError, LoggerId};
use crate::level::Level;
use crate::sink::SharedSink;

#[derive(Clone)]
pub struct Logger<'h> {
    hierarchy: &'h Hierarchy,
    id: LoggerId,
    name: String,
}

impl<'h> Logger<'h> {
    pub(crate) fn new(hierarchy: &'h Hierarchy, id: LoggerId, name: String) -> Self {
        Self {
            hierarchy,
            id,
            name,
        }
    }

    pub fn id(&self) -> LoggerId {
        self.id
    }

    /// Full dotted name of the node.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hierarchy(&self) -> &'h Hierarchy {
        self.hierarchy
    }

    /// Handle to the parent node, or `None` for root.
    pub fn parent(&self) -> Result<Option<Logger<'h>>, HierarchyError> {
        let Some(parent) = self.hierarchy.parent(self.id)? else {
            return Ok(None);
        };
        let name = self.hierarchy.name(parent)?;
        Ok(Some(Logger::new(self.hierarchy, parent, name)))
    }

    /// Log `message` at `level`.
    #[track_caller]
    pub fn log(&self, level: Level, message: &str) -> Dispatch {
        self.hierarchy.log(self.id, level, message, None)
    }

    /// Log `message` at `level` with an attached error payload.
    #[track_caller]
    pub fn log_with_error(&self, level: Level, message: &str, error: ErrorPayload) -> Dispatch {
        self.hierarchy.log(self.id, level, message, Some(error))
    }

    pub fn is_enabled_for(&self, level: Level) -> bool {
        self.hierarchy.is_enabled_for(self.id, level)
    }

    /// Explicit level of this node; `None` means it inherits.
    pub fn level(&self) -> Result<Option<Level>, HierarchyError> {
        self.hierarchy.explicit_level(self.id)
    }

    pub fn effective_level(&self) -> Result<Level, HierarchyError> {
        self.hierarchy.effective_level(self.id)
    }

    pub fn set_level(&self, level: Level) -> Result<(), HierarchyError> {
        self.hierarchy.set_level(self.id, Some(level))
    }

    /// Remove the explicit level so the node inherits from its parent.
    pub fn clear_level(&self) -> Result<(), HierarchyError> {
        self.hierarchy.set_level(self.id, None)
    }

    pub fn additivity(&self) -> Result<bool, HierarchyError> {
        self.hierarchy.additivity(self.id)
    }

    pub fn set_additivity(&self, additive: bool) -> Result<(), HierarchyError> {
        self.hierarchy.set_additivity(self.id, additive)
    }

    pub fn add_sink(&self, sink: SharedSink) -> Result<(), HierarchyError> {
        self.hierarchy.add_sink(self.id, sink)
    }

    pub fn remove_sink(&self, sink: &SharedSink) -> Result<bool, HierarchyError> {
        self.hierarchy.remove_sink(self.id, sink)
    }

    pub fn clear_sinks(&self) -> Result<(), HierarchyError> {
        self.hierarchy.clear_sinks(self.id)
    }

    pub fn sinks(&self) -> Result<Vec<SharedSink>, HierarchyError> {
        self.hierarchy.sinks(self.id)
    }
}

impl fmt::Debug for Logger<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("id", &self.id)
            .finish()
    }
}

#[cfg(test)]
#[path = "logger_tests.rs"]
mod logger_tests;
