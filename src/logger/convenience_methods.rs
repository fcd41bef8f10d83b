//! Fixed-level logging methods.
//!
//! Kept apart from `mod.rs` so the handle's configuration surface and its
//! call surface read separately.

use crate::dispatch::Dispatch;
use crate::error_payload::ErrorPayload;
use crate::level::Level;

use super::Logger;

impl Logger<'_> {
    #[track_caller]
    pub fn fatal(&self, message: &str) -> Dispatch {
        self.log(Level::Fatal, message)
    }

    #[track_caller]
    pub fn error(&self, message: &str) -> Dispatch {
        self.log(Level::Error, message)
    }

    #[track_caller]
    pub fn warn(&self, message: &str) -> Dispatch {
        self.log(Level::Warn, message)
    }

    #[track_caller]
    pub fn info(&self, message: &str) -> Dispatch {
        self.log(Level::Info, message)
    }

    #[track_caller]
    pub fn debug(&self, message: &str) -> Dispatch {
        self.log(Level::Debug, message)
    }

    /// Log at DEBUG with an attached error, mirroring `debug(msg, err)`.
    #[track_caller]
    pub fn debug_with_error(&self, message: &str, error: ErrorPayload) -> Dispatch {
        self.log_with_error(Level::Debug, message, error)
    }

    #[track_caller]
    pub fn error_with_error(&self, message: &str, error: ErrorPayload) -> Dispatch {
        self.log_with_error(Level::Error, message, error)
    }
}
