//! Structured error payloads attached to log events.
//!
//! A payload records the error's type name and message, the frames it was
//! raised through and the messages of its `source()` chain. Frames come
//! either from the call site (`#[track_caller]`) or from a captured
//! `std::backtrace::Backtrace`, whose text form is parsed into
//! [`StackFrame`] values.

use std::backtrace::Backtrace;
use std::error::Error;
use std::panic::Location;

use serde::{Deserialize, Serialize};

/// A single frame of a captured stack.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackFrame {
    /// Fully qualified function name.
    pub function: String,
    /// Source file, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Line number in `filename`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lineno: Option<u32>,
}

impl StackFrame {
    pub fn new(function: impl Into<String>, filename: impl Into<String>, lineno: u32) -> Self {
        Self {
            function: function.into(),
            filename: Some(filename.into()),
            lineno: Some(lineno),
        }
    }

    /// Frame without source information, e.g. a runtime shim.
    pub fn unresolved(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            ..Default::default()
        }
    }

    /// Frame for the caller of the annotated function chain.
    #[track_caller]
    pub fn caller(function: impl Into<String>) -> Self {
        let location = Location::caller();
        Self::new(function, location.file(), location.line())
    }

    /// Parse the `Display` output of a `std::backtrace::Backtrace`.
    ///
    /// The format is one `N: symbol` line per frame, optionally followed by
    /// an `at file:line:col` line. Lines that fit neither shape are skipped.
    pub fn parse_backtrace(text: &str) -> Vec<StackFrame> {
        let mut frames: Vec<StackFrame> = Vec::new();
        for raw in text.lines() {
            let line = raw.trim();
            if let Some(location) = line.strip_prefix("at ") {
                if let Some(frame) = frames.last_mut()
                    && frame.filename.is_none()
                {
                    let (file, lineno) = split_location(location);
                    frame.filename = Some(file.to_string());
                    frame.lineno = lineno;
                }
                continue;
            }
            if let Some((index, symbol)) = line.split_once(": ")
                && !index.is_empty()
                && index.bytes().all(|b| b.is_ascii_digit())
            {
                frames.push(StackFrame::unresolved(symbol.trim()));
            }
        }
        frames
    }
}

/// Split `path/to/file.rs:12:5` into the path and line number.
fn split_location(location: &str) -> (&str, Option<u32>) {
    let mut parts = location.rsplitn(3, ':');
    let last = parts.next();
    let middle = parts.next();
    let rest = parts.next();
    match (rest, middle, last) {
        (Some(file), Some(line), Some(_col)) if line.parse::<u32>().is_ok() => {
            (file, line.parse().ok())
        }
        (_, Some(_), Some(line)) if line.parse::<u32>().is_ok() => {
            let file = location
                .rsplit_once(':')
                .map_or(location, |(file, _)| file);
            (file, line.parse().ok())
        }
        _ => (location, None),
    }
}

/// Error information carried by a [`LogEvent`](crate::LogEvent).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// Short type name of the error, e.g. `Exception` or `io::Error`.
    pub type_name: String,
    /// `Display` text of the error.
    pub message: String,
    /// Frames from innermost to outermost.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub frames: Vec<StackFrame>,
    /// Messages of the `source()` chain, nearest cause first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<String>,
}

impl ErrorPayload {
    pub fn new(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            message: message.into(),
            ..Default::default()
        }
    }

    /// Build a payload from a Rust error, walking its `source()` chain.
    pub fn from_error<E>(err: &E) -> Self
    where
        E: Error + ?Sized,
    {
        let mut causes = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }
        Self {
            type_name: short_type_name::<E>().to_string(),
            message: err.to_string(),
            frames: Vec::new(),
            causes,
        }
    }

    #[must_use]
    pub fn with_frames(mut self, frames: Vec<StackFrame>) -> Self {
        self.frames = frames;
        self
    }

    /// Append a frame naming `function` at the caller's location.
    #[must_use]
    #[track_caller]
    pub fn with_caller_frame(mut self, function: impl Into<String>) -> Self {
        self.frames.push(StackFrame::caller(function));
        self
    }

    /// Replace the frames with a freshly captured backtrace.
    ///
    /// Captures regardless of `RUST_BACKTRACE`. Symbol names depend on the
    /// build's debug information, so the result is inherently volatile.
    #[must_use]
    pub fn with_backtrace(mut self) -> Self {
        let backtrace = Backtrace::force_capture();
        self.frames = StackFrame::parse_backtrace(&backtrace.to_string());
        self
    }
}

fn short_type_name<E: ?Sized>() -> &'static str {
    let full = std::any::type_name::<E>();
    // Keep generic arguments intact; only trim the leading module path.
    let head = full.split('<').next().unwrap_or(full);
    match head.rfind("::") {
        Some(idx) => &full[idx + 2..],
        None => full,
    }
}
