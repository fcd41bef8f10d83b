//! Test-only sinks shared across unit and integration tests.
//!
//! Compiled for unit tests and, through the `test-util` feature, for the
//! integration tests under `tests/`.

mod failing_sink;

pub use failing_sink::{FailingSink, RecordingSink};
