//! Hierarchical logging with additive sink dispatch.
//!
//! Loggers are addressed by dot-separated names and form a tree rooted at
//! `root`. A logger without an explicit level inherits its nearest
//! ancestor's; a call is emitted when its level reaches both that
//! effective level and the repository threshold, and is then delivered to
//! the logger's sinks and its ancestors' sinks until a non-additive logger
//! is passed.
//!
//! The [`pipeline`] and [`compare`] modules normalise captured output and
//! check it against a witness file; the `hierlog-verify` binary drives
//! them over the scripted run in [`scenario`].

pub mod compare;
pub mod config;
mod dispatch;
pub mod error_payload;
pub mod hierarchy;
pub mod layout;
pub mod level;
#[cfg(feature = "log-compat")]
pub mod log_compat;
pub mod log_record;
mod logger;
pub mod pipeline;
pub mod scenario;
pub mod sink;
#[cfg(any(test, feature = "test-util"))]
pub mod test_utils;

pub use compare::{CompareError, Comparison, LineMismatch};
pub use config::{ConfigBuilder, ConfigError, LoggerConfigBuilder, SinkBuilder};
pub use dispatch::{Dispatch, DispatchReport, SinkFailure};
pub use error_payload::{ErrorPayload, StackFrame};
pub use hierarchy::{Hierarchy, HierarchyError, LoggerId, ROOT_LOGGER_NAME};
pub use layout::{Layout, SharedLayout, SimpleLayout, TtccLayout};
pub use level::{Level, ParseLevelError};
#[cfg(feature = "log-compat")]
pub use log_compat::LogBridge;
pub use log_record::{EventMetadata, LogEvent};
pub use logger::Logger;
pub use pipeline::{FilterSpec, LineFilter, LinePipeline, PipelineBuilder, PipelineError, Verdict};
pub use sink::{FileSink, MemorySink, SharedSink, Sink, SinkError, WriterSink};
