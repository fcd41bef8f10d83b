//! Configuration builders for hierarchies.

mod build;
mod sinks;
mod types;

pub use sinks::{SinkBuildError, SinkBuilder, StreamTarget};
pub use types::{ConfigBuilder, ConfigError, LayoutBuilder, LoggerConfigBuilder};

#[cfg(test)]
mod config_tests;
