//! Type definitions and builder structs for hierarchy configuration.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::hierarchy::HierarchyError;
use crate::layout::{SharedLayout, SimpleLayout, TtccLayout};
use crate::level::Level;

use super::sinks::{SinkBuildError, SinkBuilder};

/// Errors that may occur while building a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The provided configuration schema version is unsupported.
    #[error("unsupported configuration version: {0}")]
    UnsupportedVersion(u8),
    /// No root logger configuration was provided.
    #[error("missing root logger configuration")]
    MissingRootLogger,
    /// A configured logger name is not a valid dotted name.
    #[error("invalid logger name {0:?}")]
    InvalidLoggerName(String),
    /// Loggers referenced sink identifiers that were not defined.
    #[error("unknown sink ids: {}", .0.join(", "))]
    UnknownSinkIds(Vec<String>),
    /// A logger listed the same sink more than once.
    #[error("duplicate sink ids: {}", .0.join(", "))]
    DuplicateSinkIds(Vec<String>),
    /// Building a sink failed.
    #[error("failed to build sink {id}: {source}")]
    SinkBuild {
        id: String,
        #[source]
        source: SinkBuildError,
    },
    /// Applying configuration to the hierarchy failed.
    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),
}

/// Layout selection for the configured hierarchy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayoutBuilder {
    Simple,
    /// TTCC layout with an optional `chrono` date pattern.
    Ttcc { date_format: Option<String> },
}

impl LayoutBuilder {
    pub(crate) fn build(&self) -> SharedLayout {
        match self {
            Self::Simple => SharedLayout::new(SimpleLayout),
            Self::Ttcc { date_format: None } => SharedLayout::new(TtccLayout::new()),
            Self::Ttcc {
                date_format: Some(pattern),
            } => SharedLayout::new(TtccLayout::new().with_date_format(pattern.clone())),
        }
    }
}

/// Builder for one logger's configuration.
#[derive(Clone, Debug, Default)]
pub struct LoggerConfigBuilder {
    pub(crate) level: Option<Level>,
    pub(crate) additivity: Option<bool>,
    pub(crate) sinks: Vec<String>,
}

impl LoggerConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_additivity(mut self, additive: bool) -> Self {
        self.additivity = Some(additive);
        self
    }

    /// Set sinks by identifier, replacing any existing list.
    ///
    /// Sinks are attached in the order given.
    pub fn with_sinks<I, S>(mut self, sink_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sinks = sink_ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn level_opt(&self) -> Option<Level> {
        self.level
    }

    pub fn additivity_opt(&self) -> Option<bool> {
        self.additivity
    }

    pub fn sink_ids(&self) -> &[String] {
        &self.sinks
    }
}

/// Builder for the overall configuration.
#[derive(Clone, Debug)]
pub struct ConfigBuilder {
    pub(crate) version: u8,
    pub(crate) reset: bool,
    pub(crate) threshold: Option<Level>,
    pub(crate) layout: Option<LayoutBuilder>,
    pub(crate) sinks: BTreeMap<String, SinkBuilder>,
    pub(crate) loggers: BTreeMap<String, LoggerConfigBuilder>,
    pub(crate) root_logger: Option<LoggerConfigBuilder>,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self {
            version: 1,
            reset: false,
            threshold: None,
            layout: None,
            sinks: BTreeMap::new(),
            loggers: BTreeMap::new(),
            root_logger: None,
        }
    }
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the schema version.
    pub fn with_version(mut self, version: u8) -> Self {
        self.version = version;
        self
    }

    /// Reset the hierarchy before applying, discarding existing loggers.
    pub fn with_reset(mut self, reset: bool) -> Self {
        self.reset = reset;
        self
    }

    /// Set the repository-wide threshold.
    pub fn with_threshold(mut self, level: Level) -> Self {
        self.threshold = Some(level);
        self
    }

    pub fn with_layout(mut self, layout: LayoutBuilder) -> Self {
        self.layout = Some(layout);
        self
    }

    /// Add a sink by identifier, replacing any existing sink with the same id.
    pub fn with_sink(mut self, id: impl Into<String>, builder: SinkBuilder) -> Self {
        self.sinks.insert(id.into(), builder);
        self
    }

    /// Add a logger by name, replacing any existing logger with the same name.
    pub fn with_logger(mut self, name: impl Into<String>, builder: LoggerConfigBuilder) -> Self {
        self.loggers.insert(name.into(), builder);
        self
    }

    /// Set the root logger configuration, replacing any previous configuration.
    pub fn with_root_logger(mut self, builder: LoggerConfigBuilder) -> Self {
        self.root_logger = Some(builder);
        self
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn root_logger(&self) -> Option<&LoggerConfigBuilder> {
        self.root_logger.as_ref()
    }

    pub fn logger_builders(&self) -> &BTreeMap<String, LoggerConfigBuilder> {
        &self.loggers
    }

    pub fn sink_builders(&self) -> &BTreeMap<String, SinkBuilder> {
        &self.sinks
    }
}
