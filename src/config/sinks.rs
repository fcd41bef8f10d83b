//! Sink definitions referenced by identifier from logger configuration.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::sink::{FileSink, SharedSink, WriterSink};

/// Errors that may occur while building a sink.
#[derive(Debug, Error)]
pub enum SinkBuildError {
    /// Invalid user supplied configuration.
    #[error("invalid sink configuration: {0}")]
    InvalidConfig(String),
    /// Underlying I/O error whilst opening the sink.
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamTarget {
    Stdout,
    Stderr,
}

/// Concrete sink builder variants.
#[derive(Clone)]
pub enum SinkBuilder {
    /// Write to a standard stream.
    Stream(StreamTarget),
    /// Write to a file, truncating it unless `append` is set.
    File { path: PathBuf, append: bool },
    /// Attach an already constructed sink.
    Shared(SharedSink),
}

impl SinkBuilder {
    pub fn stdout() -> Self {
        Self::Stream(StreamTarget::Stdout)
    }

    pub fn stderr() -> Self {
        Self::Stream(StreamTarget::Stderr)
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File {
            path: path.into(),
            append: false,
        }
    }

    pub fn append(path: impl Into<PathBuf>) -> Self {
        Self::File {
            path: path.into(),
            append: true,
        }
    }

    pub fn shared(sink: SharedSink) -> Self {
        Self::Shared(sink)
    }

    pub(crate) fn build(&self) -> Result<SharedSink, SinkBuildError> {
        Ok(match self {
            Self::Stream(StreamTarget::Stdout) => Arc::new(WriterSink::stdout()),
            Self::Stream(StreamTarget::Stderr) => Arc::new(WriterSink::stderr()),
            Self::File { path, .. } if path.as_os_str().is_empty() => {
                return Err(SinkBuildError::InvalidConfig(
                    "file sink path must not be empty".into(),
                ));
            }
            Self::File { path, append: true } => Arc::new(FileSink::append(path)?),
            Self::File {
                path,
                append: false,
            } => Arc::new(FileSink::create(path)?),
            Self::Shared(sink) => Arc::clone(sink),
        })
    }
}

impl fmt::Debug for SinkBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stream(target) => f.debug_tuple("Stream").field(target).finish(),
            Self::File { path, append } => f
                .debug_struct("File")
                .field("path", path)
                .field("append", append)
                .finish(),
            Self::Shared(_) => f.write_str("Shared(..)"),
        }
    }
}
