//! Severity levels and their total order.
//!
//! `All` and `Off` are sentinels: a threshold of `All` admits every call and
//! a threshold of `Off` admits none. A logger without an explicit level
//! inherits one, which is modelled as `Option<Level>` on the node rather
//! than as an extra variant here.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum Level {
    All = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Fatal = 5,
    Off = 6,
}

/// Raised when a level name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown log level: {0}")]
pub struct ParseLevelError(pub String);

impl Level {
    /// Levels a log call can be issued at, lowest first.
    pub const LOGGABLE: [Level; 5] = [
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Fatal,
    ];

    pub fn rank(self) -> u8 {
        self as u8
    }

    /// Compare two levels by rank.
    pub fn compare(self, other: Level) -> Ordering {
        self.rank().cmp(&other.rank())
    }

    /// Return `true` when `self` is at or above `threshold`.
    pub fn at_least(self, threshold: Level) -> bool {
        self.rank() >= threshold.rank()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::All => "ALL",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
            Level::Off => "OFF",
        }
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::Debug
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ALL" => Ok(Self::All),
            "DEBUG" => Ok(Self::Debug),
            "INFO" => Ok(Self::Info),
            "WARN" | "WARNING" => Ok(Self::Warn),
            "ERROR" => Ok(Self::Error),
            "FATAL" => Ok(Self::Fatal),
            "OFF" => Ok(Self::Off),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}
