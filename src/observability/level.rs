//! Severity levels and the threshold gate.
//!
//! # Design Decisions
//! - Numeric values follow a verbosity scheme: a threshold of N enables
//!   every message tagged with a level <= N
//! - Numbering is deliberately sparse (1, 2, 4)
//! - Unknown names never fail; they resolve to `Info`

use std::fmt;

use serde::Deserialize;

/// Log severity, doubling as the configured threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Deserialize)]
#[serde(from = "String")]
#[repr(u8)]
pub enum Level {
    Error = 1,
    #[default]
    Info = 2,
    Debug = 4,
}

impl Level {
    /// Resolve a configured level name, falling back to `Info`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "debug" => Level::Debug,
            "error" => Level::Error,
            _ => Level::Info,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Error => "error",
            Level::Info => "info",
            Level::Debug => "debug",
        }
    }

    /// Numeric threshold value.
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Whether a message of `severity` passes when `self` is the threshold.
    ///
    /// Errors always pass.
    #[inline]
    pub fn enables(self, severity: Level) -> bool {
        severity == Level::Error || severity.value() <= self.value()
    }
}

impl From<String> for Level {
    fn from(name: String) -> Self {
        Level::from_name(&name)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
