//! Configuration schema definitions.
//!
//! `LogConfig` is the effective configuration the logger runs with.
//! `PartialLogConfig` is what a single source (explicit value, flags,
//! environment, config file) contributes; unset fields defer to the next
//! source.

use std::path::PathBuf;

use serde::Deserialize;

use crate::observability::Level;

/// Environment variable / flag selecting the sink.
pub const OUTPUT_KEY: &str = "BIVALVE_OUTPUT";
/// Environment variable / flag selecting the level.
pub const LEVEL_KEY: &str = "BIVALVE_LEVEL";
/// Environment variable / flag naming the log file.
pub const FILENAME_KEY: &str = "BIVALVE_FILENAME";
/// Environment variable / flag turning off the line header.
pub const DISPLAY_MINIMAL_KEY: &str = "BIVALVE_DISPLAY_MINIMAL";

pub const DEFAULT_FILENAME: &str = "bivalve.log";

/// Where log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum Output {
    #[default]
    Stdout,
    Stderr,
    File,
}

impl Output {
    /// Resolve a configured output name. Anything unrecognised is stderr.
    pub fn from_name(name: &str) -> Self {
        match name {
            "stdout" => Output::Stdout,
            "file" => Output::File,
            _ => Output::Stderr,
        }
    }
}

impl From<String> for Output {
    fn from(name: String) -> Self {
        Output::from_name(&name)
    }
}

/// Effective logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Selected sink.
    pub output: Output,

    /// Threshold for `info`/`debug` emission.
    pub level: Level,

    /// Log file, used when `output` is `File`.
    pub filename: PathBuf,

    /// Emit only the message, without the date/time/file:line header.
    pub display_minimal: bool,

    /// Colorize debug and error messages with ANSI escapes.
    pub terminal_output: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            output: Output::Stdout,
            level: Level::Info,
            filename: PathBuf::from(DEFAULT_FILENAME),
            display_minimal: false,
            terminal_output: false,
        }
    }
}

/// Configuration contributed by one source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PartialLogConfig {
    pub output: Option<Output>,

    pub level: Option<Level>,

    pub filename: Option<PathBuf>,

    #[serde(alias = "displayMinimal")]
    pub display_minimal: Option<bool>,

    #[serde(alias = "terminalOutput")]
    pub terminal_output: Option<bool>,
}

impl PartialLogConfig {
    /// Field-wise merge: values set on `self` win over `fallback`.
    pub fn or(self, fallback: PartialLogConfig) -> Self {
        Self {
            output: self.output.or(fallback.output),
            level: self.level.or(fallback.level),
            filename: self.filename.or(fallback.filename),
            display_minimal: self.display_minimal.or(fallback.display_minimal),
            terminal_output: self.terminal_output.or(fallback.terminal_output),
        }
    }

    /// Fill remaining gaps with the hard-coded defaults.
    pub fn into_config(self) -> LogConfig {
        let defaults = LogConfig::default();
        LogConfig {
            output: self.output.unwrap_or(defaults.output),
            level: self.level.unwrap_or(defaults.level),
            filename: self.filename.unwrap_or(defaults.filename),
            display_minimal: self.display_minimal.unwrap_or(defaults.display_minimal),
            terminal_output: self.terminal_output.unwrap_or(defaults.terminal_output),
        }
    }
}

impl From<LogConfig> for PartialLogConfig {
    fn from(config: LogConfig) -> Self {
        Self {
            output: Some(config.output),
            level: Some(config.level),
            filename: Some(config.filename),
            display_minimal: Some(config.display_minimal),
            terminal_output: Some(config.terminal_output),
        }
    }
}
