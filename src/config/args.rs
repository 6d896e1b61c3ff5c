//! Command line flags for the logger.
//!
//! Flatten `LogArgs` into a binary's clap parser to expose the flags.

use std::path::PathBuf;

use clap::Args;

use crate::config::schema::{Output, PartialLogConfig};
use crate::observability::Level;

#[derive(Args, Debug, Clone, Default)]
pub struct LogArgs {
    /// Where to output logs: 'stdout', 'stderr' or 'file'
    #[arg(long = "BIVALVE_OUTPUT", value_name = "OUTPUT")]
    pub output: Option<String>,

    /// Log level: 'debug', 'info' or 'error'
    #[arg(long = "BIVALVE_LEVEL", value_name = "LEVEL")]
    pub level: Option<String>,

    /// Log filename, used with the 'file' output
    #[arg(long = "BIVALVE_FILENAME", value_name = "FILE")]
    pub filename: Option<PathBuf>,

    /// Log only the message, without date/time/file:line header
    #[arg(
        long = "BIVALVE_DISPLAY_MINIMAL",
        value_name = "BOOL",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub display_minimal: Option<bool>,
}

impl LogArgs {
    pub fn to_partial(&self) -> PartialLogConfig {
        PartialLogConfig {
            output: self.output.as_deref().map(Output::from_name),
            level: self.level.as_deref().map(Level::from_name),
            filename: self.filename.clone(),
            display_minimal: self.display_minimal,
            terminal_output: None,
        }
    }
}
