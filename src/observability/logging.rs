//! Leveled line logging.
//!
//! # Responsibilities
//! - Gate messages against the configured threshold
//! - Format `DATE TIME.MICROS FILE:LINE: MESSAGE` lines (or the bare message)
//! - Write each line through the active sink
//! - Provide the process-wide default logger behind the free functions and
//!   the `infof!`/`debugf!`/`errorf!` macros
//!
//! # Design Decisions
//! - Sink and threshold live in one `ArcSwap` snapshot, so a concurrent
//!   `configure` is never observed half-applied
//! - Emitters are `#[track_caller]`; the header names the line that called
//!   them
//! - Write failures are dropped; logging never fails the caller

use std::fmt::{self, Write as _};
use std::sync::{Arc, LazyLock};

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};

use crate::config::{self, LogArgs, LogConfig, PartialLogConfig};
use crate::observability::location::CallSite;
use crate::observability::sink::Sink;
use crate::observability::Level;

const HEADER_TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S%.6f";

const DEBUG_COLOR: &str = "\x1b[0;36m";
const ERROR_COLOR: &str = "\x1b[1;31m";
const RESET_COLOR: &str = "\x1b[0m";

/// Immutable snapshot of the active configuration.
#[derive(Debug)]
struct LoggerState {
    config: LogConfig,
    sink: Arc<Sink>,
}

impl LoggerState {
    fn format_line(
        &self,
        severity: Level,
        site: CallSite,
        message: fmt::Arguments<'_>,
        now: DateTime<Utc>,
    ) -> String {
        let mut line = String::with_capacity(128);

        if !self.config.display_minimal {
            let _ = write!(line, "{} {}: ", now.format(HEADER_TIME_FORMAT), site);
        }

        let color = match severity {
            Level::Debug if self.config.terminal_output => Some(DEBUG_COLOR),
            Level::Error if self.config.terminal_output => Some(ERROR_COLOR),
            _ => None,
        };
        let _ = match color {
            Some(color) => write!(line, "{color}{message}{RESET_COLOR}"),
            None => write!(line, "{message}"),
        };

        if !line.ends_with('\n') {
            line.push('\n');
        }
        line
    }
}

/// Cloneable handle to a swappable logging configuration.
///
/// Clones share state: reconfiguring one reconfigures all of them.
#[derive(Clone)]
pub struct Logger {
    state: Arc<ArcSwap<LoggerState>>,
}

impl Logger {
    /// Create a logger for `config`.
    ///
    /// A file that cannot be opened leaves the logger on stderr.
    pub fn new(config: &LogConfig) -> Self {
        match Sink::for_output(config.output, &config.filename) {
            Ok(sink) => Self::with_sink(config, sink),
            Err(err) => {
                let logger = Self::with_sink(config, Sink::Stderr);
                logger.report_sink_error(config, &err);
                logger
            }
        }
    }

    /// Create a logger writing to an explicit sink. `config.output` and
    /// `config.filename` are kept for reporting only.
    pub fn with_sink(config: &LogConfig, sink: Sink) -> Self {
        let logger = Self {
            state: Arc::new(ArcSwap::from_pointee(LoggerState {
                config: config.clone(),
                sink: Arc::new(sink),
            })),
        };
        logger.log_config();
        logger
    }

    /// Replace the active configuration.
    ///
    /// If the new sink cannot be opened the previous sink stays active and
    /// the error is written through it; level and formatting still change.
    pub fn configure(&self, config: &LogConfig) {
        match Sink::for_output(config.output, &config.filename) {
            Ok(sink) => self.configure_with_sink(config, sink),
            Err(err) => {
                self.state.rcu(|current| {
                    Arc::new(LoggerState {
                        config: LogConfig {
                            output: current.config.output,
                            filename: current.config.filename.clone(),
                            ..config.clone()
                        },
                        sink: Arc::clone(&current.sink),
                    })
                });
                self.report_sink_error(config, &err);
                self.log_config();
            }
        }
    }

    /// Replace the active configuration and sink.
    pub fn configure_with_sink(&self, config: &LogConfig, sink: Sink) {
        self.state.store(Arc::new(LoggerState {
            config: config.clone(),
            sink: Arc::new(sink),
        }));
        self.log_config();
    }

    /// Current effective configuration.
    pub fn config(&self) -> LogConfig {
        self.state.load().config.clone()
    }

    pub fn threshold(&self) -> Level {
        self.state.load().config.level
    }

    /// Whether a message of `severity` would currently be written.
    pub fn enabled(&self, severity: Level) -> bool {
        self.threshold().enables(severity)
    }

    #[track_caller]
    pub fn info(&self, message: &str) {
        self.log(Level::Info, format_args!("{message}"));
    }

    #[track_caller]
    pub fn debug(&self, message: &str) {
        self.log(Level::Debug, format_args!("{message}"));
    }

    /// Errors are written regardless of the threshold.
    #[track_caller]
    pub fn error(&self, message: &str) {
        self.log(Level::Error, format_args!("{message}"));
    }

    /// Emit a preformatted message at `severity`.
    #[track_caller]
    pub fn log(&self, severity: Level, message: fmt::Arguments<'_>) {
        let state = self.state.load();
        if !state.config.level.enables(severity) {
            return;
        }
        let line = state.format_line(severity, CallSite::caller(), message, Utc::now());
        let _ = state.sink.write_line(line.as_bytes());
    }

    fn log_config(&self) {
        let state = self.state.load();
        self.log(Level::Debug, format_args!("Log Config set to : {:?}", state.config));
    }

    /// Report a sink that failed to open, both to `tracing` subscribers and
    /// through whichever sink is active now.
    fn report_sink_error(&self, config: &LogConfig, err: &std::io::Error) {
        tracing::error!(
            filename = %config.filename.display(),
            error = %err,
            "Failed to open log file"
        );
        self.log(
            Level::Error,
            format_args!(
                "Failed to open log file {}: {}",
                config.filename.display(),
                err
            ),
        );
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.load();
        f.debug_struct("Logger")
            .field("config", &state.config)
            .field("sink", &state.sink)
            .finish()
    }
}

static GLOBAL: LazyLock<Logger> = LazyLock::new(|| {
    Logger::new(&config::resolve(
        None,
        &PartialLogConfig::default(),
        &config::from_env(),
    ))
});

/// The process-wide logger used by the free functions and macros.
///
/// Configured from the environment on first use.
pub fn global() -> &'static Logger {
    &GLOBAL
}

/// Reconfigure the process-wide logger.
pub fn configure(config: &LogConfig) {
    global().configure(config);
}

/// Resolve explicit, flag and environment sources and apply the result to
/// the process-wide logger.
pub fn init(explicit: Option<&PartialLogConfig>, args: &LogArgs) -> LogConfig {
    let config = config::resolve(explicit, &args.to_partial(), &config::from_env());
    configure(&config);
    config
}

#[track_caller]
pub fn info(message: &str) {
    global().log(Level::Info, format_args!("{message}"));
}

#[track_caller]
pub fn debug(message: &str) {
    global().log(Level::Debug, format_args!("{message}"));
}

#[track_caller]
pub fn error(message: &str) {
    global().log(Level::Error, format_args!("{message}"));
}

/// Backing function for the formatting macros.
#[doc(hidden)]
#[track_caller]
pub fn __log(severity: Level, message: fmt::Arguments<'_>) {
    global().log(severity, message);
}

/// Log a formatted message at info level through the process-wide logger.
#[macro_export]
macro_rules! infof {
    ($($arg:tt)+) => {
        $crate::observability::logging::__log(
            $crate::observability::Level::Info,
            ::std::format_args!($($arg)+),
        )
    };
}

/// Log a formatted message at debug level through the process-wide logger.
#[macro_export]
macro_rules! debugf {
    ($($arg:tt)+) => {
        $crate::observability::logging::__log(
            $crate::observability::Level::Debug,
            ::std::format_args!($($arg)+),
        )
    };
}

/// Log a formatted message at error level through the process-wide logger.
#[macro_export]
macro_rules! errorf {
    ($($arg:tt)+) => {
        $crate::observability::logging::__log(
            $crate::observability::Level::Error,
            ::std::format_args!($($arg)+),
        )
    };
}
