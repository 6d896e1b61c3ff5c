//! Leveled line logging with an HTTP access-log middleware.

pub mod config;
pub mod http;
pub mod observability;

pub use config::{LogArgs, LogConfig, Output, PartialLogConfig};
pub use http::{wrap_with_access_log, wrap_with_access_log_to, AccessRecord, HttpServer};
pub use observability::logging::{configure, debug, error, global, info, init};
pub use observability::{Level, Logger, Sink};
