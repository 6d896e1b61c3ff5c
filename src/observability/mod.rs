//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! info / debug / error (+ *f! macros)
//!     → logging.rs (threshold gate, header, color)
//!     → location.rs (caller file:line)
//!     → sink.rs (stdout, stderr, file or writer)
//! ```
//!
//! # Design Decisions
//! - One line per call, written synchronously on the calling thread
//! - Errors are never suppressed by the threshold

pub mod level;
pub mod location;
pub mod logging;
pub mod sink;

#[cfg(test)]
pub(crate) mod capture;

pub use level::Level;
pub use location::CallSite;
pub use logging::Logger;
pub use sink::Sink;
