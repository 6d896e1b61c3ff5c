//! HTTP integration.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, timeout)
//!     → middleware/access_log.rs (start timer, intercept body)
//!     → handler
//!     → body streamed to client, bytes counted
//!     → access line emitted at info level
//! ```

pub mod middleware;
pub mod server;

pub use middleware::{wrap_with_access_log, wrap_with_access_log_to, AccessRecord};
pub use server::HttpServer;
