//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! explicit value / config file (TOML)   → loader.rs (load_config)
//! command line flags                    → args.rs (LogArgs)
//! BIVALVE_* environment variables       → loader.rs (from_env)
//!     → loader.rs resolve (explicit > flag > env > default)
//!     → LogConfig (immutable)
//!     → Logger::configure (atomic swap)
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads and resolves again
//!     → Logger::configure
//! ```
//!
//! # Design Decisions
//! - Unrecognised values never error; they fall back to a default
//! - Each source yields a `PartialLogConfig` so precedence is per field

pub mod args;
pub mod loader;
pub mod schema;
pub mod watcher;

pub use args::LogArgs;
pub use loader::{from_env, from_env_with, load_config, resolve, ConfigError};
pub use schema::{LogConfig, Output, PartialLogConfig};
pub use watcher::ConfigWatcher;
