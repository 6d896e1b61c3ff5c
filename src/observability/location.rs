//! Call-site annotation for log headers.
//!
//! Emitters are `#[track_caller]`, so the location reported here is the code
//! that called `info`/`debug`/`error` (or invoked one of the `*f!` macros),
//! never a frame inside this crate.

use std::fmt;
use std::panic::Location;

const UNKNOWN_FILE: &str = "???";

/// Short file name and line of a log call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    pub file: &'static str,
    pub line: u32,
}

impl CallSite {
    /// Location of whoever called the outermost `#[track_caller]` frame.
    #[track_caller]
    #[inline]
    pub fn caller() -> Self {
        Self::from_location(Location::caller())
    }

    pub fn from_location(location: &'static Location<'static>) -> Self {
        Self::new(location.file(), location.line())
    }

    /// Build a call site from a raw path, keeping only the final segment.
    pub fn new(path: &'static str, line: u32) -> Self {
        match short_file(path) {
            Some(file) => Self { file, line },
            None => Self::unknown(),
        }
    }

    /// Placeholder for locations that cannot be resolved.
    pub fn unknown() -> Self {
        Self {
            file: UNKNOWN_FILE,
            line: 1,
        }
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

fn short_file(path: &str) -> Option<&str> {
    let file = path
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(path);
    if file.is_empty() {
        None
    } else {
        Some(file)
    }
}
