//! Output sinks for emitted log lines.
//!
//! # Responsibilities
//! - Bind the logger to stdout, stderr, an append-mode file or an
//!   arbitrary writer
//! - Write each line with a single `write_all` under a lock so concurrent
//!   emitters never interleave mid-line

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::config::Output;

/// Destination for formatted log lines.
pub enum Sink {
    Stdout,
    Stderr,
    File { path: PathBuf, file: Mutex<File> },
    Writer(Mutex<Box<dyn Write + Send>>),
}

impl Sink {
    /// Build the sink selected by a configured output.
    pub fn for_output(output: Output, filename: &Path) -> io::Result<Self> {
        match output {
            Output::Stdout => Ok(Sink::Stdout),
            Output::Stderr => Ok(Sink::Stderr),
            Output::File => Sink::open_file(filename),
        }
    }

    /// Open (or create) `path` for appending.
    pub fn open_file(path: &Path) -> io::Result<Self> {
        let mut options = OpenOptions::new();
        options.create(true).append(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o644);
        }
        let file = options.open(path)?;
        Ok(Sink::File {
            path: path.to_path_buf(),
            file: Mutex::new(file),
        })
    }

    /// Wrap any writer, e.g. an in-memory buffer.
    pub fn writer<W: Write + Send + 'static>(writer: W) -> Self {
        Sink::Writer(Mutex::new(Box::new(writer)))
    }

    /// Write one complete line.
    pub fn write_line(&self, line: &[u8]) -> io::Result<()> {
        match self {
            Sink::Stdout => io::stdout().lock().write_all(line),
            Sink::Stderr => io::stderr().lock().write_all(line),
            Sink::File { file, .. } => file
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .write_all(line),
            Sink::Writer(writer) => {
                let mut writer = writer.lock().unwrap_or_else(PoisonError::into_inner);
                writer.write_all(line)?;
                writer.flush()
            }
        }
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sink::Stdout => f.write_str("Stdout"),
            Sink::Stderr => f.write_str("Stderr"),
            Sink::File { path, .. } => f.debug_struct("File").field("path", path).finish(),
            Sink::Writer(_) => f.write_str("Writer"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_file_sink_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, "existing\n").unwrap();

        let sink = Sink::open_file(&path).unwrap();
        sink.write_line(b"first\n").unwrap();
        sink.write_line(b"second\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "existing\nfirst\nsecond\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_file_sink_created_with_readable_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.log");
        Sink::open_file(&path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        // umask may only remove bits
        assert_eq!(mode & 0o133, 0);
        assert_eq!(mode & 0o600, 0o600);
    }

    #[test]
    fn test_open_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("app.log");
        assert!(Sink::for_output(Output::File, &path).is_err());
    }

    #[test]
    fn test_console_outputs() {
        let path = Path::new("unused.log");
        assert!(matches!(Sink::for_output(Output::Stdout, path).unwrap(), Sink::Stdout));
        assert!(matches!(Sink::for_output(Output::Stderr, path).unwrap(), Sink::Stderr));
    }
}
