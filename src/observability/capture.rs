//! In-memory sink used by unit tests.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use crate::config::LogConfig;
use crate::observability::{Logger, Sink};

#[derive(Clone, Default)]
pub(crate) struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    /// Build a logger for `config` writing into a fresh capture buffer.
    pub(crate) fn logger(config: &LogConfig) -> (Logger, Capture) {
        let capture = Capture::default();
        let logger = Logger::with_sink(config, Sink::writer(capture.clone()));
        (logger, capture)
    }

    pub(crate) fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    pub(crate) fn clear(&self) {
        self.0.lock().unwrap().clear();
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
