//! Configuration file watcher for hot reload.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::config::loader::{load_config, resolve, ConfigError};
use crate::config::schema::{LogConfig, PartialLogConfig};
use crate::observability::Logger;

/// Watches a TOML log configuration file and reconfigures a logger when it
/// changes.
pub struct ConfigWatcher {
    path: PathBuf,
    fallback: PartialLogConfig,
    logger: Logger,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher.
    ///
    /// `fallback` holds the flag and environment sources; the file acts as
    /// the explicit source on top of them.
    pub fn new(path: &Path, fallback: PartialLogConfig, logger: Logger) -> Self {
        Self {
            path: path.to_path_buf(),
            fallback,
            logger,
        }
    }

    /// Load the file and apply it once.
    pub fn reload(&self) -> Result<LogConfig, ConfigError> {
        reload(&self.path, &self.fallback, &self.logger)
    }

    /// Start watching the file in a background thread.
    ///
    /// Watching stops when the returned watcher is dropped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let path = self.path.clone();
        let fallback = self.fallback.clone();
        let logger = self.logger.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        tracing::info!("Log config file change detected, reloading...");
                        if let Err(e) = reload(&path, &fallback, &logger) {
                            tracing::error!(
                                "Failed to reload log config: {}. Keeping current configuration.",
                                e
                            );
                        }
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Log config watcher started");
        Ok(watcher)
    }
}

fn reload(
    path: &Path,
    fallback: &PartialLogConfig,
    logger: &Logger,
) -> Result<LogConfig, ConfigError> {
    let file = load_config(path)?;
    let config = resolve(Some(&file), fallback, &PartialLogConfig::default());
    logger.configure(&config);
    Ok(config)
}
