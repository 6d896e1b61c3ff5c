//! Bivalve demo server.
//!
//! Serves an echo handler behind the access-log middleware so the logger
//! configuration can be exercised from the command line:
//!
//! ```text
//! bivalve --bind 127.0.0.1:8080 --BIVALVE_LEVEL debug --BIVALVE_DISPLAY_MINIMAL
//! BIVALVE_OUTPUT=file BIVALVE_FILENAME=access.log bivalve
//! bivalve --config log.toml --watch
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bivalve::config::{self, load_config, ConfigWatcher, LogArgs};
use bivalve::{debugf, infof, HttpServer};

#[derive(Parser, Debug)]
#[command(name = "bivalve")]
#[command(about = "Echo server with leveled logging and access logs", long_about = None)]
struct Cli {
    /// Address to listen on
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    bind: String,

    /// TOML file with log settings; overrides flags and environment
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Reload the config file when it changes
    #[arg(short, long, requires = "config")]
    watch: bool,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    request_timeout_secs: u64,

    #[command(flatten)]
    log: LogArgs,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Internal diagnostics (sink failures, watcher events) go through tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bivalve=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let explicit = cli.config.as_deref().map(load_config).transpose()?;
    let log_config = bivalve::init(explicit.as_ref(), &cli.log);
    debugf!("cli args: {:?}", cli);

    // Held for the life of the process; dropping it stops watching
    let _watcher = match (&cli.config, cli.watch) {
        (Some(path), true) => {
            let fallback = cli.log.to_partial().or(config::from_env());
            Some(ConfigWatcher::new(path, fallback, bivalve::global().clone()).run()?)
        }
        _ => None,
    };

    let listener = TcpListener::bind(&cli.bind).await?;
    infof!(
        "bivalve starting: level={} output={:?}",
        log_config.level,
        log_config.output
    );

    let server = HttpServer::new(
        bivalve::global().clone(),
        Duration::from_secs(cli.request_timeout_secs),
    );
    server.run(listener).await?;

    bivalve::info("Shutdown complete");
    Ok(())
}
