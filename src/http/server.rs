//! HTTP server setup.
//!
//! # Responsibilities
//! - Create Axum Router with the echo handlers
//! - Wire up middleware (request timeout, access log)
//! - Serve on a listener with client addresses available to the access log
//! - Stop on Ctrl+C or a caller-supplied signal

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    http::{Method, Uri},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;

use crate::http::middleware::wrap_with_access_log_to;
use crate::observability::{Level, Logger};

/// Small HTTP server whose every request is access-logged.
pub struct HttpServer {
    router: Router,
    logger: Logger,
}

impl HttpServer {
    /// Create a new HTTP server logging through `logger`.
    pub fn new(logger: Logger, request_timeout: Duration) -> Self {
        let router = Self::build_router(request_timeout, logger.clone());
        Self { router, logger }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(request_timeout: Duration, logger: Logger) -> Router {
        let routes = Router::new()
            .route("/{*path}", any(echo_handler))
            .route("/", any(echo_handler))
            .layer(TimeoutLayer::new(request_timeout));
        // Outermost, so timed-out requests are logged too
        wrap_with_access_log_to(routes, logger)
    }

    /// Run the server until Ctrl+C.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        self.run_with_shutdown(listener, shutdown_signal()).await
    }

    /// Run the server until `signal` resolves.
    pub async fn run_with_shutdown<F>(
        self,
        listener: TcpListener,
        signal: F,
    ) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        self.logger
            .log(Level::Info, format_args!("HTTP server listening on {addr}"));

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(signal)
            .await?;

        self.logger.info("HTTP server stopped");
        Ok(())
    }

    /// The router with middleware applied, for embedding or in-process tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

async fn echo_handler(method: Method, uri: Uri) -> String {
    format!("{method} {}\n", uri.path())
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        return;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogConfig;
    use crate::observability::capture::Capture;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_echo_is_access_logged() {
        let (logger, capture) = Capture::logger(&LogConfig {
            display_minimal: true,
            ..LogConfig::default()
        });
        let server = HttpServer::new(logger, Duration::from_secs(5));

        let response = server
            .router()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/a/b")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"POST /a/b\n");

        assert!(capture.text().contains("\"POST /a/b HTTP/1.1 200 10\""));
    }
}
