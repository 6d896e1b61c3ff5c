//! Access Log Middleware.
//! Emits one Apache-style line per request through the info emitter.
//!
//! The line is written once the response body has been fully produced (or
//! dropped), so the byte count and elapsed time cover the whole response.

use std::net::SocketAddr;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use axum::{
    body::{Body, Bytes},
    extract::{ConnectInfo, OriginalUri, Request, State},
    http::{Method, StatusCode, Version},
    middleware::{self, Next},
    response::Response,
    Router,
};
use chrono::{DateTime, Utc};
use http_body::{Body as HttpBody, Frame, SizeHint};

use crate::observability::{logging, Logger};

/// Timestamp layout inside the brackets of an access line.
pub const ACCESS_TIME_FORMAT: &str = "%d/%b/%Y %H:%M:%S";

/// One request's worth of access-log data.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessRecord {
    pub client_address: String,
    pub timestamp: DateTime<Utc>,
    pub method: Method,
    pub uri: String,
    pub protocol: Version,
    pub status: StatusCode,
    pub response_bytes: u64,
    pub elapsed: Duration,
}

impl AccessRecord {
    /// Render as `ADDR - - [TIME] "METHOD URI PROTO STATUS BYTES" SECONDS`.
    pub fn to_line(&self) -> String {
        format!(
            "{} - - [{}] \"{} {} {:?} {} {}\" {:.6}\n",
            self.client_address,
            self.timestamp.format(ACCESS_TIME_FORMAT),
            self.method,
            self.uri,
            self.protocol,
            self.status.as_u16(),
            self.response_bytes,
            self.elapsed.as_secs_f64(),
        )
    }
}

/// Wrap `router` so every request is logged through the process-wide logger.
pub fn wrap_with_access_log<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    wrap_with_access_log_to(router, logging::global().clone())
}

/// Wrap `router` so every request is logged through `logger`.
pub fn wrap_with_access_log_to<S>(router: Router<S>, logger: Logger) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(middleware::from_fn_with_state(logger, access_log_middleware))
}

pub async fn access_log_middleware(
    State(logger): State<Logger>,
    request: Request,
    next: Next,
) -> Response {
    let client_address = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "-".to_string());
    // Nested routers strip their prefix from the request URI
    let uri = request
        .extensions()
        .get::<OriginalUri>()
        .map(|OriginalUri(uri)| uri.to_string())
        .unwrap_or_else(|| request.uri().to_string());
    let method = request.method().clone();
    let protocol = request.version();

    let timestamp = Utc::now();
    let start = Instant::now();
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let record = AccessRecord {
        client_address,
        timestamp,
        method,
        uri,
        protocol,
        status: parts.status,
        response_bytes: 0,
        elapsed: Duration::ZERO,
    };
    let body = LoggedBody {
        inner: body,
        pending: Some(PendingLine {
            record,
            logger,
            start,
        }),
    };
    Response::from_parts(parts, Body::new(body))
}

struct PendingLine {
    record: AccessRecord,
    logger: Logger,
    start: Instant,
}

/// Response body interceptor counting the bytes handed to the client.
struct LoggedBody {
    inner: Body,
    pending: Option<PendingLine>,
}

impl LoggedBody {
    fn count(&mut self, bytes: usize) {
        if let Some(pending) = self.pending.as_mut() {
            pending.record.response_bytes += bytes as u64;
        }
    }

    fn finish(&mut self) {
        if let Some(mut pending) = self.pending.take() {
            pending.record.elapsed = pending.start.elapsed();
            pending.logger.info(&pending.record.to_line());
        }
    }
}

impl HttpBody for LoggedBody {
    type Data = Bytes;
    type Error = axum::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.get_mut();
        let polled = Pin::new(&mut this.inner).poll_frame(cx);
        match &polled {
            Poll::Ready(Some(Ok(frame))) => {
                if let Some(data) = frame.data_ref() {
                    this.count(data.len());
                }
                // Known-length bodies are not polled past their last frame
                if this.inner.is_end_stream() {
                    this.finish();
                }
            }
            Poll::Ready(Some(Err(_))) | Poll::Ready(None) => this.finish(),
            Poll::Pending => {}
        }
        polled
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}

impl Drop for LoggedBody {
    fn drop(&mut self) {
        self.finish();
    }
}
