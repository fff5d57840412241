//! Observability middleware for request tracing and timing.

use std::time::Instant;

use axum::Router;
use axum::extract::Request;
use axum::http::{HeaderMap, header};
use axum::middleware::{Next, from_fn};
use axum::response::Response;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer;
use tower_http::trace::TraceLayer;

use crate::TRACING_TARGET_METRICS;

/// Header carrying the per-request identifier.
const REQUEST_ID_HEADER: &str = "x-request-id";

/// Extension trait for `axum::`[`Router`] to apply observability middleware.
pub trait RouterObservabilityExt<S> {
    /// Layers request id generation and propagation, a tracing span per
    /// request, and redaction of the session credentials in logs.
    fn with_observability(self) -> Self;

    /// Layers a middleware that records method, path, status and duration.
    fn with_metrics(self) -> Self;
}

impl<S> RouterObservabilityExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_observability(self) -> Self {
        self.layer(PropagateRequestIdLayer::new(
            header::HeaderName::from_static(REQUEST_ID_HEADER),
        ))
        .layer(SetSensitiveRequestHeadersLayer::new([
            header::AUTHORIZATION,
            header::COOKIE,
        ]))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(
            header::HeaderName::from_static(REQUEST_ID_HEADER),
            MakeRequestUuid,
        ))
    }

    fn with_metrics(self) -> Self {
        self.layer(from_fn(track_request_metrics))
    }
}

fn content_length(headers: &HeaderMap) -> u64 {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0)
}

/// Request timing middleware.
async fn track_request_metrics(request: Request, next: Next) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    tracing::trace!(
        target: TRACING_TARGET_METRICS,
        method = %method,
        path = %path,
        "request started"
    );

    let response = next.run(request).await;
    let duration = start_time.elapsed();

    tracing::debug!(
        target: TRACING_TARGET_METRICS,
        method = %method,
        path = %path,
        status = %response.status(),
        duration_ms = duration.as_millis() as u64,
        response_size = content_length(response.headers()),
        "request completed"
    );

    response
}
