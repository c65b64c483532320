use std::time::Duration;

use axum::{
    http::{header, Extensions, HeaderMap, Response, StatusCode, Version},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    decompression::RequestDecompressionLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, OnResponse, TraceLayer},
};
use tracing::{Level, Span};

/// Wrap `router` with request logging, gzip request decompression and gzip
/// response compression.
pub fn apply(router: Router) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                    .on_request(DefaultOnRequest::new().level(Level::INFO))
                    .on_response(LogResponse),
            )
            .layer(RequestDecompressionLayer::new())
            .layer(CompressionLayer::new().compress_when(json_or_html)),
    )
}

/// Only structured bodies are worth compressing; short URLs and redirects are
/// sent as-is.
fn json_or_html(_: StatusCode, _: Version, headers: &HeaderMap, _: &Extensions) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json") || ct.starts_with("text/html"))
}

/// Logs status and latency once the response headers are ready, plus the
/// size when the body length is known up front.
#[derive(Debug, Clone, Copy)]
struct LogResponse;

impl<B> OnResponse<B> for LogResponse {
    fn on_response(self, response: &Response<B>, latency: Duration, _span: &Span) {
        let status = response.status().as_u16();
        match content_length(response) {
            Some(size) => tracing::info!(status, size, ?latency, "response sent"),
            None => tracing::info!(status, ?latency, "response sent"),
        }
    }
}

// Absent for compressed and streamed bodies.
fn content_length<B>(response: &Response<B>) -> Option<u64> {
    response
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}
