//! API middleware

use axum::{
    extract::Request,
    http::HeaderName,
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info, warn};

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Request logging middleware
///
/// Logs method, uri, status and duration of every request, tagged with the
/// request id set by the outer layer.
pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let start = Instant::now();
    let response = next.run(request).await;
    let duration_ms = start.elapsed().as_millis() as u64;
    let status = response.status();

    if status.is_server_error() {
        warn!(
            method = %method,
            uri = %uri,
            request_id = %request_id,
            status = status.as_u16(),
            duration_ms,
            "API request failed"
        );
    } else {
        info!(
            method = %method,
            uri = %uri,
            request_id = %request_id,
            status = status.as_u16(),
            duration_ms,
            "API request"
        );
    }

    response
}
