//! Request/response logging middleware.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use std::time::Instant;
use tracing::{error, info};

use crate::error::ErrorReport;

/// Logs request method, path, status, and duration.
///
/// Internal errors are logged with their full message here; clients only
/// ever see the generic one.
pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    if let Some(report) = response.extensions().get::<ErrorReport>() {
        if report.kind.is_internal() {
            error!(
                method = %method,
                path = %uri.path(),
                kind = %report.kind,
                error = %report.message,
                "Request failed"
            );
        }
    }

    info!(
        method = %method,
        path = %uri.path(),
        status = %status.as_u16(),
        duration_ms = %duration.as_millis(),
        "HTTP request"
    );

    response
}
