//! Per-IP rate limiting middleware.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

use greenlight_core::error::AppError;

use crate::error::ApiResult;
use crate::state::AppState;

/// Rejects the request with 429 when the client's bucket is empty.
///
/// The client is identified by the peer address recorded by
/// `into_make_service_with_connect_info`. Without one, all such requests
/// share the unspecified address.
pub async fn rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    if !state.limiter.enabled() {
        return Ok(next.run(request).await);
    }

    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    if !state.limiter.allow(ip).await {
        debug!(client_ip = %ip, "Rate limit exceeded");
        return Err(AppError::rate_limited("rate limit exceeded").into());
    }

    Ok(next.run(request).await)
}
