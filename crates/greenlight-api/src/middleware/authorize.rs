//! Per-route permission checks.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use greenlight_entity::permission::{MOVIES_READ, MOVIES_WRITE};

use crate::error::ApiResult;
use crate::extractors::CurrentPrincipal;
use crate::state::AppState;

async fn require(
    state: &AppState,
    principal: &greenlight_entity::Principal,
    code: &str,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    state.authorizer.require_permission(principal, code).await?;
    Ok(next.run(request).await)
}

/// Requires `movies:read`.
pub async fn require_movies_read(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    require(&state, &principal, MOVIES_READ, request, next).await
}

/// Requires `movies:write`.
pub async fn require_movies_write(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    require(&state, &principal, MOVIES_WRITE, request, next).await
}
