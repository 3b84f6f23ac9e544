//! Bearer token authentication middleware.

use axum::extract::{Request, State};
use axum::http::HeaderValue;
use axum::http::header::{AUTHORIZATION, VARY};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use greenlight_core::error::{AppError, ErrorKind};
use greenlight_entity::Principal;

use crate::error::ApiError;
use crate::state::AppState;

/// Resolves the `Authorization` header to a `Principal` and attaches it to
/// the request.
///
/// Every response passing through here varies on `Authorization`, including
/// rejections.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .map(|value| value.to_str().map(str::to_owned));

    let mut response = match resolve(&state, header).await {
        Ok(principal) => {
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        Err(err) => ApiError(err).into_response(),
    };

    response
        .headers_mut()
        .append(VARY, HeaderValue::from_static("Authorization"));
    response
}

async fn resolve(
    state: &AppState,
    header: Option<Result<String, axum::http::header::ToStrError>>,
) -> Result<Principal, AppError> {
    let header = header.transpose().map_err(|_| {
        AppError::malformed_auth_header("invalid or missing authentication token")
    })?;

    state
        .authenticator
        .authenticate(header.as_deref())
        .await
        .map_err(|err| match err.kind {
            // A plaintext of the wrong shape cannot name a live token.
            ErrorKind::Validation => {
                AppError::invalid_token("invalid or missing authentication token")
            }
            _ => err,
        })
}
