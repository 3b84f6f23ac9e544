//! Unmatched route and method responses.

use axum::Json;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};

use greenlight_core::error::AppError;

use crate::error::{ApiError, ApiErrorResponse};

/// Any path with no route.
pub async fn not_found() -> Response {
    ApiError(AppError::not_found(
        "the requested resource could not be found",
    ))
    .into_response()
}

/// A known path requested with an unsupported method.
pub async fn method_not_allowed(method: Method) -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ApiErrorResponse::new(
            "METHOD_NOT_ALLOWED",
            format!("the {method} method is not supported for this resource"),
        )),
    )
        .into_response()
}
