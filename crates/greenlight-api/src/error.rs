//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::header::WWW_AUTHENTICATE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use greenlight_core::error::{AppError, ErrorKind};

/// Message sent to clients in place of any internal error.
pub const INTERNAL_ERROR_MESSAGE: &str =
    "the server encountered a problem and could not process your request";

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
    /// Optional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// The unredacted error, attached to the response for the logging layer.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    /// Error category.
    pub kind: ErrorKind,
    /// Full message, including for internal kinds.
    pub message: String,
}

/// HTTP status for an error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation | ErrorKind::DuplicateEmail => StatusCode::BAD_REQUEST,
        ErrorKind::MalformedAuthHeader
        | ErrorKind::InvalidToken
        | ErrorKind::InvalidCredentials
        | ErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
        ErrorKind::Inactive | ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::EditConflict => StatusCode::CONFLICT,
        ErrorKind::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        ErrorKind::StorageTimeout
        | ErrorKind::Database
        | ErrorKind::Configuration
        | ErrorKind::Serialization
        | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ApiErrorResponse {
    /// Builds a body with no details.
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
        }
    }
}

/// Converts an `AppError` into its HTTP response.
pub fn error_response(err: AppError) -> Response {
    let status = status_for(err.kind);

    let body = if err.kind.is_internal() {
        ApiErrorResponse::new(ErrorKind::Internal.to_string(), INTERNAL_ERROR_MESSAGE)
    } else {
        let details = match (err.kind, &err.details) {
            (ErrorKind::DuplicateEmail, None) => {
                Some(serde_json::json!({ "email": err.message.clone() }))
            }
            _ => err.details.clone(),
        };
        ApiErrorResponse {
            error: err.kind.to_string(),
            message: err.message.clone(),
            details,
        }
    };

    let mut response = (status, Json(body)).into_response();

    if matches!(
        err.kind,
        ErrorKind::MalformedAuthHeader | ErrorKind::InvalidToken
    ) {
        response
            .headers_mut()
            .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    }

    response.extensions_mut().insert(ErrorReport {
        kind: err.kind,
        message: match &err.source {
            Some(source) => format!("{}: {source}", err.message),
            None => err.message.clone(),
        },
    });

    response
}

/// Newtype letting handlers return `AppError` directly.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error_response(self.0)
    }
}

/// Result type for handlers and middleware.
pub type ApiResult<T> = Result<T, ApiError>;
