//! Panic recovery response.

use std::any::Any;

use axum::response::{IntoResponse, Response};
use tracing::error;

use greenlight_core::error::AppError;

use crate::error::ApiError;
use crate::panic::panic_message;

/// Turns a caught panic into the generic 500 response.
///
/// Used with `CatchPanicLayer::custom` at the outermost layer.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = panic_message(payload.as_ref());
    error!(panic = %message, "Request handler panicked");
    ApiError(AppError::internal(format!("handler panicked: {message}"))).into_response()
}
