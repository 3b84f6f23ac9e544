//! Typed path parameter helpers.

use greenlight_core::error::AppError;

/// Parses a positive resource id from a path segment.
///
/// Anything else is reported as a missing resource.
pub fn parse_id(raw: &str) -> Result<i64, AppError> {
    match raw.parse::<i64>() {
        Ok(id) if id >= 1 => Ok(id),
        _ => Err(AppError::not_found(
            "the requested resource could not be found",
        )),
    }
}
