//! Convenience result type alias for Greenlight.

use crate::error::AppError;

/// A specialized `Result` type for Greenlight operations.
pub type AppResult<T> = Result<T, AppError>;
