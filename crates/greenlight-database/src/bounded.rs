//! Deadline-bounded storage calls.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use greenlight_core::error::AppError;
use greenlight_core::result::AppResult;

/// Runs a storage call, failing with `StorageTimeout` if it does not finish
/// within `limit`. The call is not retried.
pub async fn bounded<T, F>(limit: Duration, operation: &'static str, call: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => {
            warn!(
                operation,
                timeout_ms = limit.as_millis() as u64,
                "Storage call timed out"
            );
            Err(AppError::storage_timeout(format!(
                "{operation} did not complete within {}ms",
                limit.as_millis()
            )))
        }
    }
}
