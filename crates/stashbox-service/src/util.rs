//! Internal helpers shared by the gateway services.

use std::future::Future;
use std::time::Duration;

use stashbox_core::error::AppError;
use stashbox_core::result::AppResult;

/// Bound an object-store call by the configured operation timeout.
///
/// No call in this core is allowed to block a request indefinitely; on
/// elapse the operation fails with `StorageUnavailable` instead of hanging.
pub(crate) async fn bounded<T>(
    limit: Duration,
    op: &str,
    fut: impl Future<Output = AppResult<T>>,
) -> AppResult<T> {
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(AppError::storage_unavailable(format!(
            "Object store {op} timed out after {limit:?}"
        ))),
    }
}
