//! Timeout wrapper for async operations.

use catalog_core::CatalogError;
use std::time::Duration;

/// Wraps an async operation with a timeout.
///
/// # Errors
///
/// Returns [`CatalogError::Timeout`] if the operation does not finish in time,
/// otherwise the operation's own result.
pub async fn with_timeout<F, Fut, T>(duration: Duration, f: F) -> Result<T, CatalogError>
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<T, CatalogError>>,
{
    tokio::time::timeout(duration, f())
        .await
        .map_err(|_| CatalogError::Timeout(format!("Operation timed out after {duration:?}")))?
}
