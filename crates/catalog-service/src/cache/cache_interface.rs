//! Cache interface trait for abstracted caching operations.

use async_trait::async_trait;
use catalog_core::{CatalogResult, Interface};
use std::time::Duration;

/// Cache interface for storing and retrieving cached data.
///
/// This trait provides an abstraction over caching implementations,
/// allowing for easy swapping between Redis, in-memory, or other cache backends.
///
/// Uses JSON strings for type-erased storage to maintain dyn-compatibility;
/// typed access goes through [`ReadThroughCache`](super::ReadThroughCache).
#[async_trait]
pub trait CacheInterface: Interface + Send + Sync {
    /// Get a raw JSON value from the cache.
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    async fn get_raw(&self, key: &str) -> CatalogResult<Option<String>>;

    /// Set a raw JSON value in the cache with a TTL.
    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> CatalogResult<()>;

    /// Delete a value from the cache.
    ///
    /// Returns `true` if the key existed and was deleted. Deleting an absent key
    /// is not an error.
    async fn delete(&self, key: &str) -> CatalogResult<bool>;

    /// Check that the backend is reachable.
    async fn ping(&self) -> CatalogResult<()>;

    /// Check if caching is enabled.
    fn is_enabled(&self) -> bool;

    /// Short backend name for logs and readiness output.
    fn backend_name(&self) -> &'static str;
}
