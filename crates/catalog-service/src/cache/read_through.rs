//! Read-through cache over any [`CacheInterface`] backend.
//!
//! Lookups consult the backend first and fall back to a caller-supplied loader on
//! a miss, storing the loader's result (including "not found") with a TTL. The
//! backend is never authoritative: any backend failure or timeout is logged,
//! counted, and treated as a miss.

use super::CacheInterface;
use crate::metrics;
use catalog_core::{CatalogError, CatalogResult};
use catalog_resilience::with_timeout;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{debug, warn};

/// Default upper bound for a single backend call.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_millis(500);

/// A cached lookup result.
///
/// Serialized as `{"found": <value>}` or the bare string `"missing"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cached<T> {
    /// The loader returned a value.
    Found(T),
    /// The loader reported absence.
    Missing,
}

impl<T> Cached<T> {
    /// Converts into the `Option` the loader produced.
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::Missing => None,
        }
    }
}

impl<T> From<Option<T>> for Cached<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Missing, Self::Found)
    }
}

/// Per-key load gate.
///
/// Serializes loaders for the same key inside this process. A slot is removed
/// when the last permit for it drops, or on the next acquire if its waiters
/// were all cancelled.
#[derive(Debug, Default)]
struct LoadGate {
    slots: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl LoadGate {
    async fn acquire(&self, key: &str) -> LoadPermit<'_> {
        let slot = {
            let mut slots = self.slots.lock();
            // a waiter cancelled mid-acquire leaves its slot behind with no owner
            slots.retain(|_, slot| Arc::strong_count(slot) > 1);
            Arc::clone(slots.entry(key.to_string()).or_default())
        };
        let guard = Arc::clone(&slot).lock_owned().await;
        LoadPermit {
            gate: self,
            key: key.to_string(),
            slot,
            guard: Some(guard),
        }
    }

    fn in_flight(&self) -> usize {
        self.slots
            .lock()
            .values()
            .filter(|slot| Arc::strong_count(slot) > 1)
            .count()
    }
}

struct LoadPermit<'a> {
    gate: &'a LoadGate,
    key: String,
    slot: Arc<AsyncMutex<()>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for LoadPermit<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut slots = self.gate.slots.lock();
        // one reference in the map, one here; anything more is a waiter
        if Arc::strong_count(&self.slot) == 2 {
            slots.remove(&self.key);
        }
    }
}

/// Cache-aside helper generic over value type and loader.
pub struct ReadThroughCache {
    backend: Arc<dyn CacheInterface>,
    gate: LoadGate,
    operation_timeout: Duration,
    cache_missing: bool,
}

impl ReadThroughCache {
    /// Wraps a backend with the default operation timeout.
    #[must_use]
    pub fn new(backend: Arc<dyn CacheInterface>) -> Self {
        Self {
            backend,
            gate: LoadGate::default(),
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
            cache_missing: true,
        }
    }

    /// Sets the upper bound for each backend call.
    #[must_use]
    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    /// Controls whether "not found" results are cached.
    #[must_use]
    pub fn with_missing_markers(mut self, enabled: bool) -> Self {
        self.cache_missing = enabled;
        self
    }

    /// The wrapped backend.
    #[must_use]
    pub fn backend(&self) -> &Arc<dyn CacheInterface> {
        &self.backend
    }

    /// Returns the cached value for `key`, or runs `loader` and caches its result.
    ///
    /// A present, unexpired entry is returned without invoking `loader`. At most
    /// one loader per key runs at a time in this process; callers that waited
    /// re-check the cache before loading themselves.
    ///
    /// # Errors
    ///
    /// Propagates the loader's error. Errors are never cached.
    pub async fn get_or_load<T, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        loader: F,
    ) -> CatalogResult<Option<T>>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = CatalogResult<Option<T>>> + Send,
    {
        if let Some(cached) = self.lookup::<T>(key).await {
            return Ok(cached.into_option());
        }

        let _permit = self.gate.acquire(key).await;

        if let Some(cached) = self.lookup::<T>(key).await {
            return Ok(cached.into_option());
        }

        debug!(key = %key, "Loading value from source");
        metrics::record_load();
        let value = loader().await?;

        let entry = match &value {
            Some(found) => Some(Cached::Found(found)),
            None if self.cache_missing => Some(Cached::Missing),
            None => None,
        };
        if let Some(entry) = entry {
            self.store(key, &entry, ttl).await;
        }

        Ok(value)
    }

    /// Writes `value` under `key` unconditionally.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Cache`] or [`CatalogError::Timeout`] if the backend
    /// write fails.
    pub async fn set<T>(&self, key: &str, value: &T, ttl: Duration) -> CatalogResult<()>
    where
        T: Serialize + Sync,
    {
        let json = serde_json::to_string(&Cached::Found(value))?;
        with_timeout(self.operation_timeout, || self.backend.set_raw(key, &json, ttl)).await
    }

    /// Removes `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Cache`] or [`CatalogError::Timeout`] if the backend
    /// delete fails.
    pub async fn remove(&self, key: &str) -> CatalogResult<()> {
        let existed = with_timeout(self.operation_timeout, || self.backend.delete(key)).await?;
        debug!(key = %key, existed, "Cache entry removed");
        Ok(())
    }

    /// Checks that the backend answers within the operation timeout.
    ///
    /// # Errors
    ///
    /// Returns the backend or timeout error.
    pub async fn ping(&self) -> CatalogResult<()> {
        with_timeout(self.operation_timeout, || self.backend.ping()).await
    }

    /// Number of keys with a loader running or waiting.
    #[must_use]
    pub fn loads_in_flight(&self) -> usize {
        self.gate.in_flight()
    }

    /// `Some` on a hit (found or missing marker), `None` on a miss or failure.
    async fn lookup<T: DeserializeOwned>(&self, key: &str) -> Option<Cached<T>> {
        let raw = match with_timeout(self.operation_timeout, || self.backend.get_raw(key)).await {
            Ok(raw) => raw,
            Err(e) => {
                self.degraded("get", key, &e);
                return None;
            }
        };

        let Some(json) = raw else {
            debug!(key = %key, "Cache miss");
            metrics::record_miss();
            return None;
        };

        match serde_json::from_str::<Cached<T>>(&json) {
            Ok(cached) => {
                debug!(key = %key, found = matches!(cached, Cached::Found(_)), "Cache hit");
                metrics::record_hit();
                Some(cached)
            }
            Err(e) => {
                self.degraded("decode", key, &CatalogError::from(e));
                None
            }
        }
    }

    async fn store<T: Serialize + Sync>(&self, key: &str, entry: &Cached<&T>, ttl: Duration) {
        let json = match serde_json::to_string(entry) {
            Ok(json) => json,
            Err(e) => {
                self.degraded("encode", key, &CatalogError::from(e));
                return;
            }
        };

        match with_timeout(self.operation_timeout, || self.backend.set_raw(key, &json, ttl)).await {
            Ok(()) => debug!(key = %key, ttl_secs = ttl.as_secs(), "Cache entry stored"),
            Err(e) => self.degraded("set", key, &e),
        }
    }

    fn degraded(&self, operation: &'static str, key: &str, error: &CatalogError) {
        warn!(
            key = %key,
            operation,
            backend = self.backend.backend_name(),
            error = %error,
            "Cache operation failed, falling back to source"
        );
        metrics::record_cache_error(operation);
    }
}

impl std::fmt::Debug for ReadThroughCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadThroughCache")
            .field("backend", &self.backend.backend_name())
            .field("operation_timeout", &self.operation_timeout)
            .field("cache_missing", &self.cache_missing)
            .finish_non_exhaustive()
    }
}
