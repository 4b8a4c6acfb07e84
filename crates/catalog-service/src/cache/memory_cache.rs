//! Process-local cache implementation.

use super::CacheInterface;
use async_trait::async_trait;
use catalog_core::CatalogResult;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Expired entries are purged from the whole map once every this many writes.
const SWEEP_INTERVAL: usize = 64;

#[derive(Debug)]
struct Entry {
    value: String,
    expires_at: Instant,
}

/// In-memory cache with per-entry expiry.
///
/// Entries are only visible to the current process. An expired entry is
/// dropped when its key is next read, and every [`SWEEP_INTERVAL`]th write
/// purges all expired entries so keys that are never read again do not pile up.
#[derive(Debug, Default)]
pub struct MemoryCacheService {
    entries: Mutex<HashMap<String, Entry>>,
    writes: AtomicUsize,
}

impl MemoryCacheService {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) entries.
    #[must_use]
    pub fn len(&self) -> usize {
        let mut entries = self.entries.lock();
        purge_expired(&mut entries);
        entries.len()
    }

    /// Returns true if the cache holds no live entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn purge_expired(entries: &mut HashMap<String, Entry>) {
    let now = Instant::now();
    entries.retain(|_, entry| entry.expires_at > now);
}

#[async_trait]
impl CacheInterface for MemoryCacheService {
    fn is_enabled(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn get_raw(&self, key: &str) -> CatalogResult<Option<String>> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> CatalogResult<()> {
        let entry = Entry {
            value: value.to_string(),
            expires_at: Instant::now() + ttl,
        };
        let sweep = (self.writes.fetch_add(1, Ordering::Relaxed) + 1) % SWEEP_INTERVAL == 0;

        let mut entries = self.entries.lock();
        if sweep {
            purge_expired(&mut entries);
        }
        entries.insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> CatalogResult<bool> {
        let removed = self.entries.lock().remove(key);
        Ok(removed.is_some_and(|entry| entry.expires_at > Instant::now()))
    }

    async fn ping(&self) -> CatalogResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = MemoryCacheService::new();
        cache.set_raw("k", "[1,2,3]", Duration::from_secs(60)).await.unwrap();

        assert_eq!(cache.get_raw("k").await.unwrap().as_deref(), Some("[1,2,3]"));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_key() {
        let cache = MemoryCacheService::new();
        assert!(cache.get_raw("nope").await.unwrap().is_none());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_entries_expire() {
        let cache = MemoryCacheService::new();
        cache.set_raw("k", "1", Duration::from_millis(20)).await.unwrap();
        assert!(cache.get_raw("k").await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(cache.get_raw("k").await.unwrap().is_none());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let cache = MemoryCacheService::new();
        cache.set_raw("k", "1", Duration::from_secs(60)).await.unwrap();

        assert!(cache.delete("k").await.unwrap());
        assert!(!cache.delete("k").await.unwrap());
        assert!(cache.get_raw("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_overwrite_resets_value() {
        let cache = MemoryCacheService::new();
        cache.set_raw("k", "1", Duration::from_secs(60)).await.unwrap();
        cache.set_raw("k", "2", Duration::from_secs(60)).await.unwrap();
        assert_eq!(cache.get_raw("k").await.unwrap().as_deref(), Some("2"));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_writes_purge_expired_keys_never_read_again() {
        let cache = MemoryCacheService::new();
        for i in 0..1_000 {
            cache
                .set_raw(&format!("products-{i}"), "\"missing\"", Duration::from_millis(1))
                .await
                .unwrap();
        }
        tokio::time::sleep(Duration::from_millis(20)).await;

        for i in 0..SWEEP_INTERVAL {
            cache
                .set_raw(&format!("live-{i}"), "1", Duration::from_secs(60))
                .await
                .unwrap();
        }

        let stored = cache.entries.lock().len();
        assert!(stored <= SWEEP_INTERVAL, "{stored} entries still stored");
        assert!(cache.get_raw("live-0").await.unwrap().is_some());
    }
}
