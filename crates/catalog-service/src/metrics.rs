//! Prometheus metrics for the product cache.
//!
//! Recording is a no-op until a global recorder is installed by the server.

use metrics::{counter, describe_counter};

/// Metric names for the product cache.
pub mod names {
    /// Lookups answered by the cache (found or missing marker).
    pub const CACHE_HITS_TOTAL: &str = "catalog_cache_hits_total";
    /// Lookups that found no cache entry.
    pub const CACHE_MISSES_TOTAL: &str = "catalog_cache_misses_total";
    /// Loader invocations after a miss.
    pub const CACHE_LOADS_TOTAL: &str = "catalog_cache_loads_total";
    /// Failed or timed-out cache backend calls on the read path.
    pub const CACHE_ERRORS_TOTAL: &str = "catalog_cache_errors_total";
    /// Invalidations that still failed after all retries.
    pub const CACHE_INVALIDATION_FAILURES_TOTAL: &str = "catalog_cache_invalidation_failures_total";
}

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(
        names::CACHE_HITS_TOTAL,
        "Total number of product lookups answered from the cache"
    );
    describe_counter!(
        names::CACHE_MISSES_TOTAL,
        "Total number of product lookups that missed the cache"
    );
    describe_counter!(
        names::CACHE_LOADS_TOTAL,
        "Total number of loads from the product store after a cache miss"
    );
    describe_counter!(
        names::CACHE_ERRORS_TOTAL,
        "Total number of cache backend failures on the read path"
    );
    describe_counter!(
        names::CACHE_INVALIDATION_FAILURES_TOTAL,
        "Total number of cache invalidations abandoned after retries"
    );
}

pub(crate) fn record_hit() {
    counter!(names::CACHE_HITS_TOTAL).increment(1);
}

pub(crate) fn record_miss() {
    counter!(names::CACHE_MISSES_TOTAL).increment(1);
}

pub(crate) fn record_load() {
    counter!(names::CACHE_LOADS_TOTAL).increment(1);
}

pub(crate) fn record_cache_error(operation: &'static str) {
    counter!(names::CACHE_ERRORS_TOTAL, "operation" => operation).increment(1);
}

pub(crate) fn record_invalidation_failure() {
    counter!(names::CACHE_INVALIDATION_FAILURES_TOTAL).increment(1);
}
