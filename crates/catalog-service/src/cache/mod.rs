//! Caching infrastructure for the service layer.
//!
//! Backends implement [`CacheInterface`] (Redis for shared deployments, an
//! in-process map for tests and Redis-less development). [`ReadThroughCache`]
//! layers the cache-aside read path on top of any backend.

mod cache_interface;
pub mod cache_keys;
mod memory_cache;
mod read_through;
mod redis_cache;

pub use cache_interface::CacheInterface;
pub use memory_cache::MemoryCacheService;
pub use read_through::{Cached, ReadThroughCache, DEFAULT_OPERATION_TIMEOUT};
pub use redis_cache::RedisCacheService;
