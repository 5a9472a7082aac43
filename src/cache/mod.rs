//! Cache Module
//!
//! Short-lived list projections kept in a key-value cache. Entries are never
//! authoritative: any of them may be missing and the store is consulted.

mod entry;
mod memory;
mod redis_backend;

use async_trait::async_trait;

use crate::error::Result;

// Re-export public types
pub use entry::CacheEntry;
pub use memory::MemoryListCache;
pub use redis_backend::RedisListCache;

// == Public Constants ==
/// Seconds a cached list stays valid
pub const LIST_CACHE_TTL_SECS: u64 = 60;

/// Key for the unfiltered list
pub const LIST_KEY_ALL: &str = "todos:all";
/// Key for the `completed=true` list
pub const LIST_KEY_COMPLETED: &str = "todos:true";
/// Key for the `completed=false` list
pub const LIST_KEY_PENDING: &str = "todos:false";

/// Every list-cache key. Mutations invalidate all of them regardless of
/// which fields changed.
pub const LIST_CACHE_KEYS: [&str; 3] = [LIST_KEY_ALL, LIST_KEY_COMPLETED, LIST_KEY_PENDING];

/// Cache key for a `completed` filter.
pub fn list_cache_key(completed: Option<bool>) -> &'static str {
    match completed {
        None => LIST_KEY_ALL,
        Some(true) => LIST_KEY_COMPLETED,
        Some(false) => LIST_KEY_PENDING,
    }
}

/// Key-value cache holding serialized todo lists.
#[async_trait]
pub trait ListCache: Send + Sync {
    /// Probes connectivity.
    async fn ping(&self) -> Result<()>;

    /// Returns the cached value, or `None` when absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key` for `ttl_secs` seconds.
    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()>;

    /// Removes every key in `keys`; missing keys are ignored.
    async fn delete(&self, keys: &[&str]) -> Result<()>;
}
