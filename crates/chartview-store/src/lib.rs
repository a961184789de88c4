//! Key-value store backends for the chart cache
//!
//! Chartview keeps every cached result as a JSON string under a
//! deterministic key. The store only has to support atomic single-key
//! get and set; no expiry, transactions or compare-and-swap are assumed.
//!
//! - **Memory**: process-local map, for tests and throwaway servers
//! - **SQLite**: single-file persistent cache
//! - **Redis**: shared cache for several server replicas

mod memory;
mod redis;
mod sqlite;

pub mod error;

pub use error::{Result, StoreError};
pub use memory::{MemoryStore, OperationCounts};
pub use redis::RedisStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;

/// String key-value store
///
/// Implementations must be Send + Sync for use across async tasks.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Get the value stored under `key`
    ///
    /// An absent key and an empty stored string both yield `None`.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Check if a key holds a value
    async fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }
}

/// Treat empty strings as absence, matching stores that cannot tell them apart
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
