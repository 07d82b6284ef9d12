//! Cache interface trait for abstracted caching operations.

use async_trait::async_trait;
use stash_core::{Interface, StashResult};
use std::time::Duration;

/// Cache interface for storing and retrieving cached data.
///
/// Backend failures are reported as
/// [`StashError::CacheUnavailable`](stash_core::StashError::CacheUnavailable);
/// callers decide whether that is fatal.
#[async_trait]
pub trait CacheInterface: Interface + Send + Sync {
    /// Get a raw JSON value from the cache.
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    async fn get_raw(&self, key: &str) -> StashResult<Option<String>>;

    /// Set a raw JSON value in the cache with a TTL.
    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> StashResult<()>;

    /// Delete a value from the cache.
    ///
    /// Returns `true` if the key existed and was deleted.
    async fn delete(&self, key: &str) -> StashResult<bool>;

    /// Round trip to the backend.
    async fn ping(&self) -> StashResult<()>;

    /// Check if caching is enabled.
    fn is_enabled(&self) -> bool;
}

/// Extension trait with typed methods for convenience.
#[async_trait]
pub trait CacheExt: CacheInterface {
    /// Get a typed value from the cache.
    ///
    /// A stored value that does not deserialize as `T` yields an
    /// internal error, distinct from a backend failure.
    async fn get<T: serde::de::DeserializeOwned + Send>(
        &self,
        key: &str,
    ) -> StashResult<Option<T>> {
        match self.get_raw(key).await? {
            Some(json) => {
                let value: T = serde_json::from_str(&json)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Set a typed value in the cache.
    async fn set<T: serde::Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> StashResult<()> {
        let json = serde_json::to_string(value)?;
        self.set_raw(key, &json, ttl).await
    }
}

// Blanket implementation for all CacheInterface implementations
impl<T: CacheInterface + ?Sized> CacheExt for T {}
