//! Process-local cache used when no Redis instance is at hand.

use super::CacheInterface;
use async_trait::async_trait;
use stash_core::StashResult;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// In-memory cache with per-entry expiry.
///
/// Expired entries are dropped lazily on the next access.
#[derive(Debug, Default)]
pub struct InMemoryCacheService {
    entries: RwLock<HashMap<String, (String, Instant)>>,
}

impl InMemoryCacheService {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a live entry exists for `key`.
    pub async fn contains(&self, key: &str) -> bool {
        self.entries
            .read()
            .await
            .get(key)
            .is_some_and(|(_, expires_at)| *expires_at > Instant::now())
    }
}

#[async_trait]
impl CacheInterface for InMemoryCacheService {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn get_raw(&self, key: &str) -> StashResult<Option<String>> {
        let mut entries = self.entries.write().await;
        match entries.get(key) {
            Some((value, expires_at)) if *expires_at > Instant::now() => Ok(Some(value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> StashResult<()> {
        let expires_at = Instant::now() + ttl;
        self.entries
            .write()
            .await
            .insert(key.to_string(), (value.to_string(), expires_at));
        Ok(())
    }

    async fn delete(&self, key: &str) -> StashResult<bool> {
        Ok(self.entries.write().await.remove(key).is_some())
    }

    async fn ping(&self) -> StashResult<()> {
        Ok(())
    }
}
