//! Redis-based cache implementation.

use super::CacheInterface;
use async_trait::async_trait;
use deadpool_redis::{redis::AsyncCommands, Pool, PoolConfig, Runtime};
use shaku::Component;
use stash_config::RedisConfig;
use stash_core::{HealthIndicator, StashError, StashResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Redis-based cache service.
#[derive(Component, Clone)]
#[shaku(interface = CacheInterface)]
pub struct RedisCacheService {
    /// Redis connection pool. `None` when caching is disabled.
    pool: Option<Arc<Pool>>,
}

impl RedisCacheService {
    /// Create a new Redis cache service.
    #[must_use]
    pub fn new(pool: Arc<Pool>) -> Self {
        Self { pool: Some(pool) }
    }

    /// Create a no-op cache service (for when Redis is disabled).
    #[must_use]
    pub fn disabled() -> Self {
        Self { pool: None }
    }

    /// Builds the pool described by `config` without touching the network.
    ///
    /// Waiting for, creating and recycling a connection are each bounded by
    /// `config.timeout()`, so an unresponsive Redis surfaces as a cache error.
    pub fn create_pool(config: &RedisConfig) -> StashResult<Arc<Pool>> {
        let timeout = Some(config.timeout());
        let mut pool_cfg = PoolConfig::new(config.pool_size.max(1));
        pool_cfg.timeouts.wait = timeout;
        pool_cfg.timeouts.create = timeout;
        pool_cfg.timeouts.recycle = timeout;

        let mut redis_cfg = deadpool_redis::Config::from_url(&config.url);
        redis_cfg.pool = Some(pool_cfg);

        let pool = redis_cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| StashError::Configuration(format!("Failed to create Redis pool: {}", e)))?;

        Ok(Arc::new(pool))
    }

    /// Connects to Redis and verifies it answers `PING`.
    ///
    /// Returns a disabled service when Redis is turned off in `config`.
    pub async fn connect(config: &RedisConfig) -> StashResult<Self> {
        if !config.enabled {
            info!("Redis disabled, every cache lookup will miss");
            return Ok(Self::disabled());
        }

        info!("Connecting to Redis at {}", config.url);
        let service = Self::new(Self::create_pool(config)?);
        service.ping().await.map_err(|e| {
            warn!("Failed to reach Redis: {}", e);
            e
        })?;

        info!("Redis connection pool established");
        Ok(service)
    }

    /// Returns the underlying pool, if enabled.
    #[must_use]
    pub fn pool(&self) -> Option<Arc<Pool>> {
        self.pool.clone()
    }

    /// Get a connection from the pool.
    async fn get_conn(&self) -> StashResult<deadpool_redis::Connection> {
        match &self.pool {
            Some(pool) => pool.get().await.map_err(|e| {
                StashError::CacheUnavailable(format!("Failed to get Redis connection: {}", e))
            }),
            None => Err(StashError::CacheUnavailable("Cache is disabled".to_string())),
        }
    }
}

#[async_trait]
impl CacheInterface for RedisCacheService {
    fn is_enabled(&self) -> bool {
        self.pool.is_some()
    }

    async fn get_raw(&self, key: &str) -> StashResult<Option<String>> {
        if !self.is_enabled() {
            return Ok(None);
        }

        let mut conn = self.get_conn().await?;
        let value: Option<String> = conn.get(key).await.map_err(|e| {
            StashError::CacheUnavailable(format!("Failed to get key '{}': {}", key, e))
        })?;

        Ok(value)
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> StashResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let mut conn = self.get_conn().await?;
        let ttl_secs = ttl.as_secs().max(1);

        conn.set_ex::<_, _, ()>(key, value, ttl_secs).await.map_err(|e| {
            StashError::CacheUnavailable(format!("Failed to set key '{}': {}", key, e))
        })?;

        debug!("Cached key '{}' with TTL {}s", key, ttl_secs);
        Ok(())
    }

    async fn delete(&self, key: &str) -> StashResult<bool> {
        if !self.is_enabled() {
            return Ok(false);
        }

        let mut conn = self.get_conn().await?;
        let deleted: i64 = conn.del(key).await.map_err(|e| {
            StashError::CacheUnavailable(format!("Failed to delete key '{}': {}", key, e))
        })?;

        debug!("Deleted key '{}': {}", key, deleted > 0);
        Ok(deleted > 0)
    }

    async fn ping(&self) -> StashResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let mut conn = self.get_conn().await?;
        let _pong: String = deadpool_redis::redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| StashError::CacheUnavailable(format!("PING failed: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl HealthIndicator for RedisCacheService {
    fn name(&self) -> &'static str {
        "cache"
    }

    // Reads fall back to the store, so a dead cache degrades but doesn't block.
    fn is_critical(&self) -> bool {
        false
    }

    async fn check(&self) -> StashResult<()> {
        self.ping().await
    }
}

impl std::fmt::Debug for RedisCacheService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCacheService")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
