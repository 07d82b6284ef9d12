//! Dependency injection module using Shaku.
//!
//! Store, cache and service clients are created once at startup and
//! handed to the request handlers through this module.

use shaku::{module, HasComponent};
use stash_config::CacheConfig;
use stash_core::{StashError, StashResult};
use stash_repository::{
    DatabasePool, DatabasePoolInterface, DatabasePoolParameters, MySqlUserRepository,
};
use stash_service::{
    CacheInterface, CachedUserService, CachedUserServiceParameters, RedisCacheService,
    RedisCacheServiceParameters, UserService,
};
use std::sync::Arc;

module! {
    pub StashModule {
        components = [
            DatabasePool,
            MySqlUserRepository,
            RedisCacheService,
            CachedUserService,
        ],
        providers = [],
    }
}

/// Assembles a [`StashModule`] from already connected clients.
#[derive(Default)]
pub struct AppModuleBuilder {
    database: Option<DatabasePool>,
    cache: Option<RedisCacheService>,
    cache_config: CacheConfig,
}

impl AppModuleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the record store pool. Required.
    pub fn with_database_pool(mut self, pool: &DatabasePool) -> Self {
        self.database = Some(DatabasePool::with_pool(pool.inner().clone()));
        self
    }

    /// Sets the cache backend. Without one the cache is disabled.
    pub fn with_cache(mut self, cache: &RedisCacheService) -> Self {
        self.cache = Some(cache.clone());
        self
    }

    /// Sets TTL and invalidation policy.
    pub fn with_cache_config(mut self, config: CacheConfig) -> Self {
        self.cache_config = config;
        self
    }

    pub fn build(self) -> StashResult<Arc<StashModule>> {
        let database = self
            .database
            .ok_or_else(|| StashError::Configuration("A database pool is required".to_string()))?;
        let cache = self.cache.unwrap_or_else(RedisCacheService::disabled);

        let module = StashModule::builder()
            .with_component_parameters::<DatabasePool>(DatabasePoolParameters {
                pool: database.inner().clone(),
            })
            .with_component_parameters::<RedisCacheService>(RedisCacheServiceParameters {
                pool: cache.pool(),
            })
            .with_component_parameters::<CachedUserService>(CachedUserServiceParameters {
                policy: self.cache_config,
            })
            .build();

        Ok(Arc::new(module))
    }
}

/// Resolves the module's components by role.
pub trait ServiceResolver {
    fn user_service(&self) -> Arc<dyn UserService>;

    fn database_pool(&self) -> Arc<dyn DatabasePoolInterface>;

    fn cache(&self) -> Arc<dyn CacheInterface>;
}

impl ServiceResolver for StashModule {
    fn user_service(&self) -> Arc<dyn UserService> {
        self.resolve()
    }

    fn database_pool(&self) -> Arc<dyn DatabasePoolInterface> {
        self.resolve()
    }

    fn cache(&self) -> Arc<dyn CacheInterface> {
        self.resolve()
    }
}
