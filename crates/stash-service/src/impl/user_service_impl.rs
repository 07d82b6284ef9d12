//! Cache-aside user service implementation.

use crate::cache::{cache_keys, CacheExt, CacheInterface};
use crate::dto::{CreateUserRequest, DeletedUser, UpdateUserRequest};
use crate::user_service::{Cached, UserService};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use shaku::Component;
use stash_config::{CacheConfig, InvalidationFailure};
use stash_core::{StashError, StashResult, User, UserId, ValidateExt};
use stash_repository::UserRepository;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// User service component for Shaku DI.
///
/// Reads try the cache and fall back to the store on a miss or on any cache
/// failure, populating the cache from the store result. Writes hit the
/// store first and then delete the affected keys; what happens when a
/// delete fails is governed by [`CacheConfig::invalidation_failure`].
#[derive(Component)]
#[shaku(interface = UserService)]
pub struct CachedUserService {
    #[shaku(inject)]
    repository: Arc<dyn UserRepository>,
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
    policy: CacheConfig,
}

impl CachedUserService {
    /// Creates a service without going through a DI module.
    pub fn new(
        repository: Arc<dyn UserRepository>,
        cache: Arc<dyn CacheInterface>,
        policy: CacheConfig,
    ) -> Self {
        Self {
            repository,
            cache,
            policy,
        }
    }

    /// Reads `key` from the cache. Any failure counts as a miss.
    async fn lookup<T: DeserializeOwned + Send>(&self, key: &str) -> Option<T> {
        match self.cache.get::<T>(key).await {
            Ok(Some(value)) => {
                debug!(key, "Cache hit");
                Some(value)
            }
            Ok(None) => {
                debug!(key, "Cache miss");
                None
            }
            Err(e) if e.is_cache_error() => {
                warn!(key, error = %e, "Cache lookup failed, reading from store");
                None
            }
            Err(e) => {
                warn!(key, error = %e, "Ignoring unreadable cache entry");
                None
            }
        }
    }

    /// Stores `value` under `key` for the configured TTL. Failures are logged.
    async fn populate<T: Serialize + Send + Sync>(&self, key: &str, value: &T) {
        if let Err(e) = self.cache.set(key, value, self.policy.ttl()).await {
            warn!(key, error = %e, "Failed to populate cache");
        }
    }

    /// Deletes every key in `keys`, even after a failure.
    async fn invalidate(&self, keys: Vec<String>) -> StashResult<()> {
        let mut first_failure: Option<StashError> = None;

        for key in &keys {
            match self.cache.delete(key).await {
                Ok(existed) => debug!(key = %key, existed, "Invalidated cache key"),
                Err(e) => {
                    error!(
                        key = %key,
                        error = %e,
                        policy = %self.policy.invalidation_failure,
                        "Cache invalidation failed"
                    );
                    if first_failure.is_none() {
                        first_failure = Some(e);
                    }
                }
            }
        }

        match (first_failure, self.policy.invalidation_failure) {
            (Some(e), InvalidationFailure::Fail) if e.is_cache_error() => Err(e),
            (Some(e), InvalidationFailure::Fail) => Err(StashError::cache(e.to_string())),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl UserService for CachedUserService {
    async fn list_users(&self) -> StashResult<Cached<Vec<User>>> {
        let key = cache_keys::users_all();

        if let Some(users) = self.lookup::<Vec<User>>(&key).await {
            return Ok(Cached::from_cache(users));
        }

        let users = self.repository.select_all().await?;
        self.populate(&key, &users).await;

        Ok(Cached::from_store(users))
    }

    async fn get_user(&self, id: UserId) -> StashResult<Cached<User>> {
        let key = cache_keys::user_by_id(id);

        if let Some(user) = self.lookup::<User>(&key).await {
            return Ok(Cached::from_cache(user));
        }

        let user = self
            .repository
            .select_by_id(id)
            .await?
            .ok_or_else(|| StashError::not_found("User", id))?;
        self.populate(&key, &user).await;

        Ok(Cached::from_store(user))
    }

    async fn create_user(&self, request: CreateUserRequest) -> StashResult<User> {
        request.validate_request()?;

        let user = self.repository.insert(&request.name, &request.email).await?;
        info!("User created: {}", user.id);

        self.invalidate(cache_keys::invalidated_by_create()).await?;
        Ok(user)
    }

    async fn update_user(&self, id: UserId, request: UpdateUserRequest) -> StashResult<User> {
        request.validate_request()?;

        let matched = self
            .repository
            .update(id, &request.name, &request.email)
            .await?;
        if matched == 0 {
            return Err(StashError::not_found("User", id));
        }
        info!("User updated: {}", id);

        self.invalidate(cache_keys::invalidated_by_change(id)).await?;

        // Deleted between the write and this read.
        self.repository
            .select_by_id(id)
            .await?
            .ok_or_else(|| StashError::not_found("User", id))
    }

    async fn delete_user(&self, id: UserId) -> StashResult<DeletedUser> {
        let affected = self.repository.delete(id).await?;
        if affected == 0 {
            return Err(StashError::not_found("User", id));
        }
        info!("User deleted: {}", id);

        self.invalidate(cache_keys::invalidated_by_change(id)).await?;
        Ok(DeletedUser { id })
    }
}

impl std::fmt::Debug for CachedUserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedUserService")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::InMemoryCacheService;
    use crate::user_service::Source;
    use mockall::mock;
    use stash_repository::InMemoryUserRepository;
    use std::time::Duration;

    mock! {
        pub Cache {}

        #[async_trait]
        impl CacheInterface for Cache {
            async fn get_raw(&self, key: &str) -> StashResult<Option<String>>;
            async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> StashResult<()>;
            async fn delete(&self, key: &str) -> StashResult<bool>;
            async fn ping(&self) -> StashResult<()>;
            fn is_enabled(&self) -> bool;
        }
    }

    mock! {
        pub Repository {}

        #[async_trait]
        impl UserRepository for Repository {
            async fn insert(&self, name: &str, email: &str) -> StashResult<User>;
            async fn select_all(&self) -> StashResult<Vec<User>>;
            async fn select_by_id(&self, id: UserId) -> StashResult<Option<User>>;
            async fn update(&self, id: UserId, name: &str, email: &str) -> StashResult<u64>;
            async fn delete(&self, id: UserId) -> StashResult<u64>;
        }
    }

    struct Fixture {
        repository: Arc<InMemoryUserRepository>,
        cache: Arc<InMemoryCacheService>,
        service: CachedUserService,
    }

    fn fixture() -> Fixture {
        let repository = Arc::new(InMemoryUserRepository::new());
        let cache = Arc::new(InMemoryCacheService::new());
        let service = CachedUserService::new(
            repository.clone(),
            cache.clone(),
            CacheConfig::default(),
        );
        Fixture {
            repository,
            cache,
            service,
        }
    }

    /// A cache whose every operation fails.
    fn broken_cache() -> MockCache {
        let mut cache = MockCache::new();
        cache
            .expect_get_raw()
            .returning(|_| Err(StashError::cache("connection refused")));
        cache
            .expect_set_raw()
            .returning(|_, _, _| Err(StashError::cache("connection refused")));
        cache
            .expect_delete()
            .returning(|_| Err(StashError::cache("connection refused")));
        cache
            .expect_ping()
            .returning(|| Err(StashError::cache("connection refused")));
        cache.expect_is_enabled().return_const(true);
        cache
    }

    fn policy(invalidation_failure: InvalidationFailure) -> CacheConfig {
        CacheConfig {
            invalidation_failure,
            ..CacheConfig::default()
        }
    }

    fn create(name: &str, email: &str) -> CreateUserRequest {
        CreateUserRequest::new(name, email)
    }

    #[tokio::test]
    async fn test_list_users_miss_then_hit() {
        let f = fixture();
        f.service.create_user(create("A", "a@x.com")).await.unwrap();
        f.service.create_user(create("B", "b@x.com")).await.unwrap();

        let first = f.service.list_users().await.unwrap();
        assert_eq!(first.source, Source::Store);
        assert!(f.cache.contains(cache_keys::USERS_ALL).await);

        let second = f.service.list_users().await.unwrap();
        assert_eq!(second.source, Source::Cache);
        assert_eq!(first.value, second.value);

        let names: Vec<_> = second.value.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[tokio::test]
    async fn test_list_users_empty_store_is_cached() {
        let f = fixture();

        let first = f.service.list_users().await.unwrap();
        assert!(first.value.is_empty());
        assert_eq!(first.source, Source::Store);

        let second = f.service.list_users().await.unwrap();
        assert_eq!(second.source, Source::Cache);
    }

    #[tokio::test]
    async fn test_get_user_miss_then_hit() {
        let f = fixture();
        let created = f.service.create_user(create("A", "a@x.com")).await.unwrap();

        let first = f.service.get_user(created.id).await.unwrap();
        assert_eq!(first.source, Source::Store);
        assert_eq!(first.value, created);

        let second = f.service.get_user(created.id).await.unwrap();
        assert_eq!(second.source, Source::Cache);
        assert_eq!(second.value, created);
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let f = fixture();
        let err = f.service.get_user(UserId::new(9)).await.unwrap_err();

        assert!(matches!(err, StashError::NotFound { .. }));
        assert!(!f.cache.contains(&cache_keys::user_by_id(UserId::new(9))).await);
    }

    #[tokio::test]
    async fn test_create_user_invalidates_collection() {
        let f = fixture();
        f.service.list_users().await.unwrap();
        assert!(f.cache.contains(cache_keys::USERS_ALL).await);

        let created = f.service.create_user(create("A", "a@x.com")).await.unwrap();
        assert!(!f.cache.contains(cache_keys::USERS_ALL).await);

        let listed = f.service.list_users().await.unwrap();
        assert_eq!(listed.source, Source::Store);
        assert_eq!(listed.value, vec![created]);
    }

    #[tokio::test]
    async fn test_create_user_validation_skips_store() {
        let f = fixture();

        let blank = f.service.create_user(create("  ", "a@x.com")).await.unwrap_err();
        assert!(matches!(blank, StashError::Validation(_)));

        let bad_email = f.service.create_user(create("A", "nope")).await.unwrap_err();
        assert!(matches!(bad_email, StashError::Validation(_)));

        assert!(f.repository.is_empty().await);
    }

    #[tokio::test]
    async fn test_update_user_invalidates_both_keys() {
        let f = fixture();
        let created = f.service.create_user(create("A", "a@x.com")).await.unwrap();
        f.service.list_users().await.unwrap();
        f.service.get_user(created.id).await.unwrap();

        let updated = f
            .service
            .update_user(created.id, UpdateUserRequest::new("B", "b@x.com"))
            .await
            .unwrap();
        assert_eq!(updated.name, "B");
        assert_eq!(updated.email, "b@x.com");
        assert_eq!(updated.created_at, created.created_at);

        assert!(!f.cache.contains(cache_keys::USERS_ALL).await);
        assert!(!f.cache.contains(&cache_keys::user_by_id(created.id)).await);

        let read = f.service.get_user(created.id).await.unwrap();
        assert_eq!(read.source, Source::Store);
        assert_eq!(read.value.name, "B");
    }

    #[tokio::test]
    async fn test_update_user_with_identical_values() {
        let f = fixture();
        let created = f.service.create_user(create("A", "a@x.com")).await.unwrap();

        let updated = f
            .service
            .update_user(created.id, UpdateUserRequest::new("A", "a@x.com"))
            .await
            .unwrap();
        assert_eq!(updated, created);
    }

    #[tokio::test]
    async fn test_update_user_not_found() {
        let f = fixture();
        let err = f
            .service
            .update_user(UserId::new(3), UpdateUserRequest::new("B", "b@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StashError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_user_validation_error() {
        let f = fixture();
        let created = f.service.create_user(create("A", "a@x.com")).await.unwrap();

        let err = f
            .service
            .update_user(created.id, UpdateUserRequest::new("B", "not-an-email"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 422);

        let stored = f.repository.select_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "A");
    }

    #[tokio::test]
    async fn test_update_user_row_vanishes_before_refetch() {
        let mut repository = MockRepository::new();
        repository.expect_update().times(1).returning(|_, _, _| Ok(1));
        repository.expect_select_by_id().times(1).returning(|_| Ok(None));

        let service = CachedUserService::new(
            Arc::new(repository),
            Arc::new(InMemoryCacheService::new()),
            CacheConfig::default(),
        );

        let err = service
            .update_user(UserId::new(1), UpdateUserRequest::new("B", "b@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StashError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_user_invalidates_and_reports_id() {
        let f = fixture();
        let created = f.service.create_user(create("A", "a@x.com")).await.unwrap();
        f.service.list_users().await.unwrap();
        f.service.get_user(created.id).await.unwrap();

        let deleted = f.service.delete_user(created.id).await.unwrap();
        assert_eq!(deleted.id, created.id);

        let err = f.service.get_user(created.id).await.unwrap_err();
        assert!(matches!(err, StashError::NotFound { .. }));

        let listed = f.service.list_users().await.unwrap();
        assert_eq!(listed.source, Source::Store);
        assert!(listed.value.is_empty());
    }

    #[tokio::test]
    async fn test_delete_user_not_found() {
        let f = fixture();
        let err = f.service.delete_user(UserId::new(5)).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_reads_fall_back_to_store_when_cache_is_down() {
        let repository = Arc::new(InMemoryUserRepository::new());
        let created = repository.insert("A", "a@x.com").await.unwrap();
        let service =
            CachedUserService::new(repository, Arc::new(broken_cache()), CacheConfig::default());

        for _ in 0..2 {
            let listed = service.list_users().await.unwrap();
            assert_eq!(listed.source, Source::Store);
            assert_eq!(listed.value.len(), 1);

            let fetched = service.get_user(created.id).await.unwrap();
            assert_eq!(fetched.source, Source::Store);
        }
    }

    #[tokio::test]
    async fn test_writes_succeed_when_invalidation_fails_under_log_policy() {
        let repository = Arc::new(InMemoryUserRepository::new());
        let service = CachedUserService::new(
            repository.clone(),
            Arc::new(broken_cache()),
            policy(InvalidationFailure::Log),
        );

        let created = service.create_user(create("A", "a@x.com")).await.unwrap();
        let updated = service
            .update_user(created.id, UpdateUserRequest::new("B", "b@x.com"))
            .await
            .unwrap();
        assert_eq!(updated.name, "B");
        service.delete_user(created.id).await.unwrap();
        assert!(repository.is_empty().await);
    }

    #[tokio::test]
    async fn test_fail_policy_surfaces_cache_error_after_commit() {
        let repository = Arc::new(InMemoryUserRepository::new());
        let service = CachedUserService::new(
            repository.clone(),
            Arc::new(broken_cache()),
            policy(InvalidationFailure::Fail),
        );

        let err = service.create_user(create("A", "a@x.com")).await.unwrap_err();
        assert!(err.is_cache_error());
        assert_eq!(err.status_code(), 503);
        assert_eq!(repository.len().await, 1);
    }

    #[tokio::test]
    async fn test_invalidation_attempts_every_key() {
        let repository = Arc::new(InMemoryUserRepository::new());
        let created = repository.insert("A", "a@x.com").await.unwrap();

        let mut cache = MockCache::new();
        cache
            .expect_delete()
            .times(2)
            .returning(|_| Err(StashError::cache("connection refused")));

        let service = CachedUserService::new(
            repository.clone(),
            Arc::new(cache),
            policy(InvalidationFailure::Fail),
        );

        let err = service.delete_user(created.id).await.unwrap_err();
        assert!(err.is_cache_error());
        assert!(repository.is_empty().await);
    }

    #[tokio::test]
    async fn test_unreadable_cache_entry_is_a_miss() {
        let f = fixture();
        let created = f.service.create_user(create("A", "a@x.com")).await.unwrap();
        let key = cache_keys::user_by_id(created.id);
        f.cache
            .set_raw(&key, "{not json", Duration::from_secs(60))
            .await
            .unwrap();

        let first = f.service.get_user(created.id).await.unwrap();
        assert_eq!(first.source, Source::Store);
        assert_eq!(first.value, created);

        // Repopulated with a readable entry.
        let second = f.service.get_user(created.id).await.unwrap();
        assert_eq!(second.source, Source::Cache);
    }

    #[tokio::test]
    async fn test_populate_uses_configured_ttl() {
        let repository = Arc::new(InMemoryUserRepository::new());
        repository.insert("A", "a@x.com").await.unwrap();

        let mut cache = MockCache::new();
        cache.expect_get_raw().times(1).returning(|_| Ok(None));
        cache
            .expect_set_raw()
            .times(1)
            .returning(|key, _, ttl| {
                assert_eq!(key, "users:all");
                assert_eq!(ttl, Duration::from_secs(60));
                Ok(())
            });

        let config = CacheConfig {
            ttl_secs: 60,
            ..CacheConfig::default()
        };
        let service = CachedUserService::new(repository, Arc::new(cache), config);

        let listed = service.list_users().await.unwrap();
        assert_eq!(listed.source, Source::Store);
    }

    #[tokio::test]
    async fn test_store_errors_propagate() {
        let mut repository = MockRepository::new();
        repository
            .expect_select_all()
            .returning(|| Err(StashError::store("connection reset")));
        repository
            .expect_insert()
            .returning(|_, _| Err(StashError::store("connection reset")));

        let service = CachedUserService::new(
            Arc::new(repository),
            Arc::new(InMemoryCacheService::new()),
            CacheConfig::default(),
        );

        let err = service.list_users().await.unwrap_err();
        assert!(matches!(err, StashError::StoreUnavailable(_)));
        assert_eq!(err.status_code(), 500);

        let err = service.create_user(create("A", "a@x.com")).await.unwrap_err();
        assert!(matches!(err, StashError::StoreUnavailable(_)));
    }

    #[tokio::test]
    async fn test_create_read_update_delete_scenario() {
        let f = fixture();

        let created = f.service.create_user(create("A", "a@x.com")).await.unwrap();
        let id = created.id;

        let read = f.service.get_user(id).await.unwrap();
        assert_eq!((read.value.name.as_str(), read.source), ("A", Source::Store));

        let read = f.service.get_user(id).await.unwrap();
        assert_eq!(read.source, Source::Cache);

        f.service
            .update_user(id, UpdateUserRequest::new("B", "b@x.com"))
            .await
            .unwrap();

        let read = f.service.get_user(id).await.unwrap();
        assert_eq!((read.value.name.as_str(), read.source), ("B", Source::Store));

        f.service.delete_user(id).await.unwrap();
        let err = f.service.get_user(id).await.unwrap_err();
        assert!(matches!(err, StashError::NotFound { .. }));
    }
}
