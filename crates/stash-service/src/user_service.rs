//! User service trait definition.

use crate::dto::{CreateUserRequest, DeletedUser, UpdateUserRequest};
use async_trait::async_trait;
use stash_core::{Interface, StashResult, User, UserId};

/// Where a read result was served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Served from a live cache entry.
    Cache,
    /// Served from the record store.
    Store,
}

impl Source {
    /// Label reported to clients alongside read results.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Cache => "cache",
            Self::Store => "no cache",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// A read result tagged with its [`Source`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cached<T> {
    pub value: T,
    pub source: Source,
}

impl<T> Cached<T> {
    pub fn from_cache(value: T) -> Self {
        Self {
            value,
            source: Source::Cache,
        }
    }

    pub fn from_store(value: T) -> Self {
        Self {
            value,
            source: Source::Store,
        }
    }

    /// Whether the value came from the cache.
    #[must_use]
    pub fn is_hit(&self) -> bool {
        self.source == Source::Cache
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

/// User service trait.
///
/// Reads consult the cache before the store. Writes go to the store and
/// then invalidate every cache key they affect.
#[async_trait]
pub trait UserService: Interface + Send + Sync {
    /// Lists all users, newest id first.
    async fn list_users(&self) -> StashResult<Cached<Vec<User>>>;

    /// Gets a user by ID.
    async fn get_user(&self, id: UserId) -> StashResult<Cached<User>>;

    /// Creates a new user.
    async fn create_user(&self, request: CreateUserRequest) -> StashResult<User>;

    /// Replaces a user's name and email, returning the stored record.
    async fn update_user(&self, id: UserId, request: UpdateUserRequest) -> StashResult<User>;

    /// Deletes a user.
    async fn delete_user(&self, id: UserId) -> StashResult<DeletedUser>;
}
