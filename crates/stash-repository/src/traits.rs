//! Repository trait definitions.

use stash_core::{Interface, StashResult, User, UserId};
use async_trait::async_trait;

/// User record store.
///
/// Every operation is attempted once; failures surface as
/// [`stash_core::StashError::StoreUnavailable`].
#[async_trait]
pub trait UserRepository: Interface + Send + Sync {
    /// Inserts a new record. The store assigns `id` and `created_at`.
    async fn insert(&self, name: &str, email: &str) -> StashResult<User>;

    /// Returns every record ordered by id, highest first.
    async fn select_all(&self) -> StashResult<Vec<User>>;

    /// Finds a record by id.
    async fn select_by_id(&self, id: UserId) -> StashResult<Option<User>>;

    /// Overwrites name and email. Returns the number of matched records.
    async fn update(&self, id: UserId, name: &str, email: &str) -> StashResult<u64>;

    /// Deletes a record. Returns the number of deleted records.
    async fn delete(&self, id: UserId) -> StashResult<u64>;
}
