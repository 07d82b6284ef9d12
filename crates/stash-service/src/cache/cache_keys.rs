//! Cache key generators for consistent key naming.
//!
//! The collection key and the per-record keys share the `users:` prefix.
//! Record keys end in a decimal id, so they can never collide with the
//! literal `all` suffix of the collection key.

use stash_core::UserId;

/// Prefix shared by every user cache key.
const USERS_PREFIX: &str = "users";

/// Key holding the full, id-descending user list.
pub const USERS_ALL: &str = "users:all";

/// Generate the cache key for the full user list.
#[must_use]
pub fn users_all() -> String {
    USERS_ALL.to_string()
}

/// Generate a cache key for a user by ID.
#[must_use]
pub fn user_by_id(id: UserId) -> String {
    format!("{}:{}", USERS_PREFIX, id)
}

/// Keys a create must invalidate.
#[must_use]
pub fn invalidated_by_create() -> Vec<String> {
    vec![users_all()]
}

/// Keys an update or delete of `id` must invalidate.
#[must_use]
pub fn invalidated_by_change(id: UserId) -> Vec<String> {
    vec![users_all(), user_by_id(id)]
}
