//! MySQL user repository implementation.

use crate::{traits::UserRepository, DatabasePoolInterface};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shaku::Component;
use sqlx::FromRow;
use stash_core::{StashError, StashResult, User, UserId};
use std::sync::Arc;
use tracing::debug;

/// MySQL user repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = UserRepository)]
pub struct MySqlUserRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl MySqlUserRepository {
    /// Creates a new MySQL user repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }

    async fn exists(&self, id: UserId) -> StashResult<bool> {
        let result: Option<i64> = sqlx::query_scalar("SELECT 1 FROM users WHERE id = ? LIMIT 1")
            .bind(id.into_inner())
            .fetch_optional(self.pool.inner())
            .await?;

        Ok(result.is_some())
    }
}

/// Database row representation of a user.
#[derive(Debug, FromRow)]
struct UserRow {
    id: u64,
    name: String,
    email: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: UserId::new(row.id),
            name: row.name,
            email: row.email,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn insert(&self, name: &str, email: &str) -> StashResult<User> {
        debug!("Inserting user: {}", email);

        let result = sqlx::query("INSERT INTO users (name, email) VALUES (?, ?)")
            .bind(name)
            .bind(email)
            .execute(self.pool.inner())
            .await?;

        let id = UserId::new(result.last_insert_id());

        // MySQL doesn't support RETURNING, so insert then select
        self.select_by_id(id)
            .await?
            .ok_or_else(|| {
                StashError::internal(format!("Inserted user {} could not be read back", id))
            })
    }

    async fn select_all(&self) -> StashResult<Vec<User>> {
        debug!("Selecting all users");

        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, created_at
            FROM users
            ORDER BY id DESC
            "#,
        )
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn select_by_id(&self, id: UserId) -> StashResult<Option<User>> {
        debug!("Selecting user by id: {}", id);

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, created_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(User::from))
    }

    async fn update(&self, id: UserId, name: &str, email: &str) -> StashResult<u64> {
        debug!("Updating user: {}", id);

        let result = sqlx::query("UPDATE users SET name = ?, email = ? WHERE id = ?")
            .bind(name)
            .bind(email)
            .bind(id.into_inner())
            .execute(self.pool.inner())
            .await?;

        let changed = result.rows_affected();
        if changed > 0 {
            return Ok(changed);
        }

        // MySQL counts changed rows, not matched ones: writing identical
        // values reports zero even though the record exists.
        Ok(u64::from(self.exists(id).await?))
    }

    async fn delete(&self, id: UserId) -> StashResult<u64> {
        debug!("Deleting user: {}", id);

        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id.into_inner())
            .execute(self.pool.inner())
            .await?;

        Ok(result.rows_affected())
    }
}

impl std::fmt::Debug for MySqlUserRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlUserRepository").finish_non_exhaustive()
    }
}
