//! In-memory record store.
//!
//! Mirrors the MySQL repository semantics (auto-increment ids, id-descending
//! listing, matched-row counts) so the service and HTTP layers can run
//! without a database in tests and local experiments.

use crate::traits::UserRepository;
use async_trait::async_trait;
use chrono::Utc;
use stash_core::{StashResult, User, UserId};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<UserId, User>,
    last_id: u64,
}

/// Record store backed by an ordered map.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    table: RwLock<Table>,
}

impl InMemoryUserRepository {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, name: &str, email: &str) -> StashResult<User> {
        let mut table = self.table.write().await;
        table.last_id += 1;
        let user = User::new(UserId::new(table.last_id), name, email, Utc::now());
        table.rows.insert(user.id, user.clone());
        Ok(user)
    }

    async fn select_all(&self) -> StashResult<Vec<User>> {
        let table = self.table.read().await;
        Ok(table.rows.values().rev().cloned().collect())
    }

    async fn select_by_id(&self, id: UserId) -> StashResult<Option<User>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn update(&self, id: UserId, name: &str, email: &str) -> StashResult<u64> {
        let mut table = self.table.write().await;
        match table.rows.get_mut(&id) {
            Some(user) => {
                user.name = name.to_string();
                user.email = email.to_string();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: UserId) -> StashResult<u64> {
        let mut table = self.table.write().await;
        Ok(u64::from(table.rows.remove(&id).is_some()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let repo = InMemoryUserRepository::new();

        let first = repo.insert("A", "a@x.com").await.unwrap();
        let second = repo.insert("B", "b@x.com").await.unwrap();

        assert_eq!(first.id, UserId::new(1));
        assert_eq!(second.id, UserId::new(2));
        assert!(second.created_at >= first.created_at);
    }

    #[tokio::test]
    async fn test_select_all_orders_by_id_descending() {
        let repo = InMemoryUserRepository::new();
        for i in 0..3 {
            repo.insert(&format!("user{}", i), &format!("user{}@x.com", i))
                .await
                .unwrap();
        }

        let ids: Vec<u64> = repo
            .select_all()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.id.into_inner())
            .collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn test_select_by_id_not_found() {
        let repo = InMemoryUserRepository::new();
        assert!(repo.select_by_id(UserId::new(99)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_existing_and_missing() {
        let repo = InMemoryUserRepository::new();
        let user = repo.insert("A", "a@x.com").await.unwrap();

        assert_eq!(repo.update(user.id, "B", "b@x.com").await.unwrap(), 1);
        // Identical values still count as matched.
        assert_eq!(repo.update(user.id, "B", "b@x.com").await.unwrap(), 1);
        assert_eq!(repo.update(UserId::new(42), "C", "c@x.com").await.unwrap(), 0);

        let found = repo.select_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(found.name, "B");
        assert_eq!(found.email, "b@x.com");
        assert_eq!(found.created_at, user.created_at);
    }

    #[tokio::test]
    async fn test_delete_existing_and_missing() {
        let repo = InMemoryUserRepository::new();
        let user = repo.insert("A", "a@x.com").await.unwrap();

        assert_eq!(repo.delete(user.id).await.unwrap(), 1);
        assert_eq!(repo.delete(user.id).await.unwrap(), 0);
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_delete() {
        let repo = InMemoryUserRepository::new();
        let first = repo.insert("A", "a@x.com").await.unwrap();
        repo.delete(first.id).await.unwrap();

        let second = repo.insert("B", "b@x.com").await.unwrap();
        assert_ne!(first.id, second.id);
    }
}
