//! User entity.

use crate::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user record as held by the record store.
///
/// `id` and `created_at` are assigned by the store; `name` and `email`
/// are the only mutable fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct User {
    /// Store-assigned identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Creation timestamp assigned by the store.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a user snapshot.
    #[must_use]
    pub fn new(
        id: UserId,
        name: impl Into<String>,
        email: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            created_at,
        }
    }
}
