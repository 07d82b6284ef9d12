//! User-related DTOs.

use serde::{Deserialize, Serialize};
use stash_core::rules::not_blank;
use stash_core::UserId;
use utoipa::ToSchema;
use validator::Validate;

/// Request to create a new user.
///
/// Absent fields deserialize as empty strings so that they are reported
/// as validation failures rather than malformed bodies.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Name is required"))]
    pub name: String,

    #[serde(default)]
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

impl CreateUserRequest {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Request to replace a user's name and email.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Name is required"))]
    pub name: String,

    #[serde(default)]
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

impl UpdateUserRequest {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Confirmation returned by a successful delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeletedUser {
    pub id: UserId,
}
