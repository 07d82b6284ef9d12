//! Unified error types for all layers of the application.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for all layers of Stash.
///
/// The store and cache variants are kept apart on purpose: a
/// [`StashError::StoreUnavailable`] always reaches the caller, while a
/// [`StashError::CacheUnavailable`] is usually recovered by the service layer.
#[derive(Error, Debug)]
pub enum StashError {
    /// No record matches the identifier
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Invalid input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Malformed request (unparseable id or body)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Relational backend failure
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Cache backend failure
    #[error("Cache unavailable: {0}")]
    CacheUnavailable(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StashError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::BadRequest(_) => 400,
            Self::Validation(_) => 422,
            Self::CacheUnavailable(_) => 503,
            Self::StoreUnavailable(_)
            | Self::Configuration(_)
            | Self::Internal(_)
            | Self::Other(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            Self::CacheUnavailable(_) => "CACHE_UNAVAILABLE",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates a not found error for a resource.
    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a bad request error.
    #[must_use]
    pub fn bad_request<T: Into<String>>(message: T) -> Self {
        Self::BadRequest(message.into())
    }

    /// Creates a cache error.
    #[must_use]
    pub fn cache<T: Into<String>>(message: T) -> Self {
        Self::CacheUnavailable(message.into())
    }

    /// Creates a store error.
    #[must_use]
    pub fn store<T: Into<String>>(message: T) -> Self {
        Self::StoreUnavailable(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Checks if this error came from the cache backend.
    #[must_use]
    pub const fn is_cache_error(&self) -> bool {
        matches!(self, Self::CacheUnavailable(_))
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for StashError {
    fn from(err: sqlx::Error) -> Self {
        Self::StoreUnavailable(err.to_string())
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::migrate::MigrateError> for StashError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        Self::StoreUnavailable(format!("Migration failed: {}", err))
    }
}

impl From<serde_json::Error> for StashError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization error: {}", err))
    }
}

/// Serializable error response for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional field-level errors for validation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// Field-level validation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FieldError {
    /// Field name
    pub field: String,
    /// Error message
    pub message: String,
    /// Error code
    pub code: String,
}

impl ErrorResponse {
    /// Creates a new error response from a `StashError`.
    #[must_use]
    pub fn from_error(error: &StashError) -> Self {
        Self {
            code: error.error_code().to_string(),
            message: error.to_string(),
            details: None,
        }
    }
}

impl From<&StashError> for ErrorResponse {
    fn from(error: &StashError) -> Self {
        Self::from_error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(StashError::not_found("User", 1).status_code(), 404);
        assert_eq!(StashError::validation("name is required").status_code(), 422);
        assert_eq!(StashError::bad_request("Invalid user ID: x").status_code(), 400);
        assert_eq!(StashError::store("connection refused").status_code(), 500);
        assert_eq!(StashError::cache("connection refused").status_code(), 503);
        assert_eq!(StashError::internal("oops").status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(StashError::not_found("User", 1).error_code(), "NOT_FOUND");
        assert_eq!(StashError::validation("bad").error_code(), "VALIDATION_ERROR");
        assert_eq!(StashError::bad_request("bad").error_code(), "BAD_REQUEST");
        assert_eq!(StashError::store("db").error_code(), "STORE_UNAVAILABLE");
        assert_eq!(StashError::cache("redis").error_code(), "CACHE_UNAVAILABLE");
        assert_eq!(
            StashError::Configuration("x".to_string()).error_code(),
            "CONFIGURATION_ERROR"
        );
        assert_eq!(StashError::internal("x").error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_not_found_message() {
        let err = StashError::not_found("User", 42);
        assert_eq!(err.to_string(), "User not found: 42");
    }

    #[test]
    fn test_is_cache_error() {
        assert!(StashError::cache("down").is_cache_error());
        assert!(!StashError::store("down").is_cache_error());
        assert!(!StashError::not_found("User", 1).is_cache_error());
    }

    #[test]
    fn test_json_error_maps_to_internal() {
        let err: StashError = serde_json::from_str::<u64>("not json").unwrap_err().into();
        assert_eq!(err.status_code(), 500);
        assert!(err.to_string().contains("JSON"));
    }

    #[test]
    fn test_error_response_from_error() {
        let err = StashError::not_found("User", 7);
        let response = ErrorResponse::from_error(&err);
        assert_eq!(response.code, "NOT_FOUND");
        assert_eq!(response.message, "User not found: 7");
        assert!(response.details.is_none());
    }
}
