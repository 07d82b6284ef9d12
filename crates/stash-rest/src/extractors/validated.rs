//! Validated JSON extractor for automatic request validation.
//!
//! `ValidatedJson<T>` deserializes JSON and validates it using the
//! `validator` crate. Malformed bodies are answered with 400 Bad Request,
//! validation failures with 422 Unprocessable Entity and field-level
//! error details.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use stash_core::{field_errors, ErrorResponse};
use validator::{Validate, ValidationErrors};

/// JSON extractor that validates the deserialized value.
///
/// ```ignore
/// async fn create_user(ValidatedJson(request): ValidatedJson<CreateUserRequest>) {
///     // request is guaranteed to be valid here
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T> std::ops::Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Rejection type for validated JSON extraction.
#[derive(Debug)]
pub enum ValidatedJsonRejection {
    /// JSON parsing/deserialization error.
    JsonError(JsonRejection),
    /// Validation error with field-level details.
    ValidationError(ValidationErrors),
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        match self {
            Self::JsonError(rejection) => {
                let error_response = ErrorResponse {
                    code: "INVALID_JSON".to_string(),
                    message: format!("Invalid JSON: {}", rejection.body_text()),
                    details: None,
                };
                (StatusCode::BAD_REQUEST, Json(error_response)).into_response()
            }
            Self::ValidationError(errors) => {
                let error_response = ErrorResponse {
                    code: "VALIDATION_ERROR".to_string(),
                    message: "Request validation failed".to_string(),
                    details: Some(field_errors(&errors)),
                };
                (StatusCode::UNPROCESSABLE_ENTITY, Json(error_response)).into_response()
            }
        }
    }
}

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::JsonError)?;

        value
            .validate()
            .map_err(ValidatedJsonRejection::ValidationError)?;

        Ok(ValidatedJson(value))
    }
}
