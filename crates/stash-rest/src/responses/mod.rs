//! API response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use stash_core::{ErrorResponse, StashError};
use tracing::error;
use utoipa::ToSchema;

/// Success envelope: the payload plus a short message.
///
/// For reads the message says whether the payload came from the cache.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub data: T,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
        }
    }
}

/// Application error type for Axum.
#[derive(Debug)]
pub struct AppError(pub StashError);

impl From<StashError> for AppError {
    fn from(err: StashError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(error = %self.0, code = self.0.error_code(), "Request failed");
        }

        (status, Json(ErrorResponse::from_error(&self.0))).into_response()
    }
}

/// Result type for Axum handlers.
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

/// Helper to create a success (200) response.
pub fn ok<T: Serialize>(data: T, message: impl Into<String>) -> ApiResult<T> {
    Ok(Json(ApiResponse::new(data, message)))
}

/// Helper to create a created (201) response.
pub fn created<T: Serialize>(
    data: T,
    message: impl Into<String>,
) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::CREATED, Json(ApiResponse::new(data, message)))
}
