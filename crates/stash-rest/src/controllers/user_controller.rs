//! User resource controller.

use crate::{
    extractors::ValidatedJson,
    responses::{created, ok, ApiResponse, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use stash_core::{ErrorResponse, StashError, User, UserId};
use stash_service::{CreateUserRequest, DeletedUser, Source, UpdateUserRequest};
use tracing::debug;

/// Message attached to a successful delete.
pub const DELETED_MESSAGE: &str = "User deleted successfully";

/// Creates the user router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

/// List all users, newest first.
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "All users, served from cache or store",
            body = ApiResponse<Vec<User>>),
        (status = 500, description = "Store unavailable", body = ErrorResponse)
    )
)]
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Vec<User>> {
    debug!("List users request");

    let users = state.user_service.list_users().await?;
    ok(users.value, users.source.message())
}

/// Create a new user.
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<User>),
        (status = 400, description = "Malformed JSON", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse),
        (status = 500, description = "Store unavailable", body = ErrorResponse)
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<User>>), AppError> {
    debug!("Create user request: {}", request.email);

    let user = state.user_service.create_user(request).await?;
    Ok(created(user, Source::Store.message()))
}

/// Get a user by ID.
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(("id" = u64, Path, description = "User ID")),
    responses(
        (status = 200, description = "The user, served from cache or store",
            body = ApiResponse<User>),
        (status = 400, description = "Invalid user ID", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Store unavailable", body = ErrorResponse)
    )
)]
pub async fn get_user(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<User> {
    debug!("Get user request: {}", id);

    let user_id = parse_user_id(&id)?;
    let user = state.user_service.get_user(user_id).await?;
    ok(user.value, user.source.message())
}

/// Replace a user's name and email.
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "users",
    params(("id" = u64, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<User>),
        (status = 400, description = "Invalid user ID or malformed JSON", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse),
        (status = 500, description = "Store unavailable", body = ErrorResponse)
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<User> {
    debug!("Update user request: {}", id);

    let user_id = parse_user_id(&id)?;
    let user = state.user_service.update_user(user_id, request).await?;
    ok(user, Source::Store.message())
}

/// Delete a user.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    params(("id" = u64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = ApiResponse<DeletedUser>),
        (status = 400, description = "Invalid user ID", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Store unavailable", body = ErrorResponse)
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<DeletedUser> {
    debug!("Delete user request: {}", id);

    let user_id = parse_user_id(&id)?;
    let deleted = state.user_service.delete_user(user_id).await?;
    ok(deleted, DELETED_MESSAGE)
}

/// Helper to parse user ID from path parameter.
fn parse_user_id(id: &str) -> Result<UserId, AppError> {
    UserId::parse(id)
        .map_err(|_| AppError(StashError::bad_request(format!("Invalid user ID: {}", id))))
}
