//! OpenAPI documentation for the REST API.

use crate::controllers::health_controller::{ComponentCheck, HealthResponse, ReadinessResponse};
use stash_core::{ErrorResponse, FieldError, User, UserId};
use stash_service::{CreateUserRequest, DeletedUser, UpdateUserRequest};
use utoipa::OpenApi;

/// Path of the generated document.
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// OpenAPI documentation for the Stash user API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Stash User API",
        version = "1.0.0",
        description = "User records served through a read-through Redis cache",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    paths(
        // User endpoints
        crate::controllers::user_controller::list_users,
        crate::controllers::user_controller::create_user,
        crate::controllers::user_controller::get_user,
        crate::controllers::user_controller::update_user,
        crate::controllers::user_controller::delete_user,
        // Health endpoints
        crate::controllers::health_controller::health_check,
        crate::controllers::health_controller::readiness_check,
        crate::controllers::health_controller::liveness_check,
    ),
    components(
        schemas(
            UserId,
            User,
            ErrorResponse,
            FieldError,
            CreateUserRequest,
            UpdateUserRequest,
            DeletedUser,
            HealthResponse,
            ComponentCheck,
            ReadinessResponse,
        )
    ),
    tags(
        (name = "users", description = "User management endpoints"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;

/// Serves the OpenAPI document as JSON.
pub async fn openapi_json() -> axum::Json<utoipa::openapi::OpenApi> {
    axum::Json(ApiDoc::openapi())
}
