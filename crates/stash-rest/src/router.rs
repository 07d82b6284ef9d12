//! Main application router.

use crate::{
    controllers::{health_controller, user_controller},
    middleware::logging_middleware,
    openapi::{openapi_json, OPENAPI_PATH},
    state::AppState,
};
use axum::{http::HeaderValue, middleware, routing::get, Router};
use shaku::{HasComponent, Module};
use stash_config::ServerConfig;
use stash_core::HealthIndicator;
use stash_service::UserService;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Creates the application router from a Shaku module.
///
/// The module must provide the `UserService` component. Health indicators
/// are passed separately since they span several components.
pub fn create_router<M>(
    module: &M,
    health_indicators: Vec<Arc<dyn HealthIndicator>>,
    server_config: &ServerConfig,
) -> Router
where
    M: Module + HasComponent<dyn UserService>,
{
    build_router(AppState::from_module(module, health_indicators), server_config)
}

/// Creates the application router around an existing state.
pub fn build_router(state: AppState, server_config: &ServerConfig) -> Router {
    let cors = create_cors_layer(server_config);

    let router = Router::new()
        .merge(health_controller::router())
        .nest("/users", user_controller::router())
        .route(OPENAPI_PATH, get(openapi_json))
        .route("/", get(root))
        .with_state(state)
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(logging_middleware));

    info!("Router created with /users endpoints and OpenAPI at {}", OPENAPI_PATH);
    router
}

/// Creates a CORS layer based on server configuration.
fn create_cors_layer(server_config: &ServerConfig) -> CorsLayer {
    if !server_config.cors_enabled {
        return CorsLayer::new();
    }

    if server_config.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = server_config
        .cors_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Root endpoint handler.
async fn root() -> &'static str {
    concat!("Stash User API v", env!("CARGO_PKG_VERSION"))
}
