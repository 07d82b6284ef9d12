//! Health check controller.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

/// Health check response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Health status.
    pub status: String,
    /// Application version.
    pub version: String,
}

/// Outcome of probing one backend.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComponentCheck {
    pub name: String,
    /// `up` or `down`.
    pub status: String,
    pub critical: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Readiness report.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReadinessResponse {
    /// `ready`, `degraded` or `unavailable`.
    pub status: String,
    pub checks: Vec<ComponentCheck>,
}

/// Creates the health router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/live", get(liveness_check))
}

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness check endpoint.
///
/// A failing critical backend makes the service unavailable. A failing
/// non-critical one only degrades it.
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "Service is ready or degraded", body = ReadinessResponse),
        (status = 503, description = "A critical backend is unreachable", body = ReadinessResponse)
    )
)]
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let mut checks = Vec::with_capacity(state.health_indicators.len());
    let mut unavailable = false;
    let mut degraded = false;

    for indicator in &state.health_indicators {
        let result = indicator.check().await;
        if let Err(e) = &result {
            warn!(backend = indicator.name(), error = %e, "Readiness probe failed");
            if indicator.is_critical() {
                unavailable = true;
            } else {
                degraded = true;
            }
        }

        checks.push(ComponentCheck {
            name: indicator.name().to_string(),
            status: if result.is_ok() { "up" } else { "down" }.to_string(),
            critical: indicator.is_critical(),
            error: result.err().map(|e| e.to_string()),
        });
    }

    let (status, label) = if unavailable {
        (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
    } else if degraded {
        (StatusCode::OK, "degraded")
    } else {
        (StatusCode::OK, "ready")
    };

    (
        status,
        Json(ReadinessResponse {
            status: label.to_string(),
            checks,
        }),
    )
}

/// Liveness check endpoint.
#[utoipa::path(
    get,
    path = "/live",
    tag = "health",
    responses(
        (status = 200, description = "Service is alive")
    )
)]
pub async fn liveness_check() -> impl IntoResponse {
    StatusCode::OK
}
