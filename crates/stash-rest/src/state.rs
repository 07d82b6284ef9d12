//! Application state for Axum handlers.

use shaku::{HasComponent, Module};
use stash_core::HealthIndicator;
use stash_service::UserService;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserService>,
    /// Backends probed by the readiness endpoint.
    pub health_indicators: Vec<Arc<dyn HealthIndicator>>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        user_service: Arc<dyn UserService>,
        health_indicators: Vec<Arc<dyn HealthIndicator>>,
    ) -> Self {
        Self {
            user_service,
            health_indicators,
        }
    }

    /// Resolves the services from a Shaku module.
    pub fn from_module<M>(module: &M, health_indicators: Vec<Arc<dyn HealthIndicator>>) -> Self
    where
        M: Module + HasComponent<dyn UserService>,
    {
        Self::new(module.resolve(), health_indicators)
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self.health_indicators.iter().map(|h| h.name()).collect();
        f.debug_struct("AppState")
            .field("health_indicators", &names)
            .finish_non_exhaustive()
    }
}
