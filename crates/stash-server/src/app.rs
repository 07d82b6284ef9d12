//! Application builder and lifecycle.

use crate::{
    di::{AppModuleBuilder, ServiceResolver},
    startup,
};
use stash_config::AppConfig;
use stash_core::{HealthIndicator, StashError, StashResult};
use stash_repository::{DatabasePool, DatabasePoolInterface};
use stash_rest::create_router;
use stash_service::{CacheInterface, RedisCacheService};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

/// Application builder for constructing the server.
pub struct AppBuilder {
    config: Option<AppConfig>,
}

impl AppBuilder {
    /// Creates a new application builder.
    pub fn new() -> Self {
        Self { config: None }
    }

    /// Sets the configuration.
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Connects the backends and serves HTTP until a shutdown signal.
    ///
    /// Fails fast when MySQL or an enabled Redis cannot be reached.
    pub async fn run(self) -> StashResult<()> {
        let config = self.config.unwrap_or_default();

        startup::print_banner();
        info!("Environment: {}", config.app.environment);

        let db_pool = DatabasePool::connect(&config.database).await?;

        if config.database.run_migrations {
            db_pool.run_migrations().await?;
        } else {
            info!("Skipping database migrations");
        }

        let cache = RedisCacheService::connect(&config.redis).await?;

        let module = AppModuleBuilder::new()
            .with_database_pool(&db_pool)
            .with_cache(&cache)
            .with_cache_config(config.cache.clone())
            .build()?;

        let health_indicators: Vec<Arc<dyn HealthIndicator>> = vec![
            Arc::new(DatabasePool::with_pool(db_pool.inner().clone())),
            Arc::new(cache.clone()),
        ];

        let router = create_router(module.as_ref(), health_indicators, &config.server);

        let addr = config.server.addr();
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| StashError::Internal(format!("Failed to bind {}: {}", addr, e)))?;

        startup::print_startup_info(&addr, cache.is_enabled());

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| StashError::Internal(format!("REST server error: {}", e)))?;

        module.database_pool().close().await;

        info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
