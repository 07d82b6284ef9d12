//! Server startup utilities.

use stash_config::ObservabilityConfig;
use stash_core::{StashError, StashResult};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(config: &ObservabilityConfig) -> StashResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);

    let result = if config.is_json() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()
    };

    result.map_err(|e| StashError::Configuration(format!("Failed to initialize logging: {}", e)))
}

/// Prints the startup banner.
pub fn print_banner() {
    info!(r#"
         __             __
   _____/ /_____ ______/ /_
  / ___/ __/ __ `/ ___/ __ \
 (__  ) /_/ /_/ (__  ) / / /
/____/\__/\__,_/____/_/ /_/

       cache-aside user service
    "#);
}

/// Prints server startup information.
pub fn print_startup_info(addr: &str, cache_enabled: bool) {
    let separator = "=".repeat(60);
    info!("{}", separator);
    info!("REST API:  http://{}/users", addr);
    info!("Health:    http://{}/health", addr);
    info!("Ready:     http://{}/ready", addr);
    info!("API Docs:  http://{}/api-docs/openapi.json", addr);
    info!("Cache:     {}", if cache_enabled { "redis" } else { "disabled" });
    info!("{}", separator);
}
