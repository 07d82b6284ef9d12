//! # Stash Server
//!
//! Main entry point: loads configuration, sets up logging and runs the
//! application until a shutdown signal arrives.

use stash_config::{ConfigLoader, ObservabilityConfig};
use stash_server::{app::AppBuilder, startup};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match ConfigLoader::from_default_location() {
        Ok(loader) => loader.into_config(),
        Err(e) => {
            let _ = startup::init_logging(&ObservabilityConfig::default());
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = startup::init_logging(&config.observability) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    info!("Starting Stash Server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = AppBuilder::new().with_config(config).run().await {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}
