//! Configuration loader with layered sources.

use crate::AppConfig;
use config::{Config, ConfigError, Environment, File};
use stash_core::StashError;
use std::path::Path;
use tracing::{debug, info};

/// Conventional variables honoured on top of the `STASH_` prefixed ones.
const CONVENTIONAL_OVERRIDES: [(&str, &str); 3] = [
    ("PORT", "server.port"),
    ("DATABASE_URL", "database.url"),
    ("REDIS_URL", "redis.url"),
];

/// Configuration loader.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: AppConfig,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `config/default.toml` - Default values
    /// 2. `config/{environment}.toml` - Environment-specific overrides
    /// 3. `config/local.toml` - Local overrides
    /// 4. Environment variables with `STASH_` prefix (`STASH_SERVER__PORT`)
    /// 5. `PORT`, `DATABASE_URL` and `REDIS_URL`
    pub fn new(config_dir: impl AsRef<str>) -> Result<Self, StashError> {
        let config = Self::load_config(config_dir.as_ref())?;
        Ok(Self { config })
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, StashError> {
        Self::new("./config")
    }

    /// Returns the loaded configuration.
    #[must_use]
    pub fn get(&self) -> &AppConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    #[must_use]
    pub fn into_config(self) -> AppConfig {
        self.config
    }

    /// Loads configuration from the specified directory.
    fn load_config(config_dir: &str) -> Result<AppConfig, StashError> {
        // Load .env file if present
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let environment =
            std::env::var("STASH_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder();

        for name in ["default", environment.as_str(), "local"] {
            let path = format!("{}/{}.toml", config_dir, name);
            if Path::new(&path).exists() {
                debug!("Loading config from: {}", path);
                builder = builder.add_source(File::with_name(&path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("STASH")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        for (var, key) in CONVENTIONAL_OVERRIDES {
            let value = std::env::var(var).ok().filter(|v| !v.is_empty());
            if value.is_some() {
                debug!("Overriding {} from {}", key, var);
            }
            let overridden = if key == "server.port" {
                let port = value.and_then(|v| v.parse::<i64>().ok());
                builder.set_override_option(key, port)
            } else {
                builder.set_override_option(key, value)
            };
            builder = overridden.map_err(config_error_to_stash_error)?;
        }

        let app_config: AppConfig = builder
            .build()
            .and_then(Config::try_deserialize)
            .map_err(config_error_to_stash_error)?;

        validate_config(&app_config)?;

        Ok(app_config)
    }
}

/// Validates the configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), StashError> {
    if config.database.url.is_empty() {
        return Err(StashError::Configuration("Database URL is required".to_string()));
    }

    if config.redis.enabled && config.redis.url.is_empty() {
        return Err(StashError::Configuration(
            "Redis URL is required when Redis is enabled".to_string(),
        ));
    }

    if config.cache.ttl_secs == 0 {
        return Err(StashError::Configuration(
            "Cache TTL must be at least one second".to_string(),
        ));
    }

    Ok(())
}

fn config_error_to_stash_error(err: ConfigError) -> StashError {
    StashError::Configuration(err.to_string())
}
