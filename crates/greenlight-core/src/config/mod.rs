//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files and
//! environment variables via the `config` crate. Each sub-module represents
//! a logical configuration section, and every field carries a default so
//! an empty source set still yields a runnable development configuration.

pub mod app;
pub mod auth;
pub mod database;
pub mod limiter;
pub mod logging;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::{AuthConfig, MAX_TOKEN_TTL_HOURS};
pub use self::database::DatabaseConfig;
pub use self::limiter::LimiterConfig;
pub use self::logging::LoggingConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Storage settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Rate limiter settings.
    #[serde(default)]
    pub limiter: LimiterConfig,
    /// Token settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `config/default.toml`, the environment-specific overlay
    /// `config/{env}.toml`, and environment variables prefixed with
    /// `GREENLIGHT__` (sections separated by `__`).
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("GREENLIGHT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Reject settings the runtime cannot honor.
    pub fn validate(&self) -> Result<(), AppError> {
        if !(self.limiter.requests_per_second > 0.0) {
            return Err(AppError::configuration(
                "limiter.requests_per_second must be greater than zero",
            ));
        }
        if self.limiter.burst == 0 {
            return Err(AppError::configuration(
                "limiter.burst must be greater than zero",
            ));
        }
        if self.limiter.sweep_interval_seconds == 0 {
            return Err(AppError::configuration(
                "limiter.sweep_interval_seconds must be greater than zero",
            ));
        }
        if self.database.query_timeout_ms == 0 {
            return Err(AppError::configuration(
                "database.query_timeout_ms must be greater than zero",
            ));
        }
        for (key, hours) in [
            (
                "auth.authentication_token_ttl_hours",
                self.auth.authentication_token_ttl_hours,
            ),
            (
                "auth.activation_token_ttl_hours",
                self.auth.activation_token_ttl_hours,
            ),
        ] {
            if !(1..=MAX_TOKEN_TTL_HOURS).contains(&hours) {
                return Err(AppError::configuration(format!(
                    "{key} must be between 1 and {MAX_TOKEN_TTL_HOURS}, got {hours}"
                )));
            }
        }
        match self.database.provider.as_str() {
            "postgres" | "memory" => {}
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown database provider '{other}'. Expected 'postgres' or 'memory'"
                )));
            }
        }
        if self.database.provider == "postgres" && self.database.url.is_empty() {
            return Err(AppError::configuration(
                "database.url is required for the postgres provider",
            ));
        }
        Ok(())
    }
}
