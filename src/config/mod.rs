//! Application configuration.
//!
//! Type-safe configuration loaded from environment variables via the
//! `config` and `dotenvy` crates. Variables carry the `REPLYPILOT`
//! prefix with `__` separating nested values, e.g.
//! `REPLYPILOT__DATABASE__URL=postgresql://...`.
//!
//! Validation runs once at startup, before any work begins, and reports
//! one machine-readable flag per missing required dependency.

mod ai;
mod billing;
mod database;
mod error;
mod server;
mod sync;

pub use ai::AiConfig;
pub use billing::BillingConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use server::ServerConfig;
pub use sync::SyncConfig;

use serde::Deserialize;

/// Root application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP server (host, port).
    #[serde(default)]
    pub server: ServerConfig,

    /// PostgreSQL connection.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// External review provider.
    #[serde(default)]
    pub sync: SyncConfig,

    /// AI drafting provider.
    #[serde(default)]
    pub ai: AiConfig,

    /// Payment provider and plan thresholds.
    #[serde(default)]
    pub billing: BillingConfig,
}

impl AppConfig {
    /// Loads configuration from the environment.
    ///
    /// Reads a `.env` file when present (development), then environment
    /// variables with the `REPLYPILOT` prefix.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when values cannot be deserialized into the
    /// expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("REPLYPILOT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validates every section; fatal before any work starts.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.sync.validate()?;
        self.ai.validate()?;
        self.billing.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global; serialize the tests that touch them.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("REPLYPILOT__DATABASE__URL", "postgresql://test@localhost/test");
        env::set_var("REPLYPILOT__AI__API_KEY", "sk-test");
        env::set_var("REPLYPILOT__BILLING__WEBHOOK_SECRET", "whsec_test");
    }

    fn clear_env() {
        env::remove_var("REPLYPILOT__DATABASE__URL");
        env::remove_var("REPLYPILOT__AI__API_KEY");
        env::remove_var("REPLYPILOT__BILLING__WEBHOOK_SECRET");
        env::remove_var("REPLYPILOT__SERVER__PORT");
        env::remove_var("REPLYPILOT__BILLING__PRO_CENTS");
    }

    #[test]
    fn loads_and_validates_from_minimal_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.database.url, "postgresql://test@localhost/test");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn missing_database_url_fails_validation_with_its_flag() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let config = AppConfig::load().unwrap();

        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("database.url"))
        );
    }

    #[test]
    fn nested_overrides_apply() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("REPLYPILOT__SERVER__PORT", "3000");
        env::set_var("REPLYPILOT__BILLING__PRO_CENTS", "9000");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.billing.thresholds().pro_cents, 9000);
    }
}
