//! Database configuration.

use serde::Deserialize;

use super::error::ValidationError;

fn default_max_connections() -> u32 {
    5
}

/// PostgreSQL connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL (postgresql://...).
    pub url: String,

    /// Pool size.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::MissingRequired("database.url"));
        }
        if !self.url.starts_with("postgres://") && !self.url.starts_with("postgresql://") {
            return Err(ValidationError::invalid(
                "database.url",
                "must be a postgres:// or postgresql:// URL",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_url_reports_the_flag() {
        let config = DatabaseConfig::default();
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("database.url"))
        );
    }

    #[test]
    fn non_postgres_url_is_rejected() {
        let config = DatabaseConfig {
            url: "mysql://localhost/db".to_string(),
            max_connections: 5,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn postgres_url_passes() {
        let config = DatabaseConfig {
            url: "postgresql://app@localhost/replypilot".to_string(),
            max_connections: 5,
        };
        assert!(config.validate().is_ok());
    }
}
