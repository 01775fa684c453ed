//! Configuration error types.

use thiserror::Error;

/// Failure to load configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The underlying loader could not read or deserialize the
    /// environment.
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

/// Semantic validation failure, surfaced before any work starts.
///
/// Each variant carries a machine-readable flag naming the missing or
/// invalid dependency so operators can see exactly what to set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required setting is absent or empty.
    #[error("missing required configuration: {0}")]
    MissingRequired(&'static str),

    /// A setting is present but unusable.
    #[error("invalid configuration for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ValidationError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ValidationError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
