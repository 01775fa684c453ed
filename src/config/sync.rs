//! Review sync configuration.

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

fn default_base_url() -> String {
    "https://mybusiness.googleapis.com".to_string()
}

fn default_call_timeout_secs() -> u64 {
    30
}

/// External review provider configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// Provider API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bound on one per-target provider call, in seconds. Mandatory so
    /// one unresponsive target cannot stall a fan-out batch.
    #[serde(default = "default_call_timeout_secs")]
    pub call_timeout_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            call_timeout_secs: default_call_timeout_secs(),
        }
    }
}

impl SyncConfig {
    /// Per-call timeout as a `Duration`.
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.base_url.is_empty() {
            return Err(ValidationError::MissingRequired("sync.base_url"));
        }
        if self.call_timeout_secs == 0 {
            return Err(ValidationError::invalid(
                "sync.call_timeout_secs",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}
