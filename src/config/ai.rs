//! Drafting provider configuration.

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use super::error::ValidationError;

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// AI drafting provider configuration (OpenAI-compatible).
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Provider API key.
    pub api_key: Option<Secret<String>>,

    /// Model used for reply generation.
    #[serde(default = "default_model")]
    pub model: String,

    /// API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl AiConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.api_key {
            Some(key) if !key.expose_secret().is_empty() => Ok(()),
            _ => Err(ValidationError::MissingRequired("ai.api_key")),
        }
    }
}
