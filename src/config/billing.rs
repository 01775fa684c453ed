//! Billing configuration.

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use crate::domain::billing::PlanThresholds;

use super::error::ValidationError;

fn default_pro_cents() -> i64 {
    5_000
}

fn default_elite_cents() -> i64 {
    15_000
}

/// Payment provider and plan catalog configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BillingConfig {
    /// Webhook signing secret shared with the payment provider.
    pub webhook_secret: Option<Secret<String>>,

    /// Amounts at or above this classify as `pro`, in cents.
    #[serde(default = "default_pro_cents")]
    pub pro_cents: i64,

    /// Amounts at or above this classify as `elite`, in cents.
    #[serde(default = "default_elite_cents")]
    pub elite_cents: i64,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            webhook_secret: None,
            pro_cents: default_pro_cents(),
            elite_cents: default_elite_cents(),
        }
    }
}

impl BillingConfig {
    /// Immutable plan catalog passed explicitly to the classification
    /// guard at startup.
    pub fn thresholds(&self) -> PlanThresholds {
        PlanThresholds {
            pro_cents: self.pro_cents,
            elite_cents: self.elite_cents,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.webhook_secret {
            Some(secret) if !secret.expose_secret().is_empty() => {}
            _ => return Err(ValidationError::MissingRequired("billing.webhook_secret")),
        }
        if self.pro_cents <= 0 || self.elite_cents <= self.pro_cents {
            return Err(ValidationError::invalid(
                "billing.elite_cents",
                "thresholds must be positive and strictly increasing",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_secret_reports_the_flag() {
        assert_eq!(
            BillingConfig::default().validate(),
            Err(ValidationError::MissingRequired("billing.webhook_secret"))
        );
    }

    #[test]
    fn inverted_thresholds_are_rejected() {
        let config = BillingConfig {
            webhook_secret: Some(Secret::new("whsec_x".to_string())),
            pro_cents: 10_000,
            elite_cents: 5_000,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn default_thresholds_match_the_plan_catalog() {
        let thresholds = BillingConfig::default().thresholds();
        assert_eq!(thresholds, PlanThresholds::default());
    }
}
