//! Plan tiers and amount-based classification.
//!
//! `classify_plan` is the single classification guard shared by every
//! billing entry point. It is a pure function over an explicit
//! [`PlanThresholds`] value loaded from configuration at process start;
//! plan logic is never ambient global state.

use serde::{Deserialize, Serialize};

/// Subscription plan tier.
///
/// Ordered by entitlement: `free < starter < pro < elite`. Ordering is
/// defined by [`PlanTier::rank`], not by declaration position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    /// No paid subscription.
    Free,
    /// Entry paid tier.
    Starter,
    /// Mid paid tier.
    Pro,
    /// Top paid tier.
    Elite,
}

impl PlanTier {
    /// Returns true for any paid tier.
    pub fn is_paid(&self) -> bool {
        !matches!(self, PlanTier::Free)
    }

    /// Numeric entitlement rank. Higher rank grants more.
    pub fn rank(&self) -> u8 {
        match self {
            PlanTier::Free => 0,
            PlanTier::Starter => 1,
            PlanTier::Pro => 2,
            PlanTier::Elite => 3,
        }
    }

    /// Tier as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanTier::Free => "free",
            PlanTier::Starter => "starter",
            PlanTier::Pro => "pro",
            PlanTier::Elite => "elite",
        }
    }

    /// Parses a stored tier value.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "free" => Some(PlanTier::Free),
            "starter" => Some(PlanTier::Starter),
            "pro" => Some(PlanTier::Pro),
            "elite" => Some(PlanTier::Elite),
            _ => None,
        }
    }
}

impl std::fmt::Display for PlanTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Amount thresholds separating the paid tiers, in cents.
///
/// Loaded once from configuration and passed explicitly wherever a paid
/// amount needs classifying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PlanThresholds {
    /// Amounts at or above this classify as `Pro`.
    pub pro_cents: i64,
    /// Amounts at or above this classify as `Elite`.
    pub elite_cents: i64,
}

impl Default for PlanThresholds {
    fn default() -> Self {
        Self {
            pro_cents: 5_000,
            elite_cents: 15_000,
        }
    }
}

/// Resolves the plan tier a paid amount entitles to.
///
/// Pure and deterministic: the same `(amount, thresholds)` always yields
/// the same tier, and the result is monotonic in `amount`. Non-positive
/// amounts classify as `Free`.
pub fn classify_plan(amount_cents: i64, thresholds: &PlanThresholds) -> PlanTier {
    if amount_cents >= thresholds.elite_cents {
        PlanTier::Elite
    } else if amount_cents >= thresholds.pro_cents {
        PlanTier::Pro
    } else if amount_cents > 0 {
        PlanTier::Starter
    } else {
        PlanTier::Free
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn tiers_rank_in_entitlement_order() {
        assert!(PlanTier::Free.rank() < PlanTier::Starter.rank());
        assert!(PlanTier::Starter.rank() < PlanTier::Pro.rank());
        assert!(PlanTier::Pro.rank() < PlanTier::Elite.rank());
    }

    #[test]
    fn only_free_is_unpaid() {
        assert!(!PlanTier::Free.is_paid());
        assert!(PlanTier::Starter.is_paid());
        assert!(PlanTier::Pro.is_paid());
        assert!(PlanTier::Elite.is_paid());
    }

    #[test]
    fn tier_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&PlanTier::Pro).unwrap(), "\"pro\"");
    }

    #[test]
    fn tier_roundtrips_through_storage_form() {
        for tier in [PlanTier::Free, PlanTier::Starter, PlanTier::Pro, PlanTier::Elite] {
            assert_eq!(PlanTier::parse(tier.as_str()), Some(tier));
        }
        assert_eq!(PlanTier::parse("platinum"), None);
    }

    #[test]
    fn amount_above_pro_threshold_classifies_as_pro() {
        // 7000 with a 5000 pro threshold resolves to pro.
        let thresholds = PlanThresholds::default();
        assert_eq!(classify_plan(7_000, &thresholds), PlanTier::Pro);
    }

    #[test]
    fn classification_boundaries() {
        let thresholds = PlanThresholds::default();
        assert_eq!(classify_plan(0, &thresholds), PlanTier::Free);
        assert_eq!(classify_plan(-500, &thresholds), PlanTier::Free);
        assert_eq!(classify_plan(1, &thresholds), PlanTier::Starter);
        assert_eq!(classify_plan(4_999, &thresholds), PlanTier::Starter);
        assert_eq!(classify_plan(5_000, &thresholds), PlanTier::Pro);
        assert_eq!(classify_plan(14_999, &thresholds), PlanTier::Pro);
        assert_eq!(classify_plan(15_000, &thresholds), PlanTier::Elite);
    }

    proptest! {
        #[test]
        fn classification_is_deterministic(amount in -100_000i64..200_000) {
            let thresholds = PlanThresholds::default();
            prop_assert_eq!(
                classify_plan(amount, &thresholds),
                classify_plan(amount, &thresholds)
            );
        }

        #[test]
        fn classification_is_monotonic_in_amount(
            a in -100_000i64..200_000,
            b in -100_000i64..200_000,
        ) {
            let thresholds = PlanThresholds::default();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(
                classify_plan(lo, &thresholds).rank() <= classify_plan(hi, &thresholds).rank()
            );
        }
    }
}
