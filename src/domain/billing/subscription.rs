//! Per-organization subscription state.
//!
//! The billing webhook consumer is the only writer. Both transitions are
//! idempotent so at-least-once webhook delivery converges on the same
//! end state.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::OrgId;

use super::plan::PlanTier;

/// Billing state of one organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub org_id: OrgId,
    /// Customer reference at the payment provider. Null until the first
    /// successful checkout; once set it is never cleared, only the tier
    /// regresses on cancellation.
    pub billing_customer_id: Option<String>,
    pub plan: PlanTier,
}

impl Subscription {
    /// State of an organization that has never checked out.
    pub fn free(org_id: OrgId) -> Self {
        Self {
            org_id,
            billing_customer_id: None,
            plan: PlanTier::Free,
        }
    }

    /// Applies a completed checkout: adopt the resolved tier and record
    /// the billing customer reference.
    ///
    /// The customer reference is write-once-then-sticky: an already
    /// recorded reference is kept even if the event carries a different
    /// one. Re-applying the same event yields the same state.
    pub fn apply_checkout(&mut self, customer_id: impl Into<String>, plan: PlanTier) {
        if self.billing_customer_id.is_none() {
            self.billing_customer_id = Some(customer_id.into());
        }
        self.plan = plan;
    }

    /// Applies a subscription cancellation: regress to `Free`
    /// unconditionally, keeping the customer reference on file.
    pub fn apply_cancellation(&mut self) {
        self.plan = PlanTier::Free;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_subscription_is_free_without_customer() {
        let sub = Subscription::free(OrgId::new());
        assert_eq!(sub.plan, PlanTier::Free);
        assert!(sub.billing_customer_id.is_none());
    }

    #[test]
    fn checkout_sets_tier_and_customer_reference() {
        let mut sub = Subscription::free(OrgId::new());
        sub.apply_checkout("cus_123", PlanTier::Pro);
        assert_eq!(sub.plan, PlanTier::Pro);
        assert_eq!(sub.billing_customer_id.as_deref(), Some("cus_123"));
    }

    #[test]
    fn reapplying_the_same_checkout_is_idempotent() {
        let mut sub = Subscription::free(OrgId::new());
        sub.apply_checkout("cus_123", PlanTier::Starter);
        let after_first = sub.clone();

        sub.apply_checkout("cus_123", PlanTier::Starter);

        assert_eq!(sub, after_first);
    }

    #[test]
    fn customer_reference_is_sticky_once_set() {
        let mut sub = Subscription::free(OrgId::new());
        sub.apply_checkout("cus_first", PlanTier::Starter);

        // A later checkout with a different customer keeps the original ref.
        sub.apply_checkout("cus_other", PlanTier::Elite);

        assert_eq!(sub.billing_customer_id.as_deref(), Some("cus_first"));
        assert_eq!(sub.plan, PlanTier::Elite);
    }

    #[test]
    fn cancellation_regresses_to_free_from_any_tier() {
        for tier in [PlanTier::Starter, PlanTier::Pro, PlanTier::Elite] {
            let mut sub = Subscription::free(OrgId::new());
            sub.apply_checkout("cus_1", tier);

            sub.apply_cancellation();

            assert_eq!(sub.plan, PlanTier::Free);
            assert_eq!(sub.billing_customer_id.as_deref(), Some("cus_1"));
        }
    }

    #[test]
    fn cancellation_is_an_idempotent_no_op_when_already_free() {
        let mut sub = Subscription::free(OrgId::new());
        sub.apply_checkout("cus_1", PlanTier::Pro);
        sub.apply_cancellation();
        let after_first = sub.clone();

        sub.apply_cancellation();

        assert_eq!(sub, after_first);
    }
}
