//! Billing webhook consumer.
//!
//! Verifies event authenticity against the raw bytes, classifies the
//! event type, and applies idempotent transitions to subscription
//! state. There is no delivery-id deduplication table; at-least-once
//! delivery is absorbed entirely by the idempotent upserts.

use std::sync::Arc;

use secrecy::Secret;
use tracing::{debug, info, warn};

use crate::domain::billing::{
    classify_plan, BillingEvent, BillingEventType, CancelledSubscription, CheckoutSession,
    PlanThresholds, PlanTier, Subscription, WebhookError, WebhookVerifier,
};
use crate::domain::foundation::OrgId;
use crate::ports::SubscriptionStore;

/// What a delivery did to subscription state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookDisposition {
    /// A transition was applied (possibly a no-op re-application).
    Applied { org_id: OrgId, plan: PlanTier },
    /// The event type is not one this consumer transitions on.
    Ignored { event_type: String },
}

/// Applies verified billing events to subscription records.
pub struct BillingWebhookService {
    verifier: WebhookVerifier,
    subscriptions: Arc<dyn SubscriptionStore>,
    thresholds: PlanThresholds,
}

impl BillingWebhookService {
    pub fn new(
        signing_secret: Secret<String>,
        subscriptions: Arc<dyn SubscriptionStore>,
        thresholds: PlanThresholds,
    ) -> Self {
        Self {
            verifier: WebhookVerifier::new(signing_secret),
            subscriptions,
            thresholds,
        }
    }

    /// Handles one delivery: verify, classify, apply.
    ///
    /// Verification precedes any payload parsing; an unverifiable event
    /// never reaches the store.
    pub async fn handle(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<WebhookDisposition, WebhookError> {
        let event = self.verifier.verify_and_parse(payload, signature_header)?;

        match event.parsed_type() {
            BillingEventType::CheckoutCompleted => self.apply_checkout(&event).await,
            BillingEventType::SubscriptionDeleted => self.apply_cancellation(&event).await,
            BillingEventType::Unhandled => {
                debug!(event_type = %event.event_type, event_id = %event.id, "billing event ignored");
                Ok(WebhookDisposition::Ignored {
                    event_type: event.event_type,
                })
            }
        }
    }

    /// `checkout.session.completed`: classify the paid amount and upsert
    /// the organization's subscription.
    async fn apply_checkout(
        &self,
        event: &BillingEvent,
    ) -> Result<WebhookDisposition, WebhookError> {
        let session: CheckoutSession = event
            .deserialize_object()
            .map_err(|e| WebhookError::ParseError(e.to_string()))?;

        let customer = session
            .customer
            .clone()
            .ok_or(WebhookError::MissingField("customer"))?;
        let amount = session
            .amount_total
            .ok_or(WebhookError::MissingField("amount_total"))?;

        let org_id = self.resolve_org(&session).await?;
        let plan = classify_plan(amount, &self.thresholds);

        let mut subscription = self
            .subscriptions
            .find_by_org(&org_id)
            .await
            .map_err(|e| WebhookError::Store(e.to_string()))?
            .unwrap_or_else(|| Subscription::free(org_id));
        subscription.apply_checkout(customer, plan);

        self.subscriptions
            .upsert(&subscription)
            .await
            .map_err(|e| WebhookError::Store(e.to_string()))?;

        info!(org = %org_id, %plan, amount, event_id = %event.id, "checkout applied");
        Ok(WebhookDisposition::Applied { org_id, plan })
    }

    /// `customer.subscription.deleted`: regress the owning organization
    /// to `free`, keeping its customer reference on file.
    async fn apply_cancellation(
        &self,
        event: &BillingEvent,
    ) -> Result<WebhookDisposition, WebhookError> {
        let cancelled: CancelledSubscription = event
            .deserialize_object()
            .map_err(|e| WebhookError::ParseError(e.to_string()))?;

        let mut subscription = self
            .subscriptions
            .find_by_customer(&cancelled.customer)
            .await
            .map_err(|e| WebhookError::Store(e.to_string()))?
            .ok_or_else(|| {
                WebhookError::OrgNotResolved(format!(
                    "no subscription for customer {}",
                    cancelled.customer
                ))
            })?;
        subscription.apply_cancellation();

        self.subscriptions
            .upsert(&subscription)
            .await
            .map_err(|e| WebhookError::Store(e.to_string()))?;

        info!(org = %subscription.org_id, event_id = %event.id, "subscription cancelled");
        Ok(WebhookDisposition::Applied {
            org_id: subscription.org_id,
            plan: PlanTier::Free,
        })
    }

    /// Attributes a checkout to an organization.
    ///
    /// Prefers the explicit reference our checkout flow attached; falls
    /// back to matching the paying customer's email against known
    /// users. The fallback is a best-effort identity bridge, not a
    /// security boundary.
    async fn resolve_org(&self, session: &CheckoutSession) -> Result<OrgId, WebhookError> {
        if let Some(reference) = &session.client_reference_id {
            return reference.parse().map_err(|_| {
                WebhookError::ParseError(format!("client_reference_id is not an org id: {reference}"))
            });
        }

        let email = session
            .customer_details
            .as_ref()
            .and_then(|d| d.email.as_deref())
            .ok_or(WebhookError::MissingField("client_reference_id or customer email"))?;

        warn!("checkout carried no org reference, matching by customer email");
        self.subscriptions
            .find_org_by_owner_email(email)
            .await
            .map_err(|e| WebhookError::Store(e.to_string()))?
            .ok_or_else(|| WebhookError::OrgNotResolved(format!("no user with email {email}")))
    }
}
