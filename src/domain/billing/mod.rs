//! Billing domain module.
//!
//! Plan tiers and classification, per-organization subscription state,
//! and the signed webhook event machinery.

mod event;
mod plan;
mod subscription;
mod webhook_errors;
mod webhook_verifier;

pub use event::{
    BillingEvent, BillingEventData, BillingEventType, CancelledSubscription, CheckoutSession,
    CustomerDetails,
};
#[cfg(test)]
pub use event::BillingEventBuilder;
pub use plan::{classify_plan, PlanThresholds, PlanTier};
pub use subscription::Subscription;
pub use webhook_errors::WebhookError;
pub use webhook_verifier::{sign_payload, SignatureHeader, WebhookVerifier};
