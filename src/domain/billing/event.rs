//! Billing webhook event envelope.
//!
//! Events arrive signed from the payment provider; only the fields this
//! crate acts on are captured, everything else in the provider's schema
//! is ignored. Events are classified and discarded after application,
//! never stored.

use serde::{Deserialize, Serialize};

/// Signed webhook event from the payment provider.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BillingEvent {
    /// Provider-assigned event identifier.
    pub id: String,

    /// Event type string (e.g. "checkout.session.completed").
    #[serde(rename = "type")]
    pub event_type: String,

    /// Unix timestamp the provider created the event.
    pub created: i64,

    /// Event-specific payload.
    pub data: BillingEventData,

    /// Live mode vs test mode.
    #[serde(default)]
    pub livemode: bool,
}

/// Container for the event-specific object.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BillingEventData {
    /// The object that triggered the event, polymorphic per event type.
    pub object: serde_json::Value,
}

impl BillingEvent {
    /// Classifies the event type string.
    pub fn parsed_type(&self) -> BillingEventType {
        BillingEventType::classify(&self.event_type)
    }

    /// Deserializes the data object as the given payload type.
    pub fn deserialize_object<T: serde::de::DeserializeOwned>(
        &self,
    ) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.data.object.clone())
    }
}

/// Event types this crate transitions state on.
///
/// Everything else classifies as `Unhandled` and is acknowledged without
/// a state transition, keeping the endpoint forward compatible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingEventType {
    /// A checkout session completed and was paid.
    CheckoutCompleted,
    /// The customer's subscription was deleted/cancelled.
    SubscriptionDeleted,
    /// Any other event type.
    Unhandled,
}

impl BillingEventType {
    /// Classifies an event type string.
    pub fn classify(s: &str) -> Self {
        match s {
            "checkout.session.completed" => Self::CheckoutCompleted,
            "customer.subscription.deleted" => Self::SubscriptionDeleted,
            _ => Self::Unhandled,
        }
    }
}

/// Checkout session payload, as carried by `checkout.session.completed`.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    /// Explicit organization reference our checkout flow attached.
    /// Absent when the session was created outside that flow.
    pub client_reference_id: Option<String>,
    /// Billing customer reference created by the provider.
    pub customer: Option<String>,
    /// Amount paid, in cents.
    pub amount_total: Option<i64>,
    /// Details about the paying customer.
    pub customer_details: Option<CustomerDetails>,
}

/// Paying customer details inside a checkout session.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerDetails {
    pub email: Option<String>,
}

/// Subscription payload, as carried by `customer.subscription.deleted`.
#[derive(Debug, Clone, Deserialize)]
pub struct CancelledSubscription {
    /// Billing customer reference the subscription belonged to.
    pub customer: String,
}

/// Builder for test events.
#[cfg(test)]
pub struct BillingEventBuilder {
    id: String,
    event_type: String,
    created: i64,
    object: serde_json::Value,
    livemode: bool,
}

#[cfg(test)]
impl BillingEventBuilder {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            id: "evt_test_1".to_string(),
            event_type: event_type.into(),
            created: chrono::Utc::now().timestamp(),
            object: serde_json::json!({}),
            livemode: false,
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn object(mut self, object: serde_json::Value) -> Self {
        self.object = object;
        self
    }

    pub fn build(self) -> BillingEvent {
        BillingEvent {
            id: self.id,
            event_type: self.event_type,
            created: self.created,
            data: BillingEventData { object: self.object },
            livemode: self.livemode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_minimal_event() {
        let json = r#"{
            "id": "evt_123",
            "type": "checkout.session.completed",
            "created": 1704067200,
            "data": { "object": {} },
            "livemode": false
        }"#;

        let event: BillingEvent = serde_json::from_str(json).unwrap();

        assert_eq!(event.id, "evt_123");
        assert_eq!(event.parsed_type(), BillingEventType::CheckoutCompleted);
        assert!(!event.livemode);
    }

    #[test]
    fn classifies_handled_and_unhandled_types() {
        assert_eq!(
            BillingEventType::classify("checkout.session.completed"),
            BillingEventType::CheckoutCompleted
        );
        assert_eq!(
            BillingEventType::classify("customer.subscription.deleted"),
            BillingEventType::SubscriptionDeleted
        );
        assert_eq!(
            BillingEventType::classify("invoice.payment_failed"),
            BillingEventType::Unhandled
        );
    }

    #[test]
    fn extracts_checkout_session_payload() {
        let event = BillingEventBuilder::new("checkout.session.completed")
            .object(json!({
                "client_reference_id": "7f1e1d3e-0000-0000-0000-000000000001",
                "customer": "cus_abc",
                "amount_total": 7000,
                "customer_details": { "email": "owner@example.com" }
            }))
            .build();

        let session: CheckoutSession = event.deserialize_object().unwrap();

        assert_eq!(session.customer.as_deref(), Some("cus_abc"));
        assert_eq!(session.amount_total, Some(7000));
        assert_eq!(
            session.customer_details.unwrap().email.as_deref(),
            Some("owner@example.com")
        );
    }

    #[test]
    fn extracts_cancelled_subscription_payload() {
        let event = BillingEventBuilder::new("customer.subscription.deleted")
            .object(json!({ "customer": "cus_abc", "status": "canceled" }))
            .build();

        let sub: CancelledSubscription = event.deserialize_object().unwrap();
        assert_eq!(sub.customer, "cus_abc");
    }

    #[test]
    fn payload_extraction_fails_for_wrong_shape() {
        let event = BillingEventBuilder::new("customer.subscription.deleted")
            .object(json!({ "status": "canceled" }))
            .build();

        let result: Result<CancelledSubscription, _> = event.deserialize_object();
        assert!(result.is_err());
    }
}
