//! Subscription store port.

use async_trait::async_trait;

use crate::domain::billing::Subscription;
use crate::domain::foundation::OrgId;

use super::store_error::StoreError;

/// Persistence contract for per-organization subscription state.
///
/// The webhook consumer is the only writer; `upsert` must be atomic per
/// row since overlapping webhook deliveries are serialized only through
/// the store.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Loads the subscription for an organization, if any exists.
    async fn find_by_org(&self, org_id: &OrgId) -> Result<Option<Subscription>, StoreError>;

    /// Resolves the organization holding this billing customer
    /// reference.
    async fn find_by_customer(
        &self,
        customer_id: &str,
    ) -> Result<Option<Subscription>, StoreError>;

    /// Best-effort identity bridge: resolves an organization by the
    /// email of one of its users. Used only when a checkout event
    /// carries no explicit organization reference.
    async fn find_org_by_owner_email(&self, email: &str) -> Result<Option<OrgId>, StoreError>;

    /// Writes the subscription state, keyed by organization.
    async fn upsert(&self, subscription: &Subscription) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscription_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn SubscriptionStore) {}
    }
}
