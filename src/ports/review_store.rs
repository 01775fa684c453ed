//! Review item store port.

use async_trait::async_trait;

use crate::domain::foundation::ReviewId;
use crate::domain::review::ReviewItem;

use super::store_error::StoreError;

/// A pending item joined with its organization's reply tone setting.
#[derive(Debug, Clone)]
pub struct PendingReview {
    pub item: ReviewItem,
    /// Organization's configured reply tone; `None` falls back to the
    /// processor default.
    pub tone: Option<String>,
}

/// Persistence contract for review items.
#[async_trait]
pub trait ReviewItemStore: Send + Sync {
    /// Upserts imported items keyed by `(location_id, external_id)`.
    ///
    /// Re-importing an already known review is a no-op, so repeated sync
    /// runs never duplicate items or reset their status. Returns the
    /// number of newly inserted items.
    async fn upsert_imported(&self, items: &[ReviewItem]) -> Result<usize, StoreError>;

    /// Selects up to `limit` pending items, oldest first, joined with
    /// their organization's tone configuration.
    ///
    /// Selection is one atomic ordered read. The deployment runs at most
    /// one draft batch at a time; overlapping runs would need a claim
    /// step before this contract is safe for concurrent callers.
    async fn list_pending(&self, limit: usize) -> Result<Vec<PendingReview>, StoreError>;

    /// Persists a status transition (status plus optional reply payload).
    async fn persist_transition(&self, item: &ReviewItem) -> Result<(), StoreError>;

    /// Loads a single item. Read-model helper, used by tests and the
    /// operational surface.
    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<ReviewItem>, StoreError>;
}
