//! Sync target store port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::foundation::LocationId;
use crate::domain::sync::SyncTarget;

use super::store_error::StoreError;

/// Read access to the set of locations eligible for synchronization.
#[async_trait]
pub trait SyncTargetStore: Send + Sync {
    /// Returns the ordered candidate set: every location whose
    /// organization holds a non-null provider credential and which has a
    /// non-null external reference.
    ///
    /// A failure here is fatal to the orchestrator run; with no targets
    /// there is nothing to fan out to.
    async fn list_targets(&self) -> Result<Vec<SyncTarget>, StoreError>;

    /// Records a successful sync so the next run only fetches newer
    /// reviews.
    async fn mark_synced(
        &self,
        location_id: &LocationId,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError>;
}
