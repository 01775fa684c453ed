//! External review source port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::sync::{SyncError, SyncTarget};

/// One review as the external platform reports it, before it becomes a
/// local `ReviewItem`.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceReview {
    /// Platform-assigned review identifier; the idempotent import key.
    pub external_id: String,
    pub author: Option<String>,
    pub text: String,
    /// Star rating, 1 through 5.
    pub rating: i16,
    pub posted_at: DateTime<Utc>,
}

/// Port for the external review/places provider.
///
/// One authenticated, credential-scoped list call per target. The
/// implementation owns the transport timeout; callers additionally
/// bound the whole call so one unresponsive target cannot stall a
/// fan-out batch.
#[async_trait]
pub trait ReviewSource: Send + Sync {
    /// Fetches reviews for the target posted after `since` (all reviews
    /// when `since` is `None`).
    async fn fetch_reviews(
        &self,
        target: &SyncTarget,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<SourceReview>, SyncError>;
}
