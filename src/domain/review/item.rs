//! Review items and their drafting state machine.
//!
//! A `ReviewItem` enters the system in `Pending` status when the sync
//! pipeline imports it from the external review platform. The draft
//! processor moves it to exactly one terminal status per attempt:
//! `Draft` when a reply was generated, `Error` when generation or
//! persistence failed. Terminal items are never reselected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::foundation::{LocationId, OrgId, ReviewId};

/// Ratings at or below this value require manual approval of the
/// generated reply before it can be published.
pub const LOW_RATING_THRESHOLD: i16 = 2;

/// Drafting status of a review item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    /// Awaiting reply generation. The only re-enterable status.
    Pending,
    /// A reply draft was generated. Terminal.
    Draft,
    /// A drafting attempt failed. Terminal.
    Error,
}

impl ReviewStatus {
    /// Returns true if the item will never be picked up by the draft
    /// processor again.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ReviewStatus::Pending)
    }

    /// Status as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::Draft => "draft",
            ReviewStatus::Error => "error",
        }
    }

    /// Parses a stored status value.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ReviewStatus::Pending),
            "draft" => Some(ReviewStatus::Draft),
            "error" => Some(ReviewStatus::Error),
            _ => None,
        }
    }
}

/// Generated reply payload attached to a drafted item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftReply {
    /// The suggested reply text.
    pub text: String,
    /// When the reply was generated.
    pub generated_at: DateTime<Utc>,
    /// True when the originating rating is at or below
    /// [`LOW_RATING_THRESHOLD`] and a human must approve before sending.
    pub requires_approval: bool,
}

/// Errors raised by review item state transitions.
#[derive(Debug, Clone, Error)]
pub enum ReviewError {
    /// The item is not in a status that permits the requested transition.
    #[error("invalid transition from '{from}': {reason}")]
    InvalidTransition { from: &'static str, reason: String },
}

/// One unit of customer feedback imported from the external platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewItem {
    pub id: ReviewId,
    pub org_id: OrgId,
    pub location_id: LocationId,
    /// Identifier the external platform assigned to this review.
    /// Imports upsert on this key, so re-syncing never duplicates items.
    pub external_id: String,
    /// Display name of the reviewer, when the platform provides one.
    pub author: Option<String>,
    pub text: String,
    /// Star rating, 1 through 5.
    pub rating: i16,
    pub status: ReviewStatus,
    pub reply: Option<DraftReply>,
    pub created_at: DateTime<Utc>,
}

impl ReviewItem {
    /// Creates a freshly imported item in `Pending` status.
    pub fn imported(
        org_id: OrgId,
        location_id: LocationId,
        external_id: impl Into<String>,
        author: Option<String>,
        text: impl Into<String>,
        rating: i16,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ReviewId::new(),
            org_id,
            location_id,
            external_id: external_id.into(),
            author,
            text: text.into(),
            rating,
            status: ReviewStatus::Pending,
            reply: None,
            created_at,
        }
    }

    /// Returns true if the generated reply needs manual approval.
    pub fn needs_manual_approval(&self) -> bool {
        self.rating <= LOW_RATING_THRESHOLD
    }

    /// Transitions `Pending -> Draft`, attaching the generated reply.
    ///
    /// The approval flag is derived from the rating, never supplied by
    /// the caller.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if the item is not `Pending`.
    pub fn complete_draft(
        &mut self,
        reply_text: impl Into<String>,
        generated_at: DateTime<Utc>,
    ) -> Result<(), ReviewError> {
        if self.status != ReviewStatus::Pending {
            return Err(ReviewError::InvalidTransition {
                from: self.status.as_str(),
                reason: "only pending items can be drafted".to_string(),
            });
        }
        self.reply = Some(DraftReply {
            text: reply_text.into(),
            generated_at,
            requires_approval: self.needs_manual_approval(),
        });
        self.status = ReviewStatus::Draft;
        Ok(())
    }

    /// Transitions `Pending -> Error` after a failed drafting attempt.
    ///
    /// The item is never reset to `Pending`; a failed attempt is terminal
    /// so a permanently failing item cannot be reprocessed forever.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if the item is not `Pending`.
    pub fn fail_draft(&mut self) -> Result<(), ReviewError> {
        if self.status != ReviewStatus::Pending {
            return Err(ReviewError::InvalidTransition {
                from: self.status.as_str(),
                reason: "only pending items can fail drafting".to_string(),
            });
        }
        self.status = ReviewStatus::Error;
        Ok(())
    }
}
