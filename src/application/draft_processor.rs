//! Draft batch processor.
//!
//! One scheduled run selects a bounded batch of pending review items,
//! oldest first across all organizations, and drives each through the
//! drafting state machine. Each item yields exactly one outcome; a
//! generation or persistence failure is that item's outcome, never the
//! batch's.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::domain::foundation::ReviewId;
use crate::domain::review::ReviewItem;
use crate::ports::{DraftProvider, DraftRequest, ReviewItemStore, StoreError};

/// Tone used when an organization has not configured one.
pub const DEFAULT_TONE: &str = "professional";

/// Outcome of one item's drafting attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum DraftOutcomeKind {
    /// The item moved to `draft` with a generated reply attached.
    Drafted { requires_approval: bool },
    /// The item moved to `error`; `detail` carries the failure.
    Failed { detail: String },
}

/// One entry per selected item per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DraftOutcome {
    pub review_id: ReviewId,
    #[serde(flatten)]
    pub kind: DraftOutcomeKind,
}

/// Drives pending review items through `pending -> draft | error`.
pub struct DraftProcessor {
    reviews: Arc<dyn ReviewItemStore>,
    provider: Arc<dyn DraftProvider>,
}

impl DraftProcessor {
    pub fn new(reviews: Arc<dyn ReviewItemStore>, provider: Arc<dyn DraftProvider>) -> Self {
        Self { reviews, provider }
    }

    /// Runs one batch of at most `limit` items.
    ///
    /// Returns one outcome per selected item; no item is silently
    /// dropped. Items that end in `error` are excluded from all future
    /// selections.
    ///
    /// # Errors
    ///
    /// Only batch selection failure is fatal; with no batch there is
    /// nothing to isolate per item.
    pub async fn run(&self, limit: usize) -> Result<Vec<DraftOutcome>, StoreError> {
        let batch = self.reviews.list_pending(limit).await?;
        info!(batch_size = batch.len(), limit, "starting draft batch");

        let mut outcomes = Vec::with_capacity(batch.len());
        for pending in batch {
            let mut item = pending.item;
            let kind = self.process_item(&mut item, pending.tone).await;
            outcomes.push(DraftOutcome {
                review_id: item.id,
                kind,
            });
        }
        Ok(outcomes)
    }

    /// Processes one item: at most one status transition per attempt.
    async fn process_item(&self, item: &mut ReviewItem, tone: Option<String>) -> DraftOutcomeKind {
        let request = DraftRequest {
            review_text: item.text.clone(),
            rating: item.rating,
            tone: tone.unwrap_or_else(|| DEFAULT_TONE.to_string()),
        };

        match self.provider.draft(&request).await {
            Ok(response) => match item.complete_draft(response.text, Utc::now()) {
                Ok(()) => match self.reviews.persist_transition(item).await {
                    Ok(()) => {
                        let requires_approval = item.needs_manual_approval();
                        info!(review = %item.id, requires_approval, "reply drafted");
                        DraftOutcomeKind::Drafted { requires_approval }
                    }
                    Err(err) => {
                        warn!(review = %item.id, error = %err, "draft not persisted");
                        DraftOutcomeKind::Failed {
                            detail: format!("draft generated but not persisted: {err}"),
                        }
                    }
                },
                // Selection only returns pending items; a non-pending item
                // here means the batch raced another writer.
                Err(err) => DraftOutcomeKind::Failed {
                    detail: err.to_string(),
                },
            },
            Err(gen_err) => {
                warn!(review = %item.id, error = %gen_err, "reply generation failed");
                let detail = match item.fail_draft() {
                    Ok(()) => match self.reviews.persist_transition(item).await {
                        Ok(()) => gen_err.to_string(),
                        Err(store_err) => {
                            format!("{gen_err}; error status not persisted: {store_err}")
                        }
                    },
                    Err(transition_err) => transition_err.to_string(),
                };
                DraftOutcomeKind::Failed { detail }
            }
        }
    }
}
