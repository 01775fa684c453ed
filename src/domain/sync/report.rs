//! Per-run sync reports.
//!
//! The orchestrator never throws past a target boundary; each target's
//! attempt is folded into a tagged [`SyncOutcome`] and collected here.
//! Reports are ephemeral: returned to the caller, never persisted.

use serde::Serialize;

use crate::domain::foundation::LocationId;

use super::errors::SyncError;

/// Outcome of one target's sync attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum SyncOutcome {
    /// The target synced; `imported` new items were upserted.
    Success { imported: usize },
    /// The attempt failed; `detail` carries the failure description.
    Error { detail: String },
}

/// One entry per target per orchestrator run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReportEntry {
    pub location_id: LocationId,
    #[serde(flatten)]
    pub outcome: SyncOutcome,
}

impl SyncReportEntry {
    /// Entry for a successful sync.
    pub fn success(location_id: LocationId, imported: usize) -> Self {
        Self {
            location_id,
            outcome: SyncOutcome::Success { imported },
        }
    }

    /// Entry for a failed sync.
    pub fn error(location_id: LocationId, err: &SyncError) -> Self {
        Self {
            location_id,
            outcome: SyncOutcome::Error {
                detail: err.to_string(),
            },
        }
    }

    /// Returns true if this entry records a successful attempt.
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, SyncOutcome::Success { .. })
    }
}

/// Aggregate result of one fan-out run.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    /// Number of targets enumerated for this run.
    pub target_count: usize,
    /// One entry per target, in enumeration order.
    pub entries: Vec<SyncReportEntry>,
}

impl SyncReport {
    /// Total items imported across all successful targets.
    pub fn total_imported(&self) -> usize {
        self.entries
            .iter()
            .map(|e| match e.outcome {
                SyncOutcome::Success { imported } => imported,
                SyncOutcome::Error { .. } => 0,
            })
            .sum()
    }

    /// Number of targets that failed this run.
    pub fn failure_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.is_success()).count()
    }
}
