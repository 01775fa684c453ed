//! Sync failure taxonomy.
//!
//! Every variant is isolated to the target it occurred on and is
//! reported, not retried; the next scheduled run picks the target up
//! again. Only enumeration failure (before any fan-out) is fatal to a
//! whole run, and that is a [`StoreError`](crate::ports::StoreError)
//! surfaced by the orchestrator directly.

use thiserror::Error;

/// Failure of one target's sync attempt.
#[derive(Debug, Clone, Error)]
pub enum SyncError {
    /// The organization's provider credential was rejected.
    #[error("credential rejected: {0}")]
    Auth(String),

    /// The provider returned an error or did not answer in time.
    #[error("provider error: {0}")]
    Provider(String),

    /// Imported items could not be persisted.
    #[error("store error: {0}")]
    Store(String),
}
