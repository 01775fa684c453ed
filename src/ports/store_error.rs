//! Shared persistence error.

use thiserror::Error;

/// Failure of a store operation.
///
/// Store errors are isolated per item or per target wherever the caller
/// has a unit boundary to isolate to; only enumeration failure aborts a
/// whole orchestrator run.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The underlying database rejected the operation.
    #[error("database error: {0}")]
    Database(String),
}

impl StoreError {
    /// Wraps a sqlx error, keeping only the display form.
    pub fn database(err: impl std::fmt::Display) -> Self {
        StoreError::Database(err.to_string())
    }
}
