//! Sync domain module.
//!
//! Targets, per-run reports, and the sync failure taxonomy.

mod errors;
mod report;
mod target;

pub use errors::SyncError;
pub use report::{SyncOutcome, SyncReport, SyncReportEntry};
pub use target::SyncTarget;
