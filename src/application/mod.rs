//! Application layer: the three externally-triggered entry points.
//!
//! Each service is independent; they share only the store ports and the
//! plan classification guard. Overlap between them is serialized through
//! per-row store semantics, never in-process locks.

mod billing_webhook;
mod draft_processor;
mod sync_orchestrator;

pub use billing_webhook::{BillingWebhookService, WebhookDisposition};
pub use draft_processor::{DraftOutcome, DraftOutcomeKind, DraftProcessor, DEFAULT_TONE};
pub use sync_orchestrator::{SyncOrchestrator, DEFAULT_CALL_TIMEOUT};
