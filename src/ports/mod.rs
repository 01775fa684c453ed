//! Ports - interfaces for external collaborators.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the application core and the outside world; adapters implement them.
//!
//! - Store ports: `ReviewItemStore`, `SyncTargetStore`,
//!   `SubscriptionStore` over the shared relational store.
//! - Provider ports: `ReviewSource` (external review platform),
//!   `DraftProvider` (AI text generation).

mod draft_provider;
mod review_source;
mod review_store;
mod store_error;
mod subscription_store;
mod sync_target_store;

pub use draft_provider::{DraftProvider, DraftRequest, DraftResponse, GenerationError};
pub use review_source::{ReviewSource, SourceReview};
pub use review_store::{PendingReview, ReviewItemStore};
pub use store_error::StoreError;
pub use subscription_store::SubscriptionStore;
pub use sync_target_store::SyncTargetStore;
