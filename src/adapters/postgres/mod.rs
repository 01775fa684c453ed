//! PostgreSQL persistence adapters.

mod review_item_store;
mod subscription_store;
mod sync_target_store;

pub use review_item_store::PostgresReviewItemStore;
pub use subscription_store::PostgresSubscriptionStore;
pub use sync_target_store::PostgresSyncTargetStore;
