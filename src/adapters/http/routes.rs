//! Axum router for the service.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::handlers::{billing_webhook, health, run_drafts, run_sync, AppState};

/// Job trigger endpoints, meant to be called by the scheduler.
pub fn job_routes() -> Router<AppState> {
    Router::new()
        .route("/sync", post(run_sync))
        .route("/drafts", post(run_drafts))
}

/// Webhook endpoints. No user authentication; deliveries are verified
/// by signature inside the handler.
pub fn webhook_routes() -> Router<AppState> {
    Router::new().route("/billing", post(billing_webhook))
}

/// The complete application router.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/jobs", job_routes())
        .nest("/api/webhooks", webhook_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
