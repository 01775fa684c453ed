//! HTTP handlers for job triggers and the billing webhook.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::application::{BillingWebhookService, DraftProcessor, SyncOrchestrator};

use super::dto::{DraftJobQuery, DraftJobResponse, ErrorResponse, SyncJobResponse, WebhookAck};

/// Header carrying the webhook signature, `t=<unix>,v1=<hex>`.
pub const SIGNATURE_HEADER: &str = "billing-signature";

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub sync: Arc<SyncOrchestrator>,
    pub drafts: Arc<DraftProcessor>,
    pub billing: Arc<BillingWebhookService>,
}

/// GET /health
pub async fn health() -> Response {
    (StatusCode::OK, Json(json!({"status": "ok"}))).into_response()
}

/// POST /api/jobs/sync - Run one sync fan-out over all targets.
pub async fn run_sync(State(state): State<AppState>) -> Response {
    match state.sync.run().await {
        Ok(report) => (StatusCode::OK, Json(SyncJobResponse::from(report))).into_response(),
        Err(err) => {
            error!(error = %err, "sync run failed before fan-out");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(err.to_string())),
            )
                .into_response()
        }
    }
}

/// POST /api/jobs/drafts?limit=n - Run one draft batch.
pub async fn run_drafts(
    State(state): State<AppState>,
    Query(query): Query<DraftJobQuery>,
) -> Response {
    match state.drafts.run(query.limit).await {
        Ok(outcomes) => (
            StatusCode::OK,
            Json(DraftJobResponse {
                processed: outcomes.len(),
                outcomes,
            }),
        )
            .into_response(),
        Err(err) => {
            error!(error = %err, "draft batch failed at selection");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(err.to_string())),
            )
                .into_response()
        }
    }
}

/// POST /api/webhooks/billing - Consume one billing event delivery.
///
/// The raw request bytes feed signature verification; any body
/// transformation before the check would break it.
pub async fn billing_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = match headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok()) {
        Some(value) => value,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("missing signature header")),
            )
                .into_response()
        }
    };

    match state.billing.handle(&body, signature).await {
        Ok(disposition) => (
            StatusCode::OK,
            Json(WebhookAck::from_disposition(&disposition)),
        )
            .into_response(),
        Err(err) => (err.status_code(), Json(ErrorResponse::new(err.to_string()))).into_response(),
    }
}
