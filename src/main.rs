//! Service entrypoint: load configuration, wire adapters, serve HTTP.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use replypilot::adapters::ai::{OpenAiConfig, OpenAiDraftProvider};
use replypilot::adapters::http::{app_router, AppState};
use replypilot::adapters::postgres::{
    PostgresReviewItemStore, PostgresSubscriptionStore, PostgresSyncTargetStore,
};
use replypilot::adapters::reviews::GoogleReviewSource;
use replypilot::application::{BillingWebhookService, DraftProcessor, SyncOrchestrator};
use replypilot::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "replypilot=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;
    config.validate()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    info!("database pool ready");

    let review_store = Arc::new(PostgresReviewItemStore::new(pool.clone()));
    let target_store = Arc::new(PostgresSyncTargetStore::new(pool.clone()));
    let subscription_store = Arc::new(PostgresSubscriptionStore::new(pool));

    let review_source = Arc::new(GoogleReviewSource::new(
        config.sync.base_url.clone(),
        config.sync.call_timeout(),
    )?);

    let ai_key = config
        .ai
        .api_key
        .clone()
        .ok_or("ai.api_key validated but absent")?;
    let draft_provider = Arc::new(OpenAiDraftProvider::new(
        OpenAiConfig::new(ai_key)
            .with_model(&config.ai.model)
            .with_base_url(&config.ai.base_url)
            .with_timeout(std::time::Duration::from_secs(config.ai.timeout_secs)),
    )?);

    let webhook_secret = config
        .billing
        .webhook_secret
        .clone()
        .ok_or("billing.webhook_secret validated but absent")?;

    let state = AppState {
        sync: Arc::new(SyncOrchestrator::new(
            target_store,
            review_store.clone(),
            review_source,
            config.sync.call_timeout(),
        )),
        drafts: Arc::new(DraftProcessor::new(review_store, draft_provider)),
        billing: Arc::new(BillingWebhookService::new(
            webhook_secret,
            subscription_store,
            config.billing.thresholds(),
        )),
    };

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");

    axum::serve(listener, app_router(state)).await?;
    Ok(())
}
