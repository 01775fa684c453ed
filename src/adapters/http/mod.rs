//! HTTP adapter: REST surface for job triggers and webhooks.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::app_router;
