//! Webhook failure taxonomy with HTTP status mapping.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors raised while verifying or applying a billing webhook.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Signature verification failed against the raw body.
    #[error("invalid signature")]
    InvalidSignature,

    /// Signature timestamp is outside the replay window.
    #[error("timestamp out of range")]
    TimestampOutOfRange,

    /// Signature timestamp is in the future beyond clock-skew tolerance.
    #[error("invalid timestamp")]
    InvalidTimestamp,

    /// Signature header or JSON payload could not be parsed.
    #[error("parse error: {0}")]
    ParseError(String),

    /// A field this event type requires was absent from the payload.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// The event could not be attributed to a known organization.
    #[error("organization not resolved: {0}")]
    OrgNotResolved(String),

    /// Subscription state could not be read or written.
    #[error("store error: {0}")]
    Store(String),
}

impl WebhookError {
    /// HTTP status the endpoint answers with.
    ///
    /// 4xx responses tell the provider not to retry; 5xx responses
    /// trigger redelivery, which the idempotent transitions absorb.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::InvalidSignature | WebhookError::TimestampOutOfRange => {
                StatusCode::UNAUTHORIZED
            }
            WebhookError::InvalidTimestamp
            | WebhookError::ParseError(_)
            | WebhookError::MissingField(_) => StatusCode::BAD_REQUEST,
            WebhookError::OrgNotResolved(_) | WebhookError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
