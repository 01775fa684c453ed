//! Draft provider port.

use async_trait::async_trait;
use thiserror::Error;

/// Failure of a reply generation call.
///
/// The caller treats any variant as terminal for the item in that run;
/// there is no retry inside or around the provider.
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    /// The provider was unreachable or answered with a server error.
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// The provider refused the request on quota or rate grounds.
    #[error("quota exhausted: {0}")]
    Quota(String),

    /// The provider answered, but not with usable text.
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Structured context for one reply generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftRequest {
    /// The customer's review text.
    pub review_text: String,
    /// Star rating, 1 through 5; steers apology vs. thanks.
    pub rating: i16,
    /// Requested voice, e.g. "professional" or "friendly".
    pub tone: String,
}

/// Generated reply text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftResponse {
    pub text: String,
}

/// Port for the AI text-generation provider.
///
/// Text in, text out; single call per item, no streaming.
#[async_trait]
pub trait DraftProvider: Send + Sync {
    /// Generates a suggested reply for the given review context.
    async fn draft(&self, request: &DraftRequest) -> Result<DraftResponse, GenerationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_provider_is_object_safe() {
        fn _accepts_dyn(_provider: &dyn DraftProvider) {}
    }

    #[test]
    fn generation_errors_display_their_detail() {
        assert_eq!(
            GenerationError::Quota("monthly cap".to_string()).to_string(),
            "quota exhausted: monthly cap"
        );
    }
}
