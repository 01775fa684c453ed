//! OpenAI implementation of the draft provider.
//!
//! Single non-streaming chat completion per review. The prompt steers
//! the model with the organization's configured tone and the review's
//! star rating.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ports::{DraftProvider, DraftRequest, DraftResponse, GenerationError};

/// Configuration for the OpenAI draft provider.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    api_key: Secret<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl OpenAiConfig {
    pub fn new(api_key: Secret<String>) -> Self {
        Self {
            api_key,
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Draft provider backed by the OpenAI chat completions API.
pub struct OpenAiDraftProvider {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiDraftProvider {
    pub fn new(config: OpenAiConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::Unavailable(format!("http client: {e}")))?;
        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.config.base_url)
    }

    fn to_chat_request(&self, request: &DraftRequest) -> ChatRequest {
        let system = format!(
            "You write replies to customer reviews on behalf of a local \
             business. Write in a {} tone. Keep the reply under 120 words, \
             address the customer directly, and do not invent specifics \
             the review does not mention. The review below was rated {} \
             out of 5 stars{}.",
            request.tone,
            request.rating,
            if request.rating <= 2 {
                "; acknowledge the problem and offer to make it right"
            } else {
                "; thank the customer for their feedback"
            },
        );

        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system,
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: request.review_text.clone(),
                },
            ],
        }
    }

    async fn handle_response_status(&self, response: Response) -> Result<Response, GenerationError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::TOO_MANY_REQUESTS => Err(GenerationError::Quota(body)),
            s if s.is_server_error() => Err(GenerationError::Unavailable(format!(
                "server error {s}: {body}"
            ))),
            s => Err(GenerationError::Unavailable(format!(
                "unexpected status {s}: {body}"
            ))),
        }
    }
}

#[async_trait]
impl DraftProvider for OpenAiDraftProvider {
    async fn draft(&self, request: &DraftRequest) -> Result<DraftResponse, GenerationError> {
        let response = self
            .client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .json(&self.to_chat_request(request))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Unavailable(format!(
                        "no response within {}s",
                        self.config.timeout.as_secs()
                    ))
                } else {
                    GenerationError::Unavailable(e.to_string())
                }
            })?;

        let response = self.handle_response_status(response).await?;

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Malformed(format!("response body: {e}")))?;

        let text = chat
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| GenerationError::Malformed("no completion text".to_string()))?;

        Ok(DraftResponse { text })
    }
}

// ----- OpenAI API types -----

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}
