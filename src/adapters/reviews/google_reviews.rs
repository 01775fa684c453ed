//! Google Business Profile review source.
//!
//! Lists reviews for a location via the account-management reviews
//! endpoint, following page tokens until exhausted. The API has no
//! server-side time filter, so the `since` cut is applied here after
//! decoding.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use crate::domain::sync::{SyncError, SyncTarget};
use crate::ports::{ReviewSource, SourceReview};

/// Review source backed by the Google Business Profile API.
pub struct GoogleReviewSource {
    client: Client,
    base_url: String,
}

impl GoogleReviewSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SyncError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SyncError::Provider(format!("http client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn reviews_url(&self, target: &SyncTarget, page_token: Option<&str>) -> String {
        let mut url = format!("{}/v4/{}/reviews", self.base_url, target.external_ref);
        if let Some(token) = page_token {
            url.push_str("?pageToken=");
            url.push_str(token);
        }
        url
    }

    async fn fetch_page(
        &self,
        target: &SyncTarget,
        page_token: Option<&str>,
    ) -> Result<ReviewPage, SyncError> {
        let response = self
            .client
            .get(self.reviews_url(target, page_token))
            .header("Authorization", format!("Bearer {}", target.credential))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SyncError::Provider("request timed out".to_string())
                } else {
                    SyncError::Provider(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::Auth(format!("status {status}: {body}")));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::Provider(format!("status {status}: {body}")));
        }

        response
            .json::<ReviewPage>()
            .await
            .map_err(|e| SyncError::Provider(format!("response body: {e}")))
    }
}

#[async_trait]
impl ReviewSource for GoogleReviewSource {
    async fn fetch_reviews(
        &self,
        target: &SyncTarget,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<SourceReview>, SyncError> {
        let mut reviews = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self.fetch_page(target, page_token.as_deref()).await?;

            for raw in page.reviews {
                let posted_at = raw.create_time;
                if since.is_some_and(|cut| posted_at <= cut) {
                    continue;
                }
                reviews.push(SourceReview {
                    external_id: raw.review_id,
                    author: raw.reviewer.and_then(|r| r.display_name),
                    text: raw.comment.unwrap_or_default(),
                    rating: raw.star_rating.as_i16(),
                    posted_at,
                });
            }

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(reviews)
    }
}

// ----- Google API types -----

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewPage {
    #[serde(default)]
    reviews: Vec<RawReview>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReview {
    review_id: String,
    reviewer: Option<RawReviewer>,
    comment: Option<String>,
    star_rating: StarRating,
    create_time: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReviewer {
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum StarRating {
    One,
    Two,
    Three,
    Four,
    Five,
}

impl StarRating {
    fn as_i16(&self) -> i16 {
        match self {
            StarRating::One => 1,
            StarRating::Two => 2,
            StarRating::Three => 3,
            StarRating::Four => 4,
            StarRating::Five => 5,
        }
    }
}
