//! PostgreSQL implementation of ReviewItemStore.
//!
//! Expects a `review_items` table with a unique key on
//! `(location_id, external_id)` so imports can upsert idempotently, and
//! an `organizations.reply_tone` column for the pending-batch join.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use crate::domain::foundation::{LocationId, OrgId, ReviewId};
use crate::domain::review::{DraftReply, ReviewItem, ReviewStatus};
use crate::ports::{PendingReview, ReviewItemStore, StoreError};

/// PostgreSQL-backed review item store.
#[derive(Clone)]
pub struct PostgresReviewItemStore {
    pool: PgPool,
}

impl PostgresReviewItemStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewItemStore for PostgresReviewItemStore {
    async fn upsert_imported(&self, items: &[ReviewItem]) -> Result<usize, StoreError> {
        let mut inserted = 0usize;
        for item in items {
            let result = sqlx::query(
                r#"
                INSERT INTO review_items (
                    id, org_id, location_id, external_id, author, body,
                    rating, status, created_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                ON CONFLICT (location_id, external_id) DO NOTHING
                "#,
            )
            .bind(item.id.as_uuid())
            .bind(item.org_id.as_uuid())
            .bind(item.location_id.as_uuid())
            .bind(&item.external_id)
            .bind(&item.author)
            .bind(&item.text)
            .bind(item.rating)
            .bind(item.status.as_str())
            .bind(item.created_at)
            .execute(&self.pool)
            .await
            .map_err(StoreError::database)?;

            inserted += result.rows_affected() as usize;
        }
        Ok(inserted)
    }

    async fn list_pending(&self, limit: usize) -> Result<Vec<PendingReview>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT r.id, r.org_id, r.location_id, r.external_id, r.author,
                   r.body, r.rating, r.status, r.reply_text,
                   r.reply_generated_at, r.reply_requires_approval,
                   r.created_at, o.reply_tone
            FROM review_items r
            JOIN organizations o ON o.id = r.org_id
            WHERE r.status = 'pending'
            ORDER BY r.created_at ASC
            LIMIT $1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::database)?;

        rows.into_iter()
            .map(|row| {
                let tone: Option<String> = row.try_get("reply_tone").map_err(StoreError::database)?;
                Ok(PendingReview {
                    item: row_to_item(&row)?,
                    tone,
                })
            })
            .collect()
    }

    async fn persist_transition(&self, item: &ReviewItem) -> Result<(), StoreError> {
        let reply = item.reply.as_ref();
        let result = sqlx::query(
            r#"
            UPDATE review_items SET
                status = $2,
                reply_text = $3,
                reply_generated_at = $4,
                reply_requires_approval = $5
            WHERE id = $1
            "#,
        )
        .bind(item.id.as_uuid())
        .bind(item.status.as_str())
        .bind(reply.map(|r| r.text.as_str()))
        .bind(reply.map(|r| r.generated_at))
        .bind(reply.map(|r| r.requires_approval))
        .execute(&self.pool)
        .await
        .map_err(StoreError::database)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Database(format!(
                "review item not found: {}",
                item.id
            )));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<ReviewItem>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, org_id, location_id, external_id, author, body,
                   rating, status, reply_text, reply_generated_at,
                   reply_requires_approval, created_at
            FROM review_items
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::database)?;

        row.map(|row| row_to_item(&row)).transpose()
    }
}

fn row_to_item(row: &sqlx::postgres::PgRow) -> Result<ReviewItem, StoreError> {
    let status_str: String = row.try_get("status").map_err(StoreError::database)?;
    let status = ReviewStatus::parse(&status_str)
        .ok_or_else(|| StoreError::Database(format!("unknown review status: {status_str}")))?;

    let reply_text: Option<String> = row.try_get("reply_text").map_err(StoreError::database)?;
    let reply = match reply_text {
        Some(text) => {
            let generated_at: DateTime<Utc> = row
                .try_get("reply_generated_at")
                .map_err(StoreError::database)?;
            let requires_approval: bool = row
                .try_get("reply_requires_approval")
                .map_err(StoreError::database)?;
            Some(DraftReply {
                text,
                generated_at,
                requires_approval,
            })
        }
        None => None,
    };

    Ok(ReviewItem {
        id: ReviewId::from_uuid(row.try_get("id").map_err(StoreError::database)?),
        org_id: OrgId::from_uuid(row.try_get("org_id").map_err(StoreError::database)?),
        location_id: LocationId::from_uuid(
            row.try_get("location_id").map_err(StoreError::database)?,
        ),
        external_id: row.try_get("external_id").map_err(StoreError::database)?,
        author: row.try_get("author").map_err(StoreError::database)?,
        text: row.try_get("body").map_err(StoreError::database)?,
        rating: row.try_get("rating").map_err(StoreError::database)?,
        status,
        reply,
        created_at: row.try_get("created_at").map_err(StoreError::database)?,
    })
}
