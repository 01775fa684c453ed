//! PostgreSQL implementation of SyncTargetStore.
//!
//! Targets are derived, not stored: a location becomes a target when it
//! carries an external reference and its organization holds a provider
//! credential.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use crate::domain::foundation::{LocationId, OrgId};
use crate::domain::sync::SyncTarget;
use crate::ports::{StoreError, SyncTargetStore};

/// PostgreSQL-backed sync target store.
#[derive(Clone)]
pub struct PostgresSyncTargetStore {
    pool: PgPool,
}

impl PostgresSyncTargetStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SyncTargetStore for PostgresSyncTargetStore {
    async fn list_targets(&self) -> Result<Vec<SyncTarget>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT l.id AS location_id, l.org_id, l.external_ref,
                   l.last_synced_at, o.sync_credential
            FROM locations l
            JOIN organizations o ON o.id = l.org_id
            WHERE l.external_ref IS NOT NULL
              AND o.sync_credential IS NOT NULL
            ORDER BY l.created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::database)?;

        rows.into_iter()
            .map(|row| {
                Ok(SyncTarget {
                    location_id: LocationId::from_uuid(
                        row.try_get("location_id").map_err(StoreError::database)?,
                    ),
                    org_id: OrgId::from_uuid(row.try_get("org_id").map_err(StoreError::database)?),
                    external_ref: row.try_get("external_ref").map_err(StoreError::database)?,
                    credential: row
                        .try_get("sync_credential")
                        .map_err(StoreError::database)?,
                    last_synced_at: row
                        .try_get("last_synced_at")
                        .map_err(StoreError::database)?,
                })
            })
            .collect()
    }

    async fn mark_synced(
        &self,
        location_id: &LocationId,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        sqlx::query("UPDATE locations SET last_synced_at = $2 WHERE id = $1")
            .bind(location_id.as_uuid())
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(StoreError::database)?;
        Ok(())
    }
}
