//! PostgreSQL implementation of SubscriptionStore.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::billing::{PlanTier, Subscription};
use crate::domain::foundation::OrgId;
use crate::ports::{StoreError, SubscriptionStore};

/// PostgreSQL-backed subscription store.
#[derive(Clone)]
pub struct PostgresSubscriptionStore {
    pool: PgPool,
}

impl PostgresSubscriptionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionStore for PostgresSubscriptionStore {
    async fn find_by_org(&self, org_id: &OrgId) -> Result<Option<Subscription>, StoreError> {
        let row = sqlx::query(
            "SELECT org_id, billing_customer_id, plan FROM subscriptions WHERE org_id = $1",
        )
        .bind(org_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::database)?;

        row.map(|row| row_to_subscription(&row)).transpose()
    }

    async fn find_by_customer(
        &self,
        customer_id: &str,
    ) -> Result<Option<Subscription>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT org_id, billing_customer_id, plan
            FROM subscriptions
            WHERE billing_customer_id = $1
            "#,
        )
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::database)?;

        row.map(|row| row_to_subscription(&row)).transpose()
    }

    async fn find_org_by_owner_email(&self, email: &str) -> Result<Option<OrgId>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT org_id
            FROM org_users
            WHERE lower(email) = lower($1)
            ORDER BY created_at ASC
            LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::database)?;

        row.map(|row| {
            Ok(OrgId::from_uuid(
                row.try_get("org_id").map_err(StoreError::database)?,
            ))
        })
        .transpose()
    }

    async fn upsert(&self, subscription: &Subscription) -> Result<(), StoreError> {
        // The customer reference stays sticky at the row level too, so a
        // concurrent writer cannot clear one that is already recorded.
        sqlx::query(
            r#"
            INSERT INTO subscriptions (org_id, billing_customer_id, plan)
            VALUES ($1, $2, $3)
            ON CONFLICT (org_id) DO UPDATE SET
                billing_customer_id = COALESCE(
                    subscriptions.billing_customer_id,
                    EXCLUDED.billing_customer_id
                ),
                plan = EXCLUDED.plan
            "#,
        )
        .bind(subscription.org_id.as_uuid())
        .bind(&subscription.billing_customer_id)
        .bind(subscription.plan.as_str())
        .execute(&self.pool)
        .await
        .map_err(StoreError::database)?;
        Ok(())
    }
}

fn row_to_subscription(row: &sqlx::postgres::PgRow) -> Result<Subscription, StoreError> {
    let plan_str: String = row.try_get("plan").map_err(StoreError::database)?;
    let plan = PlanTier::parse(&plan_str)
        .ok_or_else(|| StoreError::Database(format!("unknown plan tier: {plan_str}")))?;

    Ok(Subscription {
        org_id: OrgId::from_uuid(row.try_get("org_id").map_err(StoreError::database)?),
        billing_customer_id: row
            .try_get("billing_customer_id")
            .map_err(StoreError::database)?,
        plan,
    })
}
