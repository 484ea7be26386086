use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;
use vs_core::error::Result;
use vs_core::models::Subscription;
use vs_core::traits::SubscriptionRepo;

use crate::{db_error, SqliteStore};

const SUBSCRIPTION_COLUMNS: &str = "id, subscriber_id, channel_id, created_at";

fn subscription_from_row(row: &SqliteRow) -> std::result::Result<Subscription, sqlx::Error> {
    Ok(Subscription {
        id: row.try_get("id")?,
        subscriber_id: row.try_get("subscriber_id")?,
        channel_id: row.try_get("channel_id")?,
        created_at: row.try_get("created_at")?,
    })
}

impl SqliteStore {
    async fn subscriptions_where(&self, column: &str, id: Uuid) -> Result<Vec<Subscription>> {
        let rows = sqlx::query(&format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions WHERE {column} = ? ORDER BY rowid"
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        rows.iter()
            .map(subscription_from_row)
            .collect::<std::result::Result<_, _>>()
            .map_err(db_error)
    }
}

#[async_trait]
impl SubscriptionRepo for SqliteStore {
    async fn find_subscription(
        &self,
        subscriber_id: Uuid,
        channel_id: Uuid,
    ) -> Result<Option<Subscription>> {
        let row = sqlx::query(&format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions WHERE subscriber_id = ? AND channel_id = ?"
        ))
        .bind(subscriber_id)
        .bind(channel_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        row.map(|row| subscription_from_row(&row))
            .transpose()
            .map_err(db_error)
    }

    async fn insert_subscription(&self, subscription: Subscription) -> Result<Subscription> {
        sqlx::query(&format!(
            "INSERT INTO subscriptions ({SUBSCRIPTION_COLUMNS}) VALUES (?, ?, ?, ?)"
        ))
        .bind(subscription.id)
        .bind(subscription.subscriber_id)
        .bind(subscription.channel_id)
        .bind(subscription.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(subscription)
    }

    async fn delete_subscription(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM subscriptions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn subscribers_of(&self, channel_id: Uuid) -> Result<Vec<Subscription>> {
        self.subscriptions_where("channel_id", channel_id).await
    }

    async fn subscriptions_of(&self, subscriber_id: Uuid) -> Result<Vec<Subscription>> {
        self.subscriptions_where("subscriber_id", subscriber_id).await
    }

    async fn count_subscribers(&self, channel_id: Uuid) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM subscriptions WHERE channel_id = ?")
            .bind(channel_id)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)
    }
}
