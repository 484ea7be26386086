use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;
use vs_core::error::Result;
use vs_core::models::Tweet;
use vs_core::traits::TweetRepo;

use crate::{db_error, ensure_affected, SqliteStore};

const TWEET_COLUMNS: &str = "id, owner_id, content, created_at, updated_at";

fn tweet_from_row(row: &SqliteRow) -> std::result::Result<Tweet, sqlx::Error> {
    Ok(Tweet {
        id: row.try_get("id")?,
        owner_id: row.try_get("owner_id")?,
        content: row.try_get("content")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl TweetRepo for SqliteStore {
    async fn get_tweet(&self, id: Uuid) -> Result<Option<Tweet>> {
        let row = sqlx::query(&format!("SELECT {TWEET_COLUMNS} FROM tweets WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;
        row.map(|row| tweet_from_row(&row)).transpose().map_err(db_error)
    }

    async fn create_tweet(&self, tweet: Tweet) -> Result<Tweet> {
        sqlx::query(&format!("INSERT INTO tweets ({TWEET_COLUMNS}) VALUES (?, ?, ?, ?, ?)"))
            .bind(tweet.id)
            .bind(tweet.owner_id)
            .bind(&tweet.content)
            .bind(tweet.created_at)
            .bind(tweet.updated_at)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(tweet)
    }

    async fn update_tweet(&self, tweet: Tweet) -> Result<Tweet> {
        let result = sqlx::query("UPDATE tweets SET content = ?, updated_at = ? WHERE id = ?")
            .bind(&tweet.content)
            .bind(tweet.updated_at)
            .bind(tweet.id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        ensure_affected(result.rows_affected(), "Tweet not found")?;
        Ok(tweet)
    }

    async fn delete_tweet(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM tweets WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        ensure_affected(result.rows_affected(), "Tweet not found")
    }

    async fn tweets_by_owner(&self, owner_id: Uuid) -> Result<Vec<Tweet>> {
        let rows = sqlx::query(&format!(
            "SELECT {TWEET_COLUMNS} FROM tweets WHERE owner_id = ? ORDER BY rowid"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        rows.iter()
            .map(tweet_from_row)
            .collect::<std::result::Result<_, _>>()
            .map_err(db_error)
    }
}
