use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;
use vs_core::error::{AppError, Result};
use vs_core::models::{Like, LikeTarget, LikedVideo};
use vs_core::traits::LikeRepo;

use crate::videos::video_from_row;
use crate::{db_error, SqliteStore};

const LIKE_COLUMNS: &str = "id, liked_by, video_id, comment_id, tweet_id, created_at";

fn target_column(target: LikeTarget) -> (&'static str, Uuid) {
    match target {
        LikeTarget::Video(id) => ("video_id", id),
        LikeTarget::Comment(id) => ("comment_id", id),
        LikeTarget::Tweet(id) => ("tweet_id", id),
    }
}

fn like_from_row(row: &SqliteRow) -> Result<Like> {
    let video: Option<Uuid> = row.try_get("video_id").map_err(db_error)?;
    let comment: Option<Uuid> = row.try_get("comment_id").map_err(db_error)?;
    let tweet: Option<Uuid> = row.try_get("tweet_id").map_err(db_error)?;
    let target = match (video, comment, tweet) {
        (Some(id), None, None) => LikeTarget::Video(id),
        (None, Some(id), None) => LikeTarget::Comment(id),
        (None, None, Some(id)) => LikeTarget::Tweet(id),
        _ => return Err(AppError::internal("like row without a single target")),
    };
    Ok(Like {
        id: row.try_get("id").map_err(db_error)?,
        liked_by: row.try_get("liked_by").map_err(db_error)?,
        target,
        created_at: row.try_get("created_at").map_err(db_error)?,
    })
}

#[async_trait]
impl LikeRepo for SqliteStore {
    async fn find_like(&self, liked_by: Uuid, target: LikeTarget) -> Result<Option<Like>> {
        let (column, target_id) = target_column(target);
        let row = sqlx::query(&format!(
            "SELECT {LIKE_COLUMNS} FROM likes WHERE liked_by = ? AND {column} = ?"
        ))
        .bind(liked_by)
        .bind(target_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        row.map(|row| like_from_row(&row)).transpose()
    }

    async fn insert_like(&self, like: Like) -> Result<Like> {
        let (video_id, comment_id, tweet_id) = match like.target {
            LikeTarget::Video(id) => (Some(id), None, None),
            LikeTarget::Comment(id) => (None, Some(id), None),
            LikeTarget::Tweet(id) => (None, None, Some(id)),
        };
        sqlx::query(&format!("INSERT INTO likes ({LIKE_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?)"))
            .bind(like.id)
            .bind(like.liked_by)
            .bind(video_id)
            .bind(comment_id)
            .bind(tweet_id)
            .bind(like.created_at)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(like)
    }

    async fn delete_like(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM likes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn liked_videos(&self, liked_by: Uuid) -> Result<Vec<LikedVideo>> {
        let rows = sqlx::query(
            "SELECT l.id AS like_id, l.created_at AS liked_at, v.* \
             FROM likes l JOIN videos v ON v.id = l.video_id \
             WHERE l.liked_by = ? ORDER BY l.rowid DESC",
        )
        .bind(liked_by)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        rows.iter()
            .map(|row| {
                Ok(LikedVideo {
                    like_id: row.try_get("like_id")?,
                    liked_at: row.try_get("liked_at")?,
                    video: video_from_row(row)?,
                })
            })
            .collect::<std::result::Result<_, sqlx::Error>>()
            .map_err(db_error)
    }

    async fn count_likes_by(&self, liked_by: Uuid) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM likes WHERE liked_by = ?")
            .bind(liked_by)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)
    }
}
