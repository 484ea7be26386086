use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};
use uuid::Uuid;
use vs_core::error::Result;
use vs_core::models::Video;
use vs_core::query::QueryPlan;
use vs_core::traits::VideoRepo;

use crate::plan::push_plan;
use crate::{db_error, ensure_affected, SqliteStore};

pub(crate) const VIDEO_COLUMNS: &str = "id, owner_id, title, description, video_file, thumbnail, duration, views, is_published, created_at, updated_at";

const PLAN_FIELDS: &[&str] = &[
    "owner_id",
    "is_published",
    "title",
    "description",
    "duration",
    "views",
    "created_at",
    "updated_at",
];

pub(crate) fn video_from_row(row: &SqliteRow) -> std::result::Result<Video, sqlx::Error> {
    Ok(Video {
        id: row.try_get("id")?,
        owner_id: row.try_get("owner_id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        video_file: row.try_get("video_file")?,
        thumbnail: row.try_get("thumbnail")?,
        duration: row.try_get("duration")?,
        views: row.try_get("views")?,
        is_published: row.try_get("is_published")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn videos_from_rows(rows: Vec<SqliteRow>) -> Result<Vec<Video>> {
    rows.iter()
        .map(video_from_row)
        .collect::<std::result::Result<_, _>>()
        .map_err(db_error)
}

#[async_trait]
impl VideoRepo for SqliteStore {
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>> {
        let row = sqlx::query(&format!("SELECT {VIDEO_COLUMNS} FROM videos WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;
        row.map(|row| video_from_row(&row)).transpose().map_err(db_error)
    }

    async fn create_video(&self, video: Video) -> Result<Video> {
        sqlx::query(&format!(
            "INSERT INTO videos ({VIDEO_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        ))
        .bind(video.id)
        .bind(video.owner_id)
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.video_file)
        .bind(&video.thumbnail)
        .bind(video.duration)
        .bind(video.views)
        .bind(video.is_published)
        .bind(video.created_at)
        .bind(video.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(video)
    }

    async fn update_video(&self, video: Video) -> Result<Video> {
        let result = sqlx::query(
            "UPDATE videos SET title = ?, description = ?, video_file = ?, thumbnail = ?, \
             duration = ?, views = ?, is_published = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.video_file)
        .bind(&video.thumbnail)
        .bind(video.duration)
        .bind(video.views)
        .bind(video.is_published)
        .bind(video.updated_at)
        .bind(video.id)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;
        ensure_affected(result.rows_affected(), "Video not found")?;
        Ok(video)
    }

    async fn delete_video(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM videos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        ensure_affected(result.rows_affected(), "Video not found")
    }

    async fn list_videos(&self, plan: &QueryPlan) -> Result<Vec<Video>> {
        let mut builder = QueryBuilder::<Sqlite>::new(format!("SELECT {VIDEO_COLUMNS} FROM videos"));
        push_plan(&mut builder, plan, PLAN_FIELDS)?;
        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;
        videos_from_rows(rows)
    }

    async fn videos_by_owner(&self, owner_id: Uuid) -> Result<Vec<Video>> {
        let rows = sqlx::query(&format!(
            "SELECT {VIDEO_COLUMNS} FROM videos WHERE owner_id = ? ORDER BY rowid"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        videos_from_rows(rows)
    }

    async fn channel_totals(&self, owner_id: Uuid) -> Result<(i64, i64)> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS total_videos, COALESCE(SUM(views), 0) AS total_views \
             FROM videos WHERE owner_id = ?",
        )
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;
        let videos: i64 = row.try_get("total_videos").map_err(db_error)?;
        let views: i64 = row.try_get("total_views").map_err(db_error)?;
        Ok((videos, views))
    }
}
