use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};
use uuid::Uuid;
use vs_core::error::Result;
use vs_core::models::Comment;
use vs_core::query::QueryPlan;
use vs_core::traits::CommentRepo;

use crate::plan::push_plan;
use crate::{db_error, ensure_affected, SqliteStore};

const COMMENT_COLUMNS: &str = "id, video_id, owner_id, content, created_at, updated_at";
const PLAN_FIELDS: &[&str] = &["video_id", "owner_id", "content", "created_at"];

fn comment_from_row(row: &SqliteRow) -> std::result::Result<Comment, sqlx::Error> {
    Ok(Comment {
        id: row.try_get("id")?,
        video_id: row.try_get("video_id")?,
        owner_id: row.try_get("owner_id")?,
        content: row.try_get("content")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl CommentRepo for SqliteStore {
    async fn get_comment(&self, id: Uuid) -> Result<Option<Comment>> {
        let row = sqlx::query(&format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;
        row.map(|row| comment_from_row(&row)).transpose().map_err(db_error)
    }

    async fn create_comment(&self, comment: Comment) -> Result<Comment> {
        sqlx::query(&format!(
            "INSERT INTO comments ({COMMENT_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?)"
        ))
        .bind(comment.id)
        .bind(comment.video_id)
        .bind(comment.owner_id)
        .bind(&comment.content)
        .bind(comment.created_at)
        .bind(comment.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(comment)
    }

    async fn update_comment(&self, comment: Comment) -> Result<Comment> {
        let result = sqlx::query("UPDATE comments SET content = ?, updated_at = ? WHERE id = ?")
            .bind(&comment.content)
            .bind(comment.updated_at)
            .bind(comment.id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        ensure_affected(result.rows_affected(), "Comment not found")?;
        Ok(comment)
    }

    async fn delete_comment(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        ensure_affected(result.rows_affected(), "Comment not found")
    }

    async fn list_comments(&self, plan: &QueryPlan) -> Result<Vec<Comment>> {
        let mut builder =
            QueryBuilder::<Sqlite>::new(format!("SELECT {COMMENT_COLUMNS} FROM comments"));
        push_plan(&mut builder, plan, PLAN_FIELDS)?;
        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;
        rows.iter()
            .map(comment_from_row)
            .collect::<std::result::Result<_, _>>()
            .map_err(db_error)
    }
}
