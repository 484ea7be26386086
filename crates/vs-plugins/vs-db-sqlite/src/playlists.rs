//! Playlists and `playlist_videos` membership.
//!
//! Membership writes are single statements guarded by the
//! `(playlist_id, video_id)` primary key; reads assemble the playlist inside
//! one transaction so the header and member list come from the same snapshot.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};
use uuid::Uuid;
use vs_core::error::{AppError, Result};
use vs_core::models::Playlist;
use vs_core::traits::PlaylistRepo;

use crate::{db_error, ensure_affected, SqliteStore};

const PLAYLIST_COLUMNS: &str = "id, owner_id, name, description, created_at, updated_at";

fn playlist_from_row(row: &SqliteRow, videos: Vec<Uuid>) -> std::result::Result<Playlist, sqlx::Error> {
    Ok(Playlist {
        id: row.try_get("id")?,
        owner_id: row.try_get("owner_id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        videos,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

async fn load_playlist(conn: &mut SqliteConnection, id: Uuid) -> Result<Option<Playlist>> {
    let Some(row) = sqlx::query(&format!("SELECT {PLAYLIST_COLUMNS} FROM playlists WHERE id = ?"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(db_error)?
    else {
        return Ok(None);
    };

    let videos = sqlx::query_scalar::<_, Uuid>(
        "SELECT video_id FROM playlist_videos WHERE playlist_id = ? ORDER BY position",
    )
    .bind(id)
    .fetch_all(&mut *conn)
    .await
    .map_err(db_error)?;

    playlist_from_row(&row, videos).map(Some).map_err(db_error)
}

async fn touch(conn: &mut SqliteConnection, id: Uuid) -> Result<()> {
    sqlx::query("UPDATE playlists SET updated_at = ? WHERE id = ?")
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *conn)
        .await
        .map_err(db_error)?;
    Ok(())
}

async fn reload_playlist(conn: &mut SqliteConnection, id: Uuid) -> Result<Playlist> {
    load_playlist(conn, id)
        .await?
        .ok_or_else(|| AppError::not_found("Playlist not found"))
}

#[async_trait]
impl PlaylistRepo for SqliteStore {
    async fn get_playlist(&self, id: Uuid) -> Result<Option<Playlist>> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;
        let playlist = load_playlist(&mut tx, id).await?;
        tx.commit().await.map_err(db_error)?;
        Ok(playlist)
    }

    async fn create_playlist(&self, playlist: Playlist) -> Result<Playlist> {
        sqlx::query(&format!(
            "INSERT INTO playlists ({PLAYLIST_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?)"
        ))
        .bind(playlist.id)
        .bind(playlist.owner_id)
        .bind(&playlist.name)
        .bind(&playlist.description)
        .bind(playlist.created_at)
        .bind(playlist.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(playlist)
    }

    async fn update_playlist(&self, playlist: Playlist) -> Result<Playlist> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;
        let result =
            sqlx::query("UPDATE playlists SET name = ?, description = ?, updated_at = ? WHERE id = ?")
                .bind(&playlist.name)
                .bind(&playlist.description)
                .bind(playlist.updated_at)
                .bind(playlist.id)
                .execute(&mut *tx)
                .await
                .map_err(db_error)?;
        ensure_affected(result.rows_affected(), "Playlist not found")?;
        let updated = reload_playlist(&mut tx, playlist.id).await?;
        tx.commit().await.map_err(db_error)?;
        Ok(updated)
    }

    async fn delete_playlist(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM playlists WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        ensure_affected(result.rows_affected(), "Playlist not found")
    }

    async fn playlists_by_owner(&self, owner_id: Uuid) -> Result<Vec<Playlist>> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;
        let rows = sqlx::query(&format!(
            "SELECT {PLAYLIST_COLUMNS} FROM playlists WHERE owner_id = ? ORDER BY rowid"
        ))
        .bind(owner_id)
        .fetch_all(&mut *tx)
        .await
        .map_err(db_error)?;

        let members = sqlx::query(
            "SELECT pv.playlist_id, pv.video_id FROM playlist_videos pv \
             JOIN playlists p ON p.id = pv.playlist_id \
             WHERE p.owner_id = ? ORDER BY pv.playlist_id, pv.position",
        )
        .bind(owner_id)
        .fetch_all(&mut *tx)
        .await
        .map_err(db_error)?;
        tx.commit().await.map_err(db_error)?;

        let mut by_playlist: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for member in &members {
            let playlist_id: Uuid = member.try_get("playlist_id").map_err(db_error)?;
            let video_id: Uuid = member.try_get("video_id").map_err(db_error)?;
            by_playlist.entry(playlist_id).or_default().push(video_id);
        }

        rows.iter()
            .map(|row| {
                let id: Uuid = row.try_get("id")?;
                playlist_from_row(row, by_playlist.remove(&id).unwrap_or_default())
            })
            .collect::<std::result::Result<_, _>>()
            .map_err(db_error)
    }

    async fn add_video(&self, playlist_id: Uuid, video_id: Uuid) -> Result<Playlist> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;
        sqlx::query(
            "INSERT INTO playlist_videos (playlist_id, video_id, position, added_at) \
             SELECT ?, ?, COALESCE(MAX(position), 0) + 1, ? FROM playlist_videos WHERE playlist_id = ?",
        )
        .bind(playlist_id)
        .bind(video_id)
        .bind(Utc::now())
        .bind(playlist_id)
        .execute(&mut *tx)
        .await
        .map_err(|err| match db_error(err) {
            AppError::Conflict(_) => AppError::conflict("Video already in playlist"),
            other => other,
        })?;
        touch(&mut tx, playlist_id).await?;
        let playlist = reload_playlist(&mut tx, playlist_id).await?;
        tx.commit().await.map_err(db_error)?;
        Ok(playlist)
    }

    async fn remove_video(&self, playlist_id: Uuid, video_id: Uuid) -> Result<Playlist> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;
        let result = sqlx::query("DELETE FROM playlist_videos WHERE playlist_id = ? AND video_id = ?")
            .bind(playlist_id)
            .bind(video_id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;
        ensure_affected(result.rows_affected(), "Video is not in this playlist")?;
        touch(&mut tx, playlist_id).await?;
        let playlist = reload_playlist(&mut tx, playlist_id).await?;
        tx.commit().await.map_err(db_error)?;
        Ok(playlist)
    }
}
