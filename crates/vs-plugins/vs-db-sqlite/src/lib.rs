//! # vs-db-sqlite
//!
//! This crate implements the data mapping between the SQLite relational model
//! and the `vs-core` domain models. One [`SqliteStore`] implements every
//! repository port.
//!
//! Uniqueness of likes, subscriptions and playlist memberships is enforced by
//! table constraints (see `migrations/`), never by read-then-write checks in
//! Rust.

mod comments;
mod likes;
mod plan;
mod playlists;
mod subscriptions;
mod tweets;
mod videos;

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use tracing::{error, info};
use uuid::Uuid;
use vs_core::error::{AppError, Result};
use vs_core::models::User;
use vs_core::traits::UserDirectory;

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `url` and applies migrations.
    ///
    /// In-memory databases live inside a single connection, so the pool is
    /// pinned to one connection that never expires.
    pub async fn connect(url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let in_memory = url.contains(":memory:") || url.contains("mode=memory");
        let mut options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .with_regexp();
        if !in_memory {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }

        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        };

        let pool = pool_options.connect_with(options).await?;
        let store = Self { pool };
        store.migrate().await?;
        info!(url, in_memory, "sqlite store ready");
        Ok(store)
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Mirrors an account provisioned by the authentication service.
    pub async fn insert_user(&self, user: &User) -> Result<()> {
        sqlx::query("INSERT INTO users (id, username, created_at) VALUES (?, ?, ?)")
            .bind(user.id)
            .bind(&user.username)
            .bind(user.created_at)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for SqliteStore {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query("SELECT id, username, created_at FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;
        row.map(|row| user_from_row(&row)).transpose().map_err(db_error)
    }
}

fn user_from_row(row: &SqliteRow) -> std::result::Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        created_at: row.try_get("created_at")?,
    })
}

/// Maps driver failures onto the domain taxonomy.
///
/// Constraint violations are expected outcomes (duplicate like, dangling
/// reference); everything else is logged and surfaces as a storage failure.
pub(crate) fn db_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return AppError::conflict("Record already exists");
        }
        if db.is_foreign_key_violation() {
            return AppError::not_found("Referenced record not found");
        }
    }
    error!(error = %err, "sqlite query failed");
    AppError::Storage(anyhow::Error::new(err))
}

/// `NotFound(message)` when a write touched no row.
pub(crate) fn ensure_affected(rows: u64, message: &str) -> Result<()> {
    if rows == 0 {
        Err(AppError::not_found(message))
    } else {
        Ok(())
    }
}
