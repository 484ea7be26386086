//! # vidshare binary
//!
//! Assembles the application from the plugins enabled at compile time.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;
use vs_api::{ApiConfig, AppState, MediaMount};
use vs_config::{LogFormat, LogSettings, Settings};
use vs_services::{Repositories, Services};

#[cfg(feature = "db-sqlite")]
use vs_db_sqlite::SqliteStore;

#[cfg(feature = "storage-local")]
use vs_storage_local::LocalMediaStore;

#[cfg(feature = "auth-jwt")]
use vs_auth_jwt::JwtIdentityProvider;

#[cfg(not(all(feature = "db-sqlite", feature = "storage-local", feature = "auth-jwt")))]
compile_error!("vidshare needs a database, a media store and an identity provider feature enabled");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = vs_config::load_dotenv();
    let settings = Settings::load().context("loading settings")?;
    init_tracing(&settings.log);
    dotenv.log();

    // 1. Database
    let store = SqliteStore::connect(&settings.database.url, settings.database.max_connections)
        .await
        .context("opening database")?;
    let repos = Repositories::from_store(Arc::new(store));

    // 2. Media storage
    let media_root = PathBuf::from(&settings.media.root);
    let media = LocalMediaStore::new(media_root.clone(), &settings.media.url_prefix);

    // 3. Access tokens
    let identity = JwtIdentityProvider::new(&settings.auth.jwt_secret, settings.auth.token_ttl_secs);

    let state = AppState::new(Services::new(repos, Arc::new(media)), Arc::new(identity));
    let api_config = ApiConfig {
        cors_origins: settings.server.cors_origins.clone(),
        max_upload_bytes: settings.media.max_upload_bytes,
        media: Some(MediaMount {
            url_prefix: settings.media.url_prefix.clone(),
            root: media_root,
        }),
    };
    let app = vs_api::router(state, &api_config);

    let address = settings.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("binding {address}"))?;
    info!(%address, "vidshare listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving http")?;

    info!("vidshare stopped");
    Ok(())
}

// RUST_LOG overrides the configured filter.
fn init_tracing(log: &LogSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.filter));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match log.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
