//! # vs-config
//!
//! Layered settings: code defaults, then `config/default.toml`, then
//! `config/local.toml` (both optional), then `VIDSHARE__SECTION__KEY`
//! environment variables. [`load_dotenv`] fills the environment from `.env`
//! beforehand; its outcome is logged once tracing is up.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

pub const ENV_PREFIX: &str = "VIDSHARE";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    pub media: MediaSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Allowed browser origins. Empty allows any origin (without credentials).
    pub cors_origins: Vec<String>,
}

impl ServerSettings {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub jwt_secret: SecretString,
    pub token_ttl_secs: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaSettings {
    pub root: String,
    pub url_prefix: String,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug)]
pub enum DotenvOutcome {
    Loaded(PathBuf),
    Absent,
    Unreadable(String),
}

impl DotenvOutcome {
    fn from_result(result: Result<PathBuf, dotenvy::Error>) -> Self {
        match result {
            Ok(path) => DotenvOutcome::Loaded(path),
            Err(err) if err.not_found() => DotenvOutcome::Absent,
            Err(err) => DotenvOutcome::Unreadable(err.to_string()),
        }
    }

    pub fn log(&self) {
        match self {
            DotenvOutcome::Loaded(path) => debug!(path = %path.display(), "loaded .env"),
            DotenvOutcome::Absent => {}
            DotenvOutcome::Unreadable(error) => warn!(%error, "ignoring unreadable .env"),
        }
    }
}

/// Loads `.env` from the working directory or its ancestors.
pub fn load_dotenv() -> DotenvOutcome {
    DotenvOutcome::from_result(dotenvy::dotenv())
}

impl Settings {
    /// Loads `./config/*.toml` and the process environment.
    pub fn load() -> Result<Self, SettingsError> {
        Self::from_sources(Path::new("config"), Self::environment())
    }

    pub fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("server.cors_origins")
    }

    pub fn from_sources(config_dir: &Path, environment: Environment) -> Result<Self, SettingsError> {
        let settings: Settings = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("server.cors_origins", Vec::<String>::new())?
            .set_default("database.url", "sqlite://vidshare.db")?
            .set_default("database.max_connections", 5)?
            .set_default("auth.token_ttl_secs", 86_400)?
            .set_default("media.root", "./data/media")?
            .set_default("media.url_prefix", "/media")?
            .set_default("media.max_upload_bytes", 100 * 1024 * 1024)?
            .set_default("log.filter", "info")?
            .set_default("log.format", "pretty")?
            .add_source(File::with_name(&config_dir.join("default").to_string_lossy()).required(false))
            .add_source(File::with_name(&config_dir.join("local").to_string_lossy()).required(false))
            .add_source(environment)
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.auth.jwt_secret.expose_secret().trim().is_empty() {
            return Err(SettingsError::Invalid("auth.jwt_secret must not be empty".into()));
        }
        if self.auth.token_ttl_secs <= 0 {
            return Err(SettingsError::Invalid("auth.token_ttl_secs must be positive".into()));
        }
        if !self.media.url_prefix.starts_with('/') {
            return Err(SettingsError::Invalid("media.url_prefix must start with '/'".into()));
        }
        if self.media.max_upload_bytes == 0 {
            return Err(SettingsError::Invalid("media.max_upload_bytes must be positive".into()));
        }
        Ok(())
    }
}
