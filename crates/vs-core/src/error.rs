//! # AppError
//!
//! Centralized error handling for vidshare.
//! Maps domain-specific failures to actionable error types.

use thiserror::Error;

/// The primary error type for all vs-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed or missing input (e.g., bad identifier, blank content)
    #[error("{0}")]
    InvalidArgument(String),

    /// Referenced entity is absent (e.g., Video, Playlist membership)
    #[error("{0}")]
    NotFound(String),

    /// No usable caller identity on the request
    #[error("{0}")]
    Unauthorized(String),

    /// Caller is not the owner of the record it tries to mutate
    #[error("{0}")]
    Forbidden(String),

    /// Duplicate association or membership
    #[error("{0}")]
    Conflict(String),

    /// Unexpected failure (e.g., media provider rejected an upload)
    #[error("internal service error: {0}")]
    Internal(String),

    /// Infrastructure failure bubbling up from a plugin
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl AppError {
    pub fn invalid(message: impl Into<String>) -> Self {
        AppError::InvalidArgument(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        AppError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        AppError::Forbidden(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        AppError::Conflict(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AppError::Internal(message.into())
    }

    /// HTTP status code the failure envelope carries.
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::InvalidArgument(_) => 400,
            AppError::Unauthorized(_) => 401,
            AppError::Forbidden(_) => 403,
            AppError::NotFound(_) => 404,
            AppError::Conflict(_) => 409,
            AppError::Internal(_) | AppError::Storage(_) => 500,
        }
    }

    /// Message safe to hand back to a client. Infrastructure details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Internal(_) | AppError::Storage(_) => "Something went wrong".to_string(),
            other => other.to_string(),
        }
    }
}

/// A specialized Result type for vidshare logic.
pub type Result<T> = std::result::Result<T, AppError>;
