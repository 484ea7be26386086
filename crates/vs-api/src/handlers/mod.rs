//! vidshare/crates/vs-api/src/handlers/mod.rs
//!
//! Request handlers, one module per resource. Handlers only adapt HTTP to
//! service calls; validation and ownership live in `vs-services`.

pub mod comments;
pub mod dashboard;
pub mod likes;
pub mod playlists;
pub mod subscriptions;
pub mod tweets;
pub mod videos;

use vs_core::AppError;

use crate::error::{ApiError, ApiResult};
use crate::response::{ApiResponse, Empty};

pub async fn healthcheck() -> ApiResult<Empty> {
    Ok(ApiResponse::ok(Empty {}, "OK"))
}

pub async fn not_found() -> ApiError {
    ApiError(AppError::not_found("Route not found"))
}
