//! HTTP face of `AppError`: every failure leaves as an error envelope.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{debug, error};
use vs_core::envelope::ErrorEnvelope;
use vs_core::AppError;

use crate::response::ApiResponse;

#[derive(Debug)]
pub struct ApiError(pub AppError);

pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(AppError::invalid(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError(AppError::invalid(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError(AppError::invalid(rejection.body_text()))
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError(AppError::invalid(rejection.body_text()))
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError(AppError::invalid("Upload exceeds the size limit"))
        } else {
            ApiError(AppError::invalid(format!("Invalid multipart body: {}", err.body_text())))
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let envelope = ErrorEnvelope::from(&self.0);
        if envelope.status_code >= 500 {
            error!(error = %self.0, "request failed");
        } else {
            debug!(status = envelope.status_code, message = %envelope.message, "request rejected");
        }
        let status =
            StatusCode::from_u16(envelope.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(envelope)).into_response()
    }
}
