use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use vs_core::envelope::Envelope;

/// Success envelope; the HTTP status mirrors `statusCode`.
#[derive(Debug)]
pub struct ApiResponse<T>(pub Envelope<T>);

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        ApiResponse(Envelope::ok(data, message))
    }

    pub fn created(data: T, message: impl Into<String>) -> Self {
        ApiResponse(Envelope::created(data, message))
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code).unwrap_or(StatusCode::OK);
        (status, Json(self.0)).into_response()
    }
}

/// `{}` payload for operations with nothing to return.
#[derive(Debug, Default, Serialize)]
pub struct Empty {}
