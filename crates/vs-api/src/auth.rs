//! Caller resolution for protected routes.

use axum::extract::{Request, State};
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use vs_core::AppError;

use crate::error::ApiError;
use crate::AppState;

pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";

/// The `accessToken` cookie wins over an `Authorization: Bearer` header.
pub fn access_token(headers: &HeaderMap) -> Option<String> {
    let from_cookie = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == ACCESS_TOKEN_COOKIE)
        .map(|(_, token)| token.trim().to_string());

    from_cookie
        .or_else(|| {
            headers
                .get(AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.strip_prefix("Bearer "))
                .map(|token| token.trim().to_string())
        })
        .filter(|token| !token.is_empty())
}

/// Verifies the access token and stores the `Caller` in request extensions.
pub async fn require_caller(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = access_token(request.headers())
        .ok_or_else(|| AppError::unauthorized("Unauthorized request"))?;
    let caller = state.identity.verify_access_token(&token)?;
    request.extensions_mut().insert(caller);
    Ok(next.run(request).await)
}
