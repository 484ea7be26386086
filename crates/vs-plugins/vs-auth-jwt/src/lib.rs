//! # vs-auth-jwt
//!
//! HS256 JWT implementation of `IdentityProvider`.
//! Accounts live in the authentication service; this plugin only verifies
//! the access tokens it hands out (and can mint them for tooling and tests).

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;
use vs_core::error::{AppError, Result};
use vs_core::models::Caller;
use vs_core::traits::IdentityProvider;

/// What's inside an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id.
    pub sub: Uuid,
    /// Expiration (unix timestamp).
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

pub struct JwtIdentityProvider {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_ttl_secs: i64,
}

impl JwtIdentityProvider {
    pub fn new(secret: &SecretString, token_ttl_secs: i64) -> Self {
        let secret = secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
            token_ttl_secs,
        }
    }

    /// Signs a token for `user_id` valid for the configured lifetime.
    pub fn issue_access_token(&self, user_id: Uuid, username: Option<&str>) -> Result<String> {
        let claims = Claims {
            sub: user_id,
            exp: Utc::now().timestamp() + self.token_ttl_secs,
            username: username.map(str::to_string),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|err| AppError::internal(format!("jwt encode: {err}")))
    }

    pub fn decode_claims(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| {
                debug!(error = %err, "access token rejected");
                AppError::unauthorized("Invalid access token")
            })
    }
}

impl IdentityProvider for JwtIdentityProvider {
    fn verify_access_token(&self, token: &str) -> Result<Caller> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::unauthorized("Unauthorized request"));
        }
        self.decode_claims(token).map(|claims| Caller::new(claims.sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(secret: &str, ttl: i64) -> JwtIdentityProvider {
        JwtIdentityProvider::new(&SecretString::from(secret.to_string()), ttl)
    }

    #[test]
    fn issue_and_verify() {
        let jwt = provider("test-secret", 3600);
        let user = Uuid::now_v7();
        let token = jwt.issue_access_token(user, Some("alice")).unwrap();

        assert_eq!(jwt.verify_access_token(&token).unwrap(), Caller::new(user));
        assert_eq!(jwt.decode_claims(&token).unwrap().username.as_deref(), Some("alice"));
    }

    #[test]
    fn wrong_secret_is_unauthorized() {
        let token = provider("secret-a", 3600)
            .issue_access_token(Uuid::now_v7(), None)
            .unwrap();
        let err = provider("secret-b", 3600).verify_access_token(&token).unwrap_err();
        assert_eq!(err.status_code(), 401);
    }

    #[test]
    fn expired_token_is_unauthorized() {
        // Expired 2 minutes ago, past the default leeway.
        let jwt = provider("test-secret", -120);
        let token = jwt.issue_access_token(Uuid::now_v7(), None).unwrap();
        assert!(matches!(jwt.verify_access_token(&token), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn garbage_is_unauthorized() {
        let jwt = provider("test-secret", 3600);
        assert!(matches!(jwt.verify_access_token("invalid.token.here"), Err(AppError::Unauthorized(_))));
        assert!(matches!(jwt.verify_access_token("  "), Err(AppError::Unauthorized(_))));
    }
}
