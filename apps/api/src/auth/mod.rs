//! Bearer-token auth: argon2 password hashing, JWT issuance, and the
//! `CurrentUser` extractor that resolves the calling identity.

pub mod handlers;

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::user::UserRow;
use crate::state::AppState;

/// JWT claims: the identity's email plus an expiry.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
}

/// Hashes a password into a PHC string, e.g. `$argon2id$v=19$…`
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {e}")))
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(password_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Issues a bearer token carrying the email claim and an expiry.
pub fn issue_token(email: &str, secret: &str, ttl_minutes: i64) -> Result<String, AppError> {
    let claims = Claims {
        sub: email.to_string(),
        exp: (Utc::now() + Duration::minutes(ttl_minutes)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Token issuance failed: {e}")))
}

/// Resolves the email claim from a bearer token. Expired or tampered
/// tokens yield None.
pub fn resolve_token(token: &str, secret: &str) -> Option<String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .ok()
    .map(|data| data.claims.sub)
}

/// Extractor: present in a handler signature means the request carried a
/// valid bearer token for a registered user. Loads the full user row.
pub struct CurrentUser(pub UserRow);

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header_val = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let token = header_val
            .strip_prefix("Bearer ")
            .ok_or(AppError::Unauthorized)?;

        let email =
            resolve_token(token, &state.config.jwt_secret).ok_or(AppError::Unauthorized)?;

        let user = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
            .bind(&email)
            .fetch_optional(&state.db)
            .await?
            .ok_or(AppError::Unauthorized)?;

        Ok(CurrentUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_roundtrip() {
        let hash = hash_password("hunter2").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("hunter2", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn verify_rejects_malformed_hash() {
        assert!(!verify_password("hunter2", "not-a-phc-string"));
    }

    #[test]
    fn token_roundtrip_preserves_email() {
        let token = issue_token("a@b.com", "secret", 60).unwrap();
        assert_eq!(resolve_token(&token, "secret").as_deref(), Some("a@b.com"));
    }

    #[test]
    fn token_rejected_with_wrong_secret() {
        let token = issue_token("a@b.com", "secret", 60).unwrap();
        assert_eq!(resolve_token(&token, "other-secret"), None);
    }

    #[test]
    fn expired_token_rejected() {
        let token = issue_token("a@b.com", "secret", -5).unwrap();
        assert_eq!(resolve_token(&token, "secret"), None);
    }
}
