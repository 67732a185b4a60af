//! Axum route handlers for registration and login.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{hash_password, issue_token, verify_password};
use crate::errors::AppError;
use crate::models::user::UserRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// POST /register
///
/// Creates an identity from {email, password} and logs in immediately.
pub async fn handle_register(
    State(state): State<AppState>,
    Json(creds): Json<Credentials>,
) -> Result<Json<TokenResponse>, AppError> {
    if creds.email.trim().is_empty() || creds.password.is_empty() {
        return Err(AppError::Validation(
            "email and password are required".to_string(),
        ));
    }

    let existing: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(&creds.email)
        .fetch_optional(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::DuplicateEmail);
    }

    let password_hash = hash_password(&creds.password)?;

    // The pre-check above races with concurrent registrations; the unique
    // constraint is authoritative, so the loser still gets DUPLICATE_EMAIL.
    sqlx::query("INSERT INTO users (id, email, password_hash) VALUES ($1, $2, $3)")
        .bind(Uuid::new_v4())
        .bind(&creds.email)
        .bind(&password_hash)
        .execute(&state.db)
        .await
        .map_err(map_email_insert_error)?;

    let access_token = issue_token(
        &creds.email,
        &state.config.jwt_secret,
        state.config.token_ttl_minutes,
    )?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

/// Distinguishes "email already taken" from a genuine database failure.
fn map_email_insert_error(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => AppError::DuplicateEmail,
        _ => AppError::Database(e),
    }
}

/// POST /login
///
/// Authenticates {email, password}; 401 on unknown email or bad password.
pub async fn handle_login(
    State(state): State<AppState>,
    Json(creds): Json<Credentials>,
) -> Result<Json<TokenResponse>, AppError> {
    let user: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(&creds.email)
        .fetch_optional(&state.db)
        .await?;

    let user = user.ok_or(AppError::Unauthorized)?;

    if !verify_password(&creds.password, &user.password_hash) {
        return Err(AppError::Unauthorized);
    }

    let access_token = issue_token(
        &user.email,
        &state.config.jwt_secret,
        state.config.token_ttl_minutes,
    )?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;
    use sqlx::PgPool;

    async fn test_pool() -> Option<PgPool> {
        let url = std::env::var("TEST_DATABASE_URL").ok()?;
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .connect(&url)
            .await
            .expect("TEST_DATABASE_URL is set but unreachable");
        sqlx::migrate!()
            .run(&pool)
            .await
            .expect("migrations failed");
        Some(pool)
    }

    async fn insert_email(pool: &PgPool, email: &str) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO users (id, email, password_hash) VALUES ($1, $2, 'x')")
            .bind(Uuid::new_v4())
            .bind(email)
            .execute(pool)
            .await
            .map(|_| ())
    }

    /// Two inserts racing past the pre-check: the constraint violation must
    /// surface as DUPLICATE_EMAIL, not a generic database error.
    #[tokio::test]
    async fn duplicate_email_insert_maps_to_duplicate_email() {
        let Some(pool) = test_pool().await else { return };
        let email = format!("{}@example.test", Uuid::new_v4());

        insert_email(&pool, &email).await.unwrap();
        let err = insert_email(&pool, &email).await.unwrap_err();

        assert!(matches!(
            map_email_insert_error(err),
            AppError::DuplicateEmail
        ));
    }

    #[tokio::test]
    async fn other_database_errors_pass_through() {
        let Some(pool) = test_pool().await else { return };

        // NOT NULL violation, not a unique one.
        let err = sqlx::query("INSERT INTO users (id, email) VALUES ($1, $2)")
            .bind(Uuid::new_v4())
            .bind(format!("{}@example.test", Uuid::new_v4()))
            .execute(&pool)
            .await
            .unwrap_err();

        assert!(matches!(
            map_email_insert_error(err),
            AppError::Database(_)
        ));
    }
}
