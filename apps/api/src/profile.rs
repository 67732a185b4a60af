//! Profile read/update handlers for the calling identity.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::models::user::UserRow;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub email: String,
    pub age: Option<i32>,
    pub current_status: Option<String>,
    pub target_role: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for ProfileResponse {
    fn from(user: UserRow) -> Self {
        ProfileResponse {
            email: user.email,
            age: user.age,
            current_status: user.current_status,
            target_role: user.target_role,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ProfileUpdate {
    pub age: Option<i32>,
    pub current_status: Option<String>,
    pub target_role: Option<String>,
}

/// GET /profile
pub async fn handle_get_profile(
    CurrentUser(user): CurrentUser,
) -> Result<Json<ProfileResponse>, AppError> {
    Ok(Json(user.into()))
}

/// PUT /profile
///
/// Partial update: absent fields keep their stored values. Last writer wins.
pub async fn handle_update_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<ProfileResponse>, AppError> {
    let updated = sqlx::query_as::<_, UserRow>(
        r#"
        UPDATE users
        SET age = COALESCE($1, age),
            current_status = COALESCE($2, current_status),
            target_role = COALESCE($3, target_role)
        WHERE id = $4
        RETURNING *
        "#,
    )
    .bind(update.age)
    .bind(&update.current_status)
    .bind(&update.target_role)
    .bind(user.id)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(updated.into()))
}
