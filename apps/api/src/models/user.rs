use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A registered account. Profile fields (age, current_status, target_role)
/// are mutable via PUT /profile or as a side effect of submitting an
/// analysis with new values; the row is never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub age: Option<i32>,
    pub current_status: Option<String>,
    pub target_role: Option<String>,
    pub created_at: DateTime<Utc>,
}
