use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// One immutable analysis record. Insert-only: rows are never updated or
/// deleted, and `age_snapshot` / `status_snapshot` freeze the owner's
/// profile at analysis time even if the user row changes later.
/// "Latest" queries order by `created_at` within one user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HistoryRecordRow {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Normalized profile text the analysis ran against.
    pub raw_text: String,
    /// JSON-encoded manual form data, verbatim as submitted, if any.
    pub form_data: Option<String>,
    /// The full validated Verdict, serialized.
    pub analysis_json: Value,
    /// Extracted from the verdict's `score` field for cheap querying.
    pub score: i32,
    pub age_snapshot: Option<i32>,
    pub status_snapshot: Option<String>,
    pub created_at: DateTime<Utc>,
}
