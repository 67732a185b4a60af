//! History Resolver — fetches the caller's most recent prior record and
//! derives the natural-language context string fed to the model.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::history::HistoryRecordRow;

/// Context string for an identity with no prior records.
pub const FIRST_SUBMISSION_CONTEXT: &str =
    "This is the user's FIRST submission. Roast them freshly.";

/// Newest history record owned by `user_id`, or None. Scoped to one
/// identity only.
pub async fn latest_record(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<HistoryRecordRow>, sqlx::Error> {
    sqlx::query_as::<_, HistoryRecordRow>(
        "SELECT * FROM history_records WHERE user_id = $1 ORDER BY created_at DESC LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Derives the history context string: fixed text for a first submission,
/// otherwise the previous score and elapsed days, phrased to make the model
/// judge growth or stagnation.
pub fn history_context(last: Option<&HistoryRecordRow>) -> String {
    match last {
        None => FIRST_SUBMISSION_CONTEXT.to_string(),
        Some(record) => {
            let days_gap = (Utc::now() - record.created_at).num_days();
            format!(
                "User submitted previously {} days ago. Previous Score: {}/100. \
                 Compare this new submission to see if they improved or wasted time.",
                days_gap, record.score
            )
        }
    }
}
