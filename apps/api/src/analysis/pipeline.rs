//! Profile Analysis Pipeline — orchestrates one analysis request.
//!
//! Flow: normalize input → resolve history context → compile prompt →
//!       request verdict → persist one history record → return verdict.
//!
//! An AI failure (transport, invalid JSON, schema violation) aborts before
//! any write: a failed analysis never creates a history record.

use bytes::Bytes;
use serde_json::Value;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::analysis::history::{history_context, latest_record};
use crate::analysis::normalizer::{normalize, NormalizedProfile, ProfileInput};
use crate::analysis::prompts::compile_prompt;
use crate::analysis::verdict::{parse_verdict, Verdict};
use crate::errors::AppError;
use crate::llm_client::{AiError, TextGenerator};
use crate::models::user::UserRow;

/// One analysis submission, as decoded from the multipart form.
#[derive(Debug, Default)]
pub struct AnalyzeRequest {
    pub target_role: String,
    pub manual_data: Option<String>,
    pub file: Option<Bytes>,
    pub age: Option<i32>,
    pub current_status: Option<String>,
}

/// Sends the compiled prompt to the model and parses the response into a
/// validated verdict. Never retried on parse or schema failure.
pub async fn request_verdict(llm: &dyn TextGenerator, prompt: &str) -> Result<Verdict, AiError> {
    let raw = llm.generate(prompt).await?;
    parse_verdict(&raw)
}

/// Runs the full pipeline for a fresh submission.
pub async fn run_analysis(
    pool: &PgPool,
    llm: &dyn TextGenerator,
    user: &UserRow,
    request: AnalyzeRequest,
) -> Result<Verdict, AppError> {
    let normalized = normalize(ProfileInput {
        manual_data: request.manual_data,
        file: request.file,
    })?;

    analyze_profile_text(
        pool,
        llm,
        user,
        Some(request.target_role.as_str()),
        normalized,
        request.age,
        request.current_status,
    )
    .await
}

/// Re-runs analysis against the most recent stored profile text, using the
/// caller's current profile fields. Fails if no prior record exists.
pub async fn rerun_analysis(
    pool: &PgPool,
    llm: &dyn TextGenerator,
    user: &UserRow,
) -> Result<Verdict, AppError> {
    let last = latest_record(pool, user.id).await?.ok_or_else(|| {
        AppError::Validation("No previous analysis to re-run. Submit a profile first.".to_string())
    })?;

    let normalized = NormalizedProfile {
        text: last.raw_text.clone(),
        form_data: last.form_data.clone(),
    };

    // No role override on rerun: the stored profile role stays as-is.
    analyze_profile_text(pool, llm, user, None, normalized, None, None).await
}

/// Core of the pipeline, shared by analyze and rerun.
///
/// `target_role` / `age` / `current_status` overrides, when present, win
/// over the stored profile fields and are written back to the user row.
/// The history record snapshots whichever values were in effect at
/// analysis time.
async fn analyze_profile_text(
    pool: &PgPool,
    llm: &dyn TextGenerator,
    user: &UserRow,
    target_role: Option<&str>,
    normalized: NormalizedProfile,
    age: Option<i32>,
    current_status: Option<String>,
) -> Result<Verdict, AppError> {
    let prompt_role = target_role
        .or(user.target_role.as_deref())
        .unwrap_or("Unknown");
    let effective_age = age.or(user.age);
    let effective_status = current_status.clone().or_else(|| user.current_status.clone());

    let last = latest_record(pool, user.id).await?;
    let context = history_context(last.as_ref());

    let prompt = compile_prompt(
        prompt_role,
        effective_age,
        effective_status.as_deref(),
        &normalized.text,
        &context,
    );

    let verdict = request_verdict(llm, &prompt).await?;

    let verdict_json = serde_json::to_value(&verdict)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize verdict: {e}")))?;
    let score = extract_score(&verdict_json);

    // Profile side effect and record insert commit together or not at all.
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        UPDATE users
        SET target_role = COALESCE($1, target_role),
            age = COALESCE($2, age),
            current_status = COALESCE($3, current_status)
        WHERE id = $4
        "#,
    )
    .bind(target_role)
    .bind(age)
    .bind(&current_status)
    .bind(user.id)
    .execute(&mut *tx)
    .await?;

    let record_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO history_records
            (id, user_id, raw_text, form_data, analysis_json, score,
             age_snapshot, status_snapshot)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(record_id)
    .bind(user.id)
    .bind(&normalized.text)
    .bind(&normalized.form_data)
    .bind(&verdict_json)
    .bind(score)
    .bind(effective_age)
    .bind(&effective_status)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    info!(
        "Stored history record {} for user {} (score {})",
        record_id, user.id, score
    );

    Ok(verdict)
}

/// Reads the integer score out of the serialized verdict, defaulting to 0
/// rather than failing on a missing or non-integer value.
fn extract_score(verdict_json: &Value) -> i32 {
    verdict_json
        .get("score")
        .and_then(Value::as_i64)
        .unwrap_or(0) as i32
}
