//! Axum route handlers for the Analysis API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde_json::Value;

use crate::analysis::history::latest_record;
use crate::analysis::pipeline::{rerun_analysis, run_analysis, AnalyzeRequest};
use crate::analysis::verdict::Verdict;
use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::state::AppState;

/// POST /analyze
///
/// Universal analysis endpoint. Multipart fields: target_role (required),
/// manual_data (optional JSON string), file (optional binary), age
/// (optional), current_status (optional). Exactly one of manual_data or
/// file must be present.
pub async fn handle_analyze(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    mut multipart: Multipart,
) -> Result<Json<Verdict>, AppError> {
    let mut request = AnalyzeRequest::default();
    let mut target_role = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let Some(name) = field.name().map(ToString::to_string) else {
            continue;
        };
        match name.as_str() {
            "target_role" => target_role = Some(read_text(field, &name).await?),
            "manual_data" => request.manual_data = Some(read_text(field, &name).await?),
            "file" => {
                request.file = Some(field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read uploaded file: {e}"))
                })?)
            }
            "age" => {
                let text = read_text(field, &name).await?;
                request.age = Some(
                    text.trim()
                        .parse::<i32>()
                        .map_err(|_| AppError::Validation("age must be an integer".to_string()))?,
                );
            }
            "current_status" => request.current_status = Some(read_text(field, &name).await?),
            _ => {} // unknown fields are ignored
        }
    }

    request.target_role =
        target_role.ok_or_else(|| AppError::Validation("target_role is required".to_string()))?;

    let verdict = run_analysis(&state.db, state.llm.as_ref(), &user, request).await?;
    Ok(Json(verdict))
}

async fn read_text(field: axum::extract::multipart::Field<'_>, name: &str) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read field '{name}': {e}")))
}

/// POST /analyze/rerun
///
/// Re-runs analysis using the most recent stored profile text and the
/// caller's current profile fields. 400 if no prior record exists.
pub async fn handle_rerun(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Verdict>, AppError> {
    let verdict = rerun_analysis(&state.db, state.llm.as_ref(), &user).await?;
    Ok(Json(verdict))
}

/// GET /analysis/latest
///
/// Returns the most recent stored verdict, exactly as persisted. 404 if the
/// caller has no records.
pub async fn handle_latest(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Value>, AppError> {
    let record = latest_record(&state.db, user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("No analysis found".to_string()))?;
    Ok(Json(record.analysis_json))
}
