use axum::Json;
use serde_json::{json, Value};

/// GET / — liveness probe.
pub async fn root_handler() -> Json<Value> {
    Json(json!({ "status": "Skill Evaluator Backend is Running" }))
}
