use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::AiError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid JSON in manual_data: {0}")]
    InvalidInput(String),

    #[error("Either file or manual_data is required")]
    MissingInput,

    #[error("Supply either file or manual_data, not both")]
    ConflictingInput,

    #[error("Could not parse file. Please upload a valid PDF or text file.")]
    UnparseableFile,

    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("AI analysis failure: {0}")]
    Ai(#[from] AiError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::InvalidInput(_) => {
                (StatusCode::BAD_REQUEST, "INVALID_INPUT", self.to_string())
            }
            AppError::MissingInput => (StatusCode::BAD_REQUEST, "MISSING_INPUT", self.to_string()),
            AppError::ConflictingInput => (
                StatusCode::BAD_REQUEST,
                "CONFLICTING_INPUT",
                self.to_string(),
            ),
            AppError::UnparseableFile => (
                StatusCode::BAD_REQUEST,
                "UNPARSEABLE_FILE",
                self.to_string(),
            ),
            AppError::DuplicateEmail => {
                (StatusCode::BAD_REQUEST, "DUPLICATE_EMAIL", self.to_string())
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Unauthorized => {
                // 401 with a challenge header, handled below
                let body = Json(json!({
                    "error": {
                        "code": "UNAUTHORIZED",
                        "message": "Authentication required"
                    }
                }));
                return (
                    StatusCode::UNAUTHORIZED,
                    [(header::WWW_AUTHENTICATE, "Bearer")],
                    body,
                )
                    .into_response();
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Ai(e) => {
                tracing::error!("AI error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "AI_ERROR",
                    format!("AI Analysis Failure: {e}"),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn input_errors_map_to_400() {
        for err in [
            AppError::InvalidInput("bad".to_string()),
            AppError::MissingInput,
            AppError::ConflictingInput,
            AppError::UnparseableFile,
            AppError::DuplicateEmail,
        ] {
            assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn unauthorized_carries_bearer_challenge() {
        let resp = AppError::Unauthorized.into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            resp.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }

    #[test]
    fn ai_error_maps_to_500_with_message() {
        let err = AppError::Ai(AiError::EmptyContent);
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
