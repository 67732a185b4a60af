//! Input Normalizer — converts an uploaded document or a manual-entry
//! payload into a single plain-text profile string.
//!
//! Pure transformation: the output is a deterministic function of the input.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::AppError;

/// Rendered in place of absent manual-entry fields.
pub const FIELD_PLACEHOLDER: &str = "Not provided";

/// Manual-entry payload, submitted as a JSON-encoded string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualEntry {
    pub target_role: String,
    pub skills: Option<String>,
    pub experience: Option<String>,
    pub projects: Option<String>,
    /// Free-form field for profiles that don't fit the labeled slots.
    pub custom_field: Option<String>,
}

/// Raw input to the normalizer: exactly one of the two must be supplied.
#[derive(Debug, Default)]
pub struct ProfileInput {
    pub manual_data: Option<String>,
    pub file: Option<Bytes>,
}

/// Normalized result: the profile text sent to the model, plus the manual
/// form data verbatim (persisted alongside the history record).
#[derive(Debug, Clone)]
pub struct NormalizedProfile {
    pub text: String,
    pub form_data: Option<String>,
}

/// Turns raw input into profile text.
///
/// Manual data and file are mutually exclusive; supplying both is rejected
/// rather than silently preferring one.
pub fn normalize(input: ProfileInput) -> Result<NormalizedProfile, AppError> {
    match (input.manual_data, input.file) {
        (Some(_), Some(_)) => Err(AppError::ConflictingInput),
        (Some(raw), None) => {
            let entry: ManualEntry = serde_json::from_str(&raw)
                .map_err(|e| AppError::InvalidInput(e.to_string()))?;
            Ok(NormalizedProfile {
                text: format_manual_entry(&entry),
                form_data: Some(raw),
            })
        }
        (None, Some(bytes)) => Ok(NormalizedProfile {
            text: extract_file_text(&bytes)?,
            form_data: None,
        }),
        (None, None) => Err(AppError::MissingInput),
    }
}

/// Deterministic labeled multi-line rendering of a manual entry.
fn format_manual_entry(entry: &ManualEntry) -> String {
    let field = |f: &Option<String>| -> String {
        f.clone().unwrap_or_else(|| FIELD_PLACEHOLDER.to_string())
    };
    format!(
        "Manual Entry Form:\nTarget Role: {}\nSkills: {}\nExp: {}\nProjects: {}\nCustom Universal Field: {}",
        entry.target_role,
        field(&entry.skills),
        field(&entry.experience),
        field(&entry.projects),
        field(&entry.custom_field),
    )
}

/// Page-by-page PDF text extraction with a deliberate fallback: if the bytes
/// are not a parseable PDF, treat them as plain UTF-8 text (maybe it was a
/// .txt upload). Only bytes that are neither fail.
fn extract_file_text(bytes: &[u8]) -> Result<String, AppError> {
    match pdf_extract::extract_text_from_mem(bytes) {
        Ok(text) => Ok(text),
        Err(e) => {
            warn!("PDF extraction failed, falling back to UTF-8 decode: {e}");
            String::from_utf8(bytes.to_vec()).map_err(|_| AppError::UnparseableFile)
        }
    }
}
