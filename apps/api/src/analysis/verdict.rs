//! Result Schema — the structured verdict contract both the AI client and
//! the API boundary must satisfy.
//!
//! Modeled as explicit typed records rather than open JSON maps so a
//! malformed model response is rejected at parse time instead of leaking to
//! the caller. Array cardinalities are advisory in the instruction template
//! and deliberately NOT enforced here — the model occasionally returns more
//! or fewer entries and that degrades gracefully.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::llm_client::{strip_json_fences, AiError};

/// Severity tag used by comparison metrics and feedback cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
}

/// One radar-chart axis: the user's score (`A`) against the ideal
/// candidate's (`B`) on a bounded scale. Field names match the wire shape
/// the frontend charts consume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadarEntry {
    pub subject: String,
    #[serde(rename = "A")]
    pub user_score: f64,
    #[serde(rename = "B")]
    pub benchmark_score: f64,
    #[serde(rename = "fullMark")]
    pub full_mark: f64,
}

/// One head-to-head comparison row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonMetric {
    pub label: String,
    pub you: String,
    pub sharma: String,
    pub status: Severity,
}

/// One feedback card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackCard {
    pub title: String,
    pub score: String,
    pub insight: String,
    #[serde(rename = "type")]
    pub severity: Severity,
}

/// The full structured verdict. Every verdict persisted or returned to a
/// caller has passed through `parse_verdict`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    pub score: i64,
    pub score_status: String,
    pub alert_title: String,
    pub alert_message: String,
    #[serde(default)]
    pub overall_summary: Option<String>,
    pub radar_data: Vec<RadarEntry>,
    pub comparison_metrics: Vec<ComparisonMetric>,
    pub feedback_cards: Vec<FeedbackCard>,
    #[serde(default)]
    pub growth_verdict: Option<String>,
}

impl Verdict {
    /// Bound checks beyond field presence/type (those are enforced by
    /// deserialization).
    pub fn validate(&self) -> Result<(), AiError> {
        if !(0..=100).contains(&self.score) {
            return Err(AiError::SchemaViolation(format!(
                "score {} outside [0, 100]",
                self.score
            )));
        }
        Ok(())
    }
}

/// Turns raw model output into a validated `Verdict`.
///
/// Two distinct failure modes, surfaced separately:
/// - not JSON at all → `AiError::InvalidJson` (carries the parser error)
/// - valid JSON with the wrong shape or out-of-range score →
///   `AiError::SchemaViolation`
pub fn parse_verdict(raw: &str) -> Result<Verdict, AiError> {
    let cleaned = strip_json_fences(raw);

    let value: Value = serde_json::from_str(cleaned).map_err(AiError::InvalidJson)?;

    let verdict: Verdict =
        serde_json::from_value(value).map_err(|e| AiError::SchemaViolation(e.to_string()))?;

    verdict.validate()?;
    Ok(verdict)
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// A complete verdict as the model is instructed to return it.
    pub const FULL_VERDICT: &str = r#"{
        "score": 42,
        "score_status": "Status: Resume Bin Material",
        "alert_title": "Sharma Ji Ka Beta Is Laughing",
        "alert_message": "Unlike Sharma Ji Ka Beta who ships microservices, you script single files. Learn distributed design.",
        "overall_summary": "A CRUD app and two years of Python will not survive a system design round.",
        "radar_data": [
            { "subject": "Tech Stack", "A": 60, "B": 150, "fullMark": 150 },
            { "subject": "Complexity", "A": 40, "B": 150, "fullMark": 150 },
            { "subject": "Experience", "A": 55, "B": 150, "fullMark": 150 },
            { "subject": "Prestige", "A": 30, "B": 150, "fullMark": 150 },
            { "subject": "Innovation", "A": 35, "B": 150, "fullMark": 150 },
            { "subject": "Future Value", "A": 50, "B": 150, "fullMark": 150 }
        ],
        "comparison_metrics": [
            { "label": "Hardest Feat", "you": "CRUD app", "sharma": "Distributed scheduler", "status": "critical" },
            { "label": "Experience", "you": "2 years scripting", "sharma": "5 years architecting", "status": "warning" }
        ],
        "feedback_cards": [
            { "title": "Skill Gap", "score": "Missing Link", "insight": "No systems depth. Sharma Ji Ka Beta profiles allocators; you profile spreadsheets.", "type": "critical" },
            { "title": "Career Path", "score": "Prognosis", "insight": "Trajectory flat. Pick one hard problem and finish it.", "type": "warning" }
        ],
        "growth_verdict": null
    }"#;
}

#[cfg(test)]
mod tests {
    use super::fixtures::FULL_VERDICT;
    use super::*;

    #[test]
    fn full_verdict_parses() {
        let verdict = parse_verdict(FULL_VERDICT).unwrap();
        assert_eq!(verdict.score, 42);
        assert_eq!(verdict.score_status, "Status: Resume Bin Material");
        assert_eq!(verdict.radar_data.len(), 6);
        assert_eq!(verdict.radar_data[0].subject, "Tech Stack");
        assert!((verdict.radar_data[0].user_score - 60.0).abs() < f64::EPSILON);
        assert_eq!(verdict.comparison_metrics[0].status, Severity::Critical);
        assert_eq!(verdict.feedback_cards[1].severity, Severity::Warning);
        assert!(verdict.growth_verdict.is_none());
    }

    #[test]
    fn fenced_output_parses() {
        let fenced = format!("```json\n{FULL_VERDICT}\n```");
        assert_eq!(parse_verdict(&fenced).unwrap().score, 42);
    }

    #[test]
    fn non_json_output_is_invalid_json() {
        let result = parse_verdict("I am sorry, I cannot roast this resume.");
        assert!(matches!(result, Err(AiError::InvalidJson(_))));
    }

    #[test]
    fn missing_required_field_is_schema_violation() {
        // Valid JSON, but no score_status.
        let json = r#"{
            "score": 42,
            "alert_title": "t",
            "alert_message": "m",
            "radar_data": [],
            "comparison_metrics": [],
            "feedback_cards": []
        }"#;
        assert!(matches!(
            parse_verdict(json),
            Err(AiError::SchemaViolation(_))
        ));
    }

    #[test]
    fn out_of_range_score_is_schema_violation() {
        let json = FULL_VERDICT.replace(r#""score": 42"#, r#""score": 150"#);
        assert!(matches!(
            parse_verdict(&json),
            Err(AiError::SchemaViolation(_))
        ));
    }

    #[test]
    fn unknown_severity_tag_is_schema_violation() {
        let json = FULL_VERDICT.replace(r#""status": "critical""#, r#""status": "fatal""#);
        assert!(matches!(
            parse_verdict(&json),
            Err(AiError::SchemaViolation(_))
        ));
    }

    #[test]
    fn extra_or_fewer_array_entries_are_accepted() {
        // Template asks for six radar axes; a model returning one still parses.
        let json = r#"{
            "score": 10,
            "score_status": "s",
            "alert_title": "t",
            "alert_message": "m",
            "radar_data": [
                { "subject": "Tech Stack", "A": 10, "B": 150, "fullMark": 150 }
            ],
            "comparison_metrics": [],
            "feedback_cards": []
        }"#;
        let verdict = parse_verdict(json).unwrap();
        assert_eq!(verdict.radar_data.len(), 1);
        assert!(verdict.comparison_metrics.is_empty());
    }

    #[test]
    fn serialization_round_trips() {
        let verdict = parse_verdict(FULL_VERDICT).unwrap();
        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(json["radar_data"][0]["A"], serde_json::json!(60.0));
        assert_eq!(json["feedback_cards"][0]["type"], "critical");
        let recovered: Verdict = serde_json::from_value(json).unwrap();
        assert_eq!(recovered.score, verdict.score);
    }

    #[test]
    fn growth_verdict_string_is_preserved() {
        let json = FULL_VERDICT.replace(
            r#""growth_verdict": null"#,
            r#""growth_verdict": "You improved by 0% in 10 days""#,
        );
        let verdict = parse_verdict(&json).unwrap();
        assert_eq!(
            verdict.growth_verdict.as_deref(),
            Some("You improved by 0% in 10 days")
        );
    }
}
