//! Result Parser/Validator — decodes provider output according to the declared
//! contract. Malformed output becomes a recoverable error value carrying the
//! raw text for diagnosis, never a panic.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured roadmap payload as declared by the roadmap prompt schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapPayload {
    pub roadmap_summary: String,
    #[serde(default)]
    pub skills_gap_analysis: Vec<String>,
    pub phases: Vec<RoadmapPhase>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapPhase {
    pub phase_title: String,
    /// Providers occasionally quote the number; accept both forms.
    #[serde(deserialize_with = "weeks_from_number_or_string")]
    pub estimated_weeks: u32,
    #[serde(default)]
    pub topics: Vec<String>,
    pub action_item: String,
}

impl RoadmapPayload {
    /// Total of the per-phase estimates.
    pub fn total_weeks(&self) -> u32 {
        self.phases.iter().map(|p| p.estimated_weeks).sum()
    }
}

/// Decode failure for a strict-JSON roadmap response. Carries the raw
/// offending text unmodified so operators can diagnose the provider output.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct RoadmapParseError {
    pub message: String,
    pub raw: String,
}

/// Line-splits free-text job-title output: trimmed, empty lines dropped.
/// No count or format enforcement — the prompt contract is the source of
/// truth for "exactly 3 titles".
pub fn parse_job_titles(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Strict decode of a roadmap response.
pub fn parse_roadmap(raw: &str) -> Result<RoadmapPayload, RoadmapParseError> {
    serde_json::from_str(raw).map_err(|e| RoadmapParseError {
        message: format!("Failed to parse roadmap generation: {e}"),
        raw: raw.to_string(),
    })
}

fn weeks_from_number_or_string<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(u32),
        Text(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => s
            .trim()
            .parse::<u32>()
            .map_err(|_| de::Error::custom(format!("invalid estimated_weeks: {s:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_ROADMAP: &str = r#"{
        "roadmap_summary": "Bridge the gap from hobbyist to employable backend developer.",
        "skills_gap_analysis": ["FastAPI", "Docker"],
        "phases": [
            {
                "phase_title": "Foundations",
                "estimated_weeks": 4,
                "topics": ["HTTP", "SQL"],
                "action_item": "Build a CRUD API"
            },
            {
                "phase_title": "Deployment",
                "estimated_weeks": "6",
                "topics": ["Docker", "CI"],
                "action_item": "Ship a containerized service"
            }
        ]
    }"#;

    #[test]
    fn test_parse_job_titles_splits_and_trims_lines() {
        let raw = "  Backend Developer  \n\nData Engineer\nPlatform Engineer\n";
        let titles = parse_job_titles(raw);
        assert_eq!(
            titles,
            vec!["Backend Developer", "Data Engineer", "Platform Engineer"]
        );
    }

    #[test]
    fn test_parse_job_titles_does_not_enforce_a_count() {
        assert_eq!(parse_job_titles("Only One Title"), vec!["Only One Title"]);
        assert!(parse_job_titles("   \n \n").is_empty());
    }

    #[test]
    fn test_parse_roadmap_accepts_valid_payload() {
        let payload = parse_roadmap(VALID_ROADMAP).unwrap();
        assert_eq!(payload.phases.len(), 2);
        assert_eq!(payload.skills_gap_analysis, vec!["FastAPI", "Docker"]);
        assert_eq!(payload.phases[0].estimated_weeks, 4);
        // Quoted week count tolerated
        assert_eq!(payload.phases[1].estimated_weeks, 6);
        assert_eq!(payload.total_weeks(), 10);
    }

    #[test]
    fn test_parse_roadmap_rejects_non_json_with_raw_preserved() {
        let raw = "Sorry, I cannot help with that.";
        let err = parse_roadmap(raw).unwrap_err();
        assert_eq!(err.raw, raw);
        assert!(err.message.contains("Failed to parse roadmap generation"));
    }

    #[test]
    fn test_parse_roadmap_rejects_fenced_json() {
        // The prompt forbids code fences; fenced output is malformed output.
        let raw = "```json\n{\"roadmap_summary\": \"x\", \"phases\": []}\n```";
        let err = parse_roadmap(raw).unwrap_err();
        assert_eq!(err.raw, raw);
    }

    #[test]
    fn test_parse_roadmap_rejects_garbage_week_string() {
        let raw = r#"{
            "roadmap_summary": "x",
            "phases": [
                {"phase_title": "p", "estimated_weeks": "a few", "topics": [], "action_item": "a"}
            ]
        }"#;
        let err = parse_roadmap(raw).unwrap_err();
        assert!(err.message.contains("estimated_weeks"));
    }

    #[test]
    fn test_payload_round_trips_through_json_value() {
        let payload = parse_roadmap(VALID_ROADMAP).unwrap();
        let value = serde_json::to_value(&payload).unwrap();
        let recovered: RoadmapPayload = serde_json::from_value(value).unwrap();

        assert_eq!(recovered.phases.len(), payload.phases.len());
        assert_eq!(recovered.phases[0].phase_title, "Foundations");
        assert_eq!(recovered.skills_gap_analysis, payload.skills_gap_analysis);
        assert_eq!(recovered, payload);
    }
}
