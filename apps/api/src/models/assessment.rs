use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// One onboarding questionnaire per user. Regenerating upserts the same row.
///
/// Enumerated fields (goal, age bracket, pace, ...) carry closed-vocabulary
/// values validated at the HTTP boundary; the generation core assumes them
/// valid.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AssessmentRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub main_goal: String,
    pub age_bracket: String,
    pub current_situation: String,
    pub biggest_challenge: String,
    /// Desired study hours per week, e.g. "5-10".
    pub learning_pace: String,
    /// Self-reported, 1-5.
    pub skill_level: i16,
    pub career_path: String,
    /// Free-text override chosen when `career_path` is "other".
    pub other_career_path: Option<String>,
    pub target_timeframe: String,
    pub learning_style: String,
    pub previous_courses: String,
    pub certifications: Option<String>,
    pub motivation: Option<String>,
    pub hear_about: String,
    /// Filled by the job-title generator, newline-separated.
    pub recommended_job_titles: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
pub(crate) fn sample_assessment(user_id: Uuid) -> AssessmentRow {
    AssessmentRow {
        id: Uuid::new_v4(),
        user_id,
        main_goal: "switch-career".to_string(),
        age_bracket: "27-30".to_string(),
        current_situation: "working-non-related".to_string(),
        biggest_challenge: "no-experience".to_string(),
        learning_pace: "5-10".to_string(),
        skill_level: 4,
        career_path: "web-dev".to_string(),
        other_career_path: None,
        target_timeframe: "6-months".to_string(),
        learning_style: "visual".to_string(),
        previous_courses: "building".to_string(),
        certifications: None,
        motivation: None,
        hear_about: "social".to_string(),
        recommended_job_titles: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
