use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::assessment::AssessmentRow;
use crate::state::AppState;

/// Questionnaire submission. Enumerated fields carry closed-vocabulary values
/// chosen in the client UI; the free-text fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct AssessmentInput {
    pub main_goal: String,
    pub age_bracket: String,
    pub current_situation: String,
    pub biggest_challenge: String,
    pub learning_pace: String,
    pub skill_level: i16,
    pub career_path: String,
    #[serde(default)]
    pub other_career_path: Option<String>,
    pub target_timeframe: String,
    pub learning_style: String,
    pub previous_courses: String,
    #[serde(default)]
    pub certifications: Option<String>,
    #[serde(default)]
    pub motivation: Option<String>,
    pub hear_about: String,
}

impl AssessmentInput {
    pub fn validate(&self) -> Result<(), AppError> {
        if !(1..=5).contains(&self.skill_level) {
            return Err(AppError::Validation(
                "skill_level must be between 1 and 5".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct AssessmentResponse {
    pub message: String,
    pub assessment: AssessmentRow,
}

/// POST /api/v1/assessment — create or update the caller's assessment.
pub async fn handle_submit_assessment(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<AssessmentInput>,
) -> Result<Json<AssessmentResponse>, AppError> {
    input.validate()?;

    let assessment = upsert_assessment(&state.db, auth.user_id, &input).await?;

    Ok(Json(AssessmentResponse {
        message: "Assessment saved successfully".to_string(),
        assessment,
    }))
}

/// GET /api/v1/assessment
pub async fn handle_get_assessment(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<AssessmentRow>, AppError> {
    let assessment: Option<AssessmentRow> =
        sqlx::query_as("SELECT * FROM assessments WHERE user_id = $1")
            .bind(auth.user_id)
            .fetch_optional(&state.db)
            .await?;

    assessment
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Assessment not found".to_string()))
}

/// One assessment per user: an existing record is updated in place, never
/// duplicated. Takes any executor so signup can run it inside its transaction.
pub async fn upsert_assessment(
    executor: impl PgExecutor<'_>,
    user_id: Uuid,
    input: &AssessmentInput,
) -> Result<AssessmentRow, sqlx::Error> {
    sqlx::query_as::<_, AssessmentRow>(
        r#"
        INSERT INTO assessments
            (id, user_id, main_goal, age_bracket, current_situation,
             biggest_challenge, learning_pace, skill_level, career_path,
             other_career_path, target_timeframe, learning_style,
             previous_courses, certifications, motivation, hear_about)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
        ON CONFLICT (user_id) DO UPDATE SET
            main_goal = EXCLUDED.main_goal,
            age_bracket = EXCLUDED.age_bracket,
            current_situation = EXCLUDED.current_situation,
            biggest_challenge = EXCLUDED.biggest_challenge,
            learning_pace = EXCLUDED.learning_pace,
            skill_level = EXCLUDED.skill_level,
            career_path = EXCLUDED.career_path,
            other_career_path = EXCLUDED.other_career_path,
            target_timeframe = EXCLUDED.target_timeframe,
            learning_style = EXCLUDED.learning_style,
            previous_courses = EXCLUDED.previous_courses,
            certifications = EXCLUDED.certifications,
            motivation = EXCLUDED.motivation,
            hear_about = EXCLUDED.hear_about,
            updated_at = now()
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&input.main_goal)
    .bind(&input.age_bracket)
    .bind(&input.current_situation)
    .bind(&input.biggest_challenge)
    .bind(&input.learning_pace)
    .bind(input.skill_level)
    .bind(&input.career_path)
    .bind(&input.other_career_path)
    .bind(&input.target_timeframe)
    .bind(&input.learning_style)
    .bind(&input.previous_courses)
    .bind(&input.certifications)
    .bind(&input.motivation)
    .bind(&input.hear_about)
    .fetch_one(executor)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_input() -> AssessmentInput {
        serde_json::from_value(serde_json::json!({
            "main_goal": "switch-career",
            "age_bracket": "27-30",
            "current_situation": "working-non-related",
            "biggest_challenge": "no-experience",
            "learning_pace": "5-10",
            "skill_level": 3,
            "career_path": "web-dev",
            "target_timeframe": "6-months",
            "learning_style": "visual",
            "previous_courses": "building",
            "hear_about": "social"
        }))
        .unwrap()
    }

    #[test]
    fn test_optional_fields_default_to_none() {
        let input = sample_input();
        assert!(input.other_career_path.is_none());
        assert!(input.certifications.is_none());
        assert!(input.motivation.is_none());
    }

    #[test]
    fn test_skill_level_bounds_are_enforced() {
        let mut input = sample_input();
        assert!(input.validate().is_ok());

        input.skill_level = 0;
        assert!(input.validate().is_err());

        input.skill_level = 6;
        assert!(input.validate().is_err());

        input.skill_level = 5;
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_missing_required_field_fails_deserialization() {
        let result: Result<AssessmentInput, _> = serde_json::from_value(serde_json::json!({
            "main_goal": "switch-career"
        }));
        assert!(result.is_err());
    }
}
