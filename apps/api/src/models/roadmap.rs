use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// One generated roadmap per user. Regeneration overwrites the content and
/// bumps `updated_at`; the row identity is stable.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RoadmapRow {
    pub id: Uuid,
    pub user_id: Uuid,
    /// The assessment this roadmap was derived from.
    pub assessment_id: Uuid,
    pub title: String,
    pub description: String,
    /// Full structured payload as returned by the generation pipeline
    /// (summary, skills-gap list, phases).
    pub roadmap: Value,
    pub total_duration_months: i32,
    pub difficulty_level: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
