//! Persistence seam for the roadmap pipeline.
//!
//! The orchestrator only sees this trait, held in `AppState` as
//! `Arc<dyn RoadmapStore>`, so tests drive the pipeline against in-memory
//! fakes with call-count assertions. `PgRoadmapStore` is the production
//! implementation.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::assessment::AssessmentRow;
use crate::models::roadmap::RoadmapRow;

/// Column values for a roadmap upsert. Keyed by user; one row per user.
#[derive(Debug, Clone)]
pub struct RoadmapFields {
    pub assessment_id: Uuid,
    pub title: String,
    pub description: String,
    pub roadmap: Value,
    pub total_duration_months: i32,
    pub difficulty_level: String,
}

#[async_trait]
pub trait RoadmapStore: Send + Sync {
    async fn get_assessment(&self, user_id: Uuid) -> Result<Option<AssessmentRow>, sqlx::Error>;

    /// Create-or-overwrite the user's roadmap. An existing row keeps its
    /// identity; its content is replaced and `updated_at` bumped.
    async fn upsert_roadmap(
        &self,
        user_id: Uuid,
        fields: RoadmapFields,
    ) -> Result<RoadmapRow, sqlx::Error>;

    /// Persist generated job-title suggestions onto the assessment row.
    async fn save_recommended_titles(
        &self,
        user_id: Uuid,
        titles: &str,
    ) -> Result<(), sqlx::Error>;
}

pub struct PgRoadmapStore {
    pool: PgPool,
}

impl PgRoadmapStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoadmapStore for PgRoadmapStore {
    async fn get_assessment(&self, user_id: Uuid) -> Result<Option<AssessmentRow>, sqlx::Error> {
        sqlx::query_as::<_, AssessmentRow>("SELECT * FROM assessments WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn upsert_roadmap(
        &self,
        user_id: Uuid,
        fields: RoadmapFields,
    ) -> Result<RoadmapRow, sqlx::Error> {
        sqlx::query_as::<_, RoadmapRow>(
            r#"
            INSERT INTO roadmaps
                (id, user_id, assessment_id, title, description, roadmap,
                 total_duration_months, difficulty_level)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (user_id) DO UPDATE SET
                assessment_id = EXCLUDED.assessment_id,
                title = EXCLUDED.title,
                description = EXCLUDED.description,
                roadmap = EXCLUDED.roadmap,
                total_duration_months = EXCLUDED.total_duration_months,
                difficulty_level = EXCLUDED.difficulty_level,
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(fields.assessment_id)
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.roadmap)
        .bind(fields.total_duration_months)
        .bind(&fields.difficulty_level)
        .fetch_one(&self.pool)
        .await
    }

    async fn save_recommended_titles(
        &self,
        user_id: Uuid,
        titles: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE assessments SET recommended_job_titles = $2, updated_at = now() WHERE user_id = $1",
        )
        .bind(user_id)
        .bind(titles)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
