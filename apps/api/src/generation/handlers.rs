use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::handlers::fetch_user;
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::generation::orchestrator::{generate_roadmap_for, suggest_job_titles};
use crate::models::roadmap::RoadmapRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateRoadmapRequest {
    pub target_role: String,
}

#[derive(Debug, Serialize)]
pub struct RoadmapResponse {
    pub message: String,
    pub roadmap: RoadmapRow,
}

#[derive(Debug, Serialize)]
pub struct JobTitlesResponse {
    pub job_titles: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RoadmapStatusResponse {
    pub has_roadmap: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roadmap_id: Option<uuid::Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_duration_months: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// POST /api/v1/roadmap/generate
pub async fn handle_generate_roadmap(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<GenerateRoadmapRequest>,
) -> Result<Json<RoadmapResponse>, AppError> {
    if req.target_role.trim().is_empty() {
        return Err(AppError::Validation("Target role is required".to_string()));
    }

    let user = fetch_user(&state.db, auth.user_id).await?;

    let roadmap = generate_roadmap_for(
        state.store.as_ref(),
        state.search.as_ref(),
        state.llm.as_ref(),
        &state.config.market_locale,
        &user,
        req.target_role.trim(),
    )
    .await?;

    Ok(Json(RoadmapResponse {
        message: "Roadmap generated successfully".to_string(),
        roadmap,
    }))
}

/// GET /api/v1/roadmap
pub async fn handle_get_roadmap(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<RoadmapRow>, AppError> {
    let roadmap: Option<RoadmapRow> =
        sqlx::query_as("SELECT * FROM roadmaps WHERE user_id = $1")
            .bind(auth.user_id)
            .fetch_optional(&state.db)
            .await?;

    roadmap.map(Json).ok_or_else(|| {
        AppError::NotFound(
            "No roadmap generated yet. Please complete your assessment first.".to_string(),
        )
    })
}

/// GET /api/v1/roadmap/status
pub async fn handle_roadmap_status(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<RoadmapStatusResponse>, AppError> {
    let roadmap: Option<RoadmapRow> =
        sqlx::query_as("SELECT * FROM roadmaps WHERE user_id = $1")
            .bind(auth.user_id)
            .fetch_optional(&state.db)
            .await?;

    let response = match roadmap {
        Some(r) => RoadmapStatusResponse {
            has_roadmap: true,
            roadmap_id: Some(r.id),
            title: Some(r.title),
            total_duration_months: Some(r.total_duration_months),
            last_updated: Some(r.updated_at),
            message: None,
        },
        None => RoadmapStatusResponse {
            has_roadmap: false,
            roadmap_id: None,
            title: None,
            total_duration_months: None,
            last_updated: None,
            message: Some(
                "No roadmap generated yet. Complete your assessment to get started.".to_string(),
            ),
        },
    };

    Ok(Json(response))
}

/// POST /api/v1/assessment/job-titles
/// Generates 3 suggested titles and persists them onto the assessment row.
pub async fn handle_generate_job_titles(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<JobTitlesResponse>, AppError> {
    let user = fetch_user(&state.db, auth.user_id).await?;

    let titles = suggest_job_titles(state.store.as_ref(), state.llm.as_ref(), &user).await?;

    state
        .store
        .save_recommended_titles(user.id, &titles.join("\n"))
        .await?;

    info!("Stored {} recommended titles for user {}", titles.len(), user.id);
    Ok(Json(JobTitlesResponse { job_titles: titles }))
}
