//! Roadmap Orchestrator — sequences the full generation pipeline.
//!
//! Flow: get_assessment → assemble profile → fetch market digest →
//!       build prompt → generate (strict JSON) → parse → upsert roadmap.
//!
//! Each step's failure mode is a distinct `RoadmapError` variant; nothing is
//! persisted until the parse succeeds, so a failed invocation is always safe
//! to retry.

use thiserror::Error;
use tracing::info;

use crate::generation::market::fetch_market_digest;
use crate::generation::parser::{parse_job_titles, parse_roadmap, RoadmapPayload};
use crate::generation::profile::UserProfile;
use crate::generation::prompts::{build_job_title_prompt, build_roadmap_prompt};
use crate::generation::store::{RoadmapFields, RoadmapStore};
use crate::llm_client::{GenerationError, OutputMode, TextGenerator};
use crate::models::roadmap::RoadmapRow;
use crate::models::user::UserRow;
use crate::search_client::{JobLocale, JobSearchProvider};

/// Weeks per month used when folding phase estimates into a total duration.
const WEEKS_PER_MONTH: u32 = 4;

/// Typed pipeline failure. The HTTP boundary maps these to status codes;
/// market-data failures never appear here — they are absorbed into a
/// degraded digest before this layer.
#[derive(Debug, Error)]
pub enum RoadmapError {
    /// Precondition: the user has not completed the onboarding assessment.
    /// Short-circuits before any external call.
    #[error("no assessment on file for this user")]
    AssessmentMissing,

    /// The generation provider call failed or returned nothing. Safe to
    /// retry — nothing was persisted.
    #[error("generation provider failed: {0}")]
    GenerationFailed(#[from] GenerationError),

    /// The provider returned text that is not a valid roadmap. Carries the
    /// raw output for operator diagnosis. Safe to retry.
    #[error("malformed roadmap output: {message}")]
    MalformedRoadmap { message: String, raw: String },

    /// Persistence errors pass through untouched; fatal for this request.
    #[error("storage error: {0}")]
    Store(#[from] sqlx::Error),
}

/// Runs the roadmap pipeline for one user and persists the result.
pub async fn generate_roadmap_for(
    store: &dyn RoadmapStore,
    search: &dyn JobSearchProvider,
    llm: &dyn TextGenerator,
    locale: &JobLocale,
    user: &UserRow,
    target_role: &str,
) -> Result<RoadmapRow, RoadmapError> {
    // Step 1: precondition — an assessment must exist
    let assessment = store
        .get_assessment(user.id)
        .await?
        .ok_or(RoadmapError::AssessmentMissing)?;
    let assessment_id = assessment.id;
    let skill_level = assessment.skill_level;

    // Step 2: assemble profile
    let profile = UserProfile::assemble(user, assessment);

    // Step 3: market digest (degrades to a sentinel, never aborts)
    let digest = fetch_market_digest(search, target_role, locale).await;

    // Step 4: prompt
    let prompt = build_roadmap_prompt(&profile, target_role, &digest);

    // Step 5: generation in strict-JSON mode
    info!("Generating roadmap for user {} ({target_role})", user.id);
    let raw = llm.generate(&prompt, OutputMode::StrictJson).await?;

    // Step 6: parse
    let payload = parse_roadmap(&raw).map_err(|e| RoadmapError::MalformedRoadmap {
        message: e.message,
        raw: e.raw,
    })?;

    // Step 7: upsert — the only write, performed after a successful parse
    let fields = roadmap_fields(assessment_id, target_role, skill_level, &payload);
    let roadmap = store.upsert_roadmap(user.id, fields).await?;

    info!(
        "Stored roadmap {} ({} phases) for user {}",
        roadmap.id,
        payload.phases.len(),
        user.id
    );
    Ok(roadmap)
}

/// Suggests job titles from the user's profile in free-text mode.
/// Returns a typed failure instead of collapsing provider errors to nothing,
/// so callers can tell "provider down" from "empty but valid".
pub async fn suggest_job_titles(
    store: &dyn RoadmapStore,
    llm: &dyn TextGenerator,
    user: &UserRow,
) -> Result<Vec<String>, RoadmapError> {
    let assessment = store
        .get_assessment(user.id)
        .await?
        .ok_or(RoadmapError::AssessmentMissing)?;

    let profile = UserProfile::assemble(user, assessment);
    let prompt = build_job_title_prompt(&profile);

    info!("Generating job titles for user {}", user.id);
    let raw = llm.generate(&prompt, OutputMode::FreeText).await?;

    Ok(parse_job_titles(&raw))
}

/// Maps a parsed payload onto roadmap columns.
fn roadmap_fields(
    assessment_id: uuid::Uuid,
    target_role: &str,
    skill_level: i16,
    payload: &RoadmapPayload,
) -> RoadmapFields {
    RoadmapFields {
        assessment_id,
        title: format!("{target_role} Roadmap"),
        description: payload.roadmap_summary.clone(),
        roadmap: serde_json::to_value(payload).unwrap_or_default(),
        total_duration_months: months_from_weeks(payload.total_weeks()),
        difficulty_level: difficulty_for(skill_level).to_string(),
    }
}

/// Rounds a week total up to whole months, at least one.
fn months_from_weeks(weeks: u32) -> i32 {
    (weeks.div_ceil(WEEKS_PER_MONTH).max(1)) as i32
}

/// Difficulty label from the self-reported 1-5 skill level.
fn difficulty_for(skill_level: i16) -> &'static str {
    match skill_level {
        i16::MIN..=2 => "beginner",
        3 => "intermediate",
        _ => "advanced",
    }
}
