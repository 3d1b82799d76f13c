use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::generation::store::RoadmapStore;
use crate::llm_client::TextGenerator;
use crate::search_client::JobSearchProvider;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// The provider and store seams are trait objects constructed once at startup
/// and dependency-injected here, never ambient globals, so tests can substitute
/// fakes.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Assessment/roadmap persistence used by the generation pipeline.
    pub store: Arc<dyn RoadmapStore>,
    /// External job-search provider (SerpApi in production).
    pub search: Arc<dyn JobSearchProvider>,
    /// External generative-text provider (Gemini in production).
    pub llm: Arc<dyn TextGenerator>,
    pub config: Config,
}
