pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth_handlers;
use crate::generation::handlers as roadmap_handlers;
use crate::onboarding::handlers as onboarding_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Auth
        .route("/api/v1/auth/signup", post(auth_handlers::handle_signup))
        .route("/api/v1/auth/login", post(auth_handlers::handle_login))
        .route("/api/v1/auth/me", get(auth_handlers::handle_me))
        // Onboarding assessment
        .route(
            "/api/v1/assessment",
            post(onboarding_handlers::handle_submit_assessment)
                .get(onboarding_handlers::handle_get_assessment),
        )
        .route(
            "/api/v1/assessment/job-titles",
            post(roadmap_handlers::handle_generate_job_titles),
        )
        // Roadmap
        .route("/api/v1/roadmap", get(roadmap_handlers::handle_get_roadmap))
        .route(
            "/api/v1/roadmap/status",
            get(roadmap_handlers::handle_roadmap_status),
        )
        .route(
            "/api/v1/roadmap/generate",
            post(roadmap_handlers::handle_generate_roadmap),
        )
        .with_state(state)
}
