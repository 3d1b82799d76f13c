mod auth;
mod config;
mod db;
mod errors;
mod generation;
mod llm_client;
mod models;
mod onboarding;
mod routes;
mod search_client;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, init_schema};
use crate::generation::store::PgRoadmapStore;
use crate::llm_client::GeminiClient;
use crate::routes::build_router;
use crate::search_client::SerpApiClient;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Pathway API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    init_schema(&db).await?;

    // Initialize generation client
    let llm = Arc::new(GeminiClient::new(config.gemini_api_key.clone()));
    info!("Generation client initialized (model: {})", llm_client::MODEL);

    // Initialize job search client
    let search = Arc::new(SerpApiClient::new(config.serpapi_key.clone()));
    info!("Job search client initialized");

    // Postgres-backed store consumed by the roadmap pipeline
    let store = Arc::new(PgRoadmapStore::new(db.clone()));

    // Build app state
    let state = AppState {
        db,
        store,
        search,
        llm,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
