use anyhow::{Context, Result};

use crate::search_client::JobLocale;

/// Application configuration loaded from environment variables.
/// All secrets (database URL, JWT secret, provider API keys) are injected at
/// startup; none are ever literal values in source.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiry_mins: i64,
    pub gemini_api_key: String,
    pub serpapi_key: String,
    /// Region hints used for job-market searches.
    pub market_locale: JobLocale,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            jwt_secret: require_env("JWT_SECRET")?,
            jwt_expiry_mins: std::env::var("JWT_EXPIRY_MINS")
                .unwrap_or_else(|_| "60".to_string())
                .parse::<i64>()
                .context("JWT_EXPIRY_MINS must be a number of minutes")?,
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            serpapi_key: require_env("SERPAPI_KEY")?,
            market_locale: JobLocale {
                location: env_or("MARKET_LOCATION", "Lagos, Nigeria"),
                language: env_or("MARKET_LANGUAGE", "en"),
                country: env_or("MARKET_COUNTRY", "ng"),
            },
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
