//! Job Search Client — wraps the SerpApi `google_jobs` engine behind the
//! `JobSearchProvider` trait so the market-data fetcher never talks HTTP
//! directly and tests can substitute fakes.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

const SERPAPI_URL: &str = "https://serpapi.com/search";
const ENGINE: &str = "google_jobs";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Region hints for a job search. Configurable at startup; defaults match the
/// original deployment region.
#[derive(Debug, Clone)]
pub struct JobLocale {
    /// Human-readable location, e.g. "Lagos, Nigeria".
    pub location: String,
    /// Interface language hint ("hl"), e.g. "en".
    pub language: String,
    /// Country hint ("gl"), e.g. "ng".
    pub country: String,
}

impl Default for JobLocale {
    fn default() -> Self {
        JobLocale {
            location: "Lagos, Nigeria".to_string(),
            language: "en".to_string(),
            country: "ng".to_string(),
        }
    }
}

/// A single live posting. Providers often omit fields, so both are optional;
/// the digest builder fills placeholders.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobPosting {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("malformed search response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// The job-search provider seam. Held in `AppState` as `Arc<dyn JobSearchProvider>`.
#[async_trait]
pub trait JobSearchProvider: Send + Sync {
    async fn search_jobs(
        &self,
        query: &str,
        locale: &JobLocale,
    ) -> Result<Vec<JobPosting>, SearchError>;
}

#[derive(Debug, Deserialize)]
struct JobsResponse {
    #[serde(default)]
    jobs_results: Vec<JobPosting>,
}

/// The production `JobSearchProvider` backed by SerpApi.
#[derive(Clone)]
pub struct SerpApiClient {
    client: Client,
    api_key: String,
}

impl SerpApiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }
}

#[async_trait]
impl JobSearchProvider for SerpApiClient {
    async fn search_jobs(
        &self,
        query: &str,
        locale: &JobLocale,
    ) -> Result<Vec<JobPosting>, SearchError> {
        let response = self
            .client
            .get(SERPAPI_URL)
            .query(&[
                ("engine", ENGINE),
                ("q", query),
                ("location", locale.location.as_str()),
                ("hl", locale.language.as_str()),
                ("gl", locale.country.as_str()),
                ("api_key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SearchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let parsed: JobsResponse = serde_json::from_str(&body)?;
        Ok(parsed.jobs_results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jobs_response_deserializes_results() {
        let json = r#"{
            "search_metadata": {"status": "Success"},
            "jobs_results": [
                {"title": "Backend Developer", "description": "Rust, Postgres"},
                {"description": "No title on this one"}
            ]
        }"#;
        let parsed: JobsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.jobs_results.len(), 2);
        assert_eq!(
            parsed.jobs_results[0].title.as_deref(),
            Some("Backend Developer")
        );
        assert!(parsed.jobs_results[1].title.is_none());
    }

    #[test]
    fn test_jobs_response_tolerates_missing_results_key() {
        let parsed: JobsResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.jobs_results.is_empty());
    }

    #[test]
    fn test_default_locale_matches_deployment_region() {
        let locale = JobLocale::default();
        assert_eq!(locale.location, "Lagos, Nigeria");
        assert_eq!(locale.language, "en");
        assert_eq!(locale.country, "ng");
    }
}
