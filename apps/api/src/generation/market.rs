//! Market Data Fetcher — reduces live postings for a target role to a compact
//! text digest the roadmap prompt can embed.
//!
//! This component never fails its caller: an empty result set and a provider
//! error each collapse to a static sentinel, so roadmap generation proceeds
//! with a degraded-but-valid digest.

use tracing::warn;

use crate::search_client::{JobLocale, JobPosting, JobSearchProvider};

/// At most this many postings contribute to a digest.
pub const MARKET_SAMPLE_SIZE: usize = 5;

/// Digest when the provider answered but had no postings for the role.
pub const NO_DATA_SENTINEL: &str = "No specific job data found. Use general industry standards.";

/// Digest when the provider call failed outright.
pub const UNAVAILABLE_SENTINEL: &str = "Market data unavailable. Use general best practices.";

const TITLE_FALLBACK: &str = "Unknown Role";
const DESCRIPTION_FALLBACK: &str = "No description";

/// Transient digest of live postings. Scoped to one generation call, never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketDigest(String);

impl MarketDigest {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_postings(postings: &[JobPosting]) -> Self {
        let lines: Vec<String> = postings
            .iter()
            .take(MARKET_SAMPLE_SIZE)
            .map(|job| {
                let title = job.title.as_deref().unwrap_or(TITLE_FALLBACK);
                let desc = job.description.as_deref().unwrap_or(DESCRIPTION_FALLBACK);
                format!("Job: {title} | Requirements: {desc}")
            })
            .collect();

        if lines.is_empty() {
            MarketDigest(NO_DATA_SENTINEL.to_string())
        } else {
            MarketDigest(lines.join("\n"))
        }
    }
}

/// Queries the search provider for `target_role` and digests the results.
/// Absorbs every provider failure into `UNAVAILABLE_SENTINEL`.
pub async fn fetch_market_digest(
    search: &dyn JobSearchProvider,
    target_role: &str,
    locale: &JobLocale,
) -> MarketDigest {
    match search.search_jobs(target_role, locale).await {
        Ok(postings) => MarketDigest::from_postings(&postings),
        Err(e) => {
            warn!("Job search failed for '{target_role}': {e}");
            MarketDigest(UNAVAILABLE_SENTINEL.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search_client::SearchError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeSearch {
        postings: Vec<JobPosting>,
        fail: bool,
        calls: AtomicUsize,
    }

    impl FakeSearch {
        fn with_postings(postings: Vec<JobPosting>) -> Self {
            FakeSearch {
                postings,
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            FakeSearch {
                postings: vec![],
                fail: true,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl JobSearchProvider for FakeSearch {
        async fn search_jobs(
            &self,
            _query: &str,
            _locale: &JobLocale,
        ) -> Result<Vec<JobPosting>, SearchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(SearchError::Api {
                    status: 500,
                    message: "upstream exploded".to_string(),
                });
            }
            Ok(self.postings.clone())
        }
    }

    fn posting(title: &str, desc: &str) -> JobPosting {
        JobPosting {
            title: Some(title.to_string()),
            description: Some(desc.to_string()),
        }
    }

    #[tokio::test]
    async fn test_digest_joins_title_and_requirements_lines() {
        let search = FakeSearch::with_postings(vec![
            posting("Backend Developer", "Rust, Postgres"),
            posting("Platform Engineer", "Kubernetes"),
        ]);
        let digest = fetch_market_digest(&search, "Backend Developer", &JobLocale::default()).await;
        assert_eq!(
            digest.as_str(),
            "Job: Backend Developer | Requirements: Rust, Postgres\n\
             Job: Platform Engineer | Requirements: Kubernetes"
        );
    }

    #[tokio::test]
    async fn test_digest_is_bounded_to_five_postings_in_order() {
        let postings: Vec<JobPosting> = (1..=8).map(|i| posting(&format!("Role {i}"), "x")).collect();
        let search = FakeSearch::with_postings(postings);
        let digest = fetch_market_digest(&search, "role", &JobLocale::default()).await;

        let lines: Vec<&str> = digest.as_str().lines().collect();
        assert_eq!(lines.len(), MARKET_SAMPLE_SIZE);
        assert!(lines[0].starts_with("Job: Role 1 "));
        assert!(lines[4].starts_with("Job: Role 5 "));
    }

    #[tokio::test]
    async fn test_missing_fields_fall_back_to_placeholders() {
        let search = FakeSearch::with_postings(vec![JobPosting::default()]);
        let digest = fetch_market_digest(&search, "role", &JobLocale::default()).await;
        assert_eq!(
            digest.as_str(),
            "Job: Unknown Role | Requirements: No description"
        );
    }

    #[tokio::test]
    async fn test_empty_results_yield_no_data_sentinel() {
        let search = FakeSearch::with_postings(vec![]);
        let digest = fetch_market_digest(&search, "role", &JobLocale::default()).await;
        assert_eq!(digest.as_str(), NO_DATA_SENTINEL);
    }

    #[tokio::test]
    async fn test_provider_error_is_absorbed_into_unavailable_sentinel() {
        let search = FakeSearch::failing();
        let digest = fetch_market_digest(&search, "role", &JobLocale::default()).await;
        assert_eq!(digest.as_str(), UNAVAILABLE_SENTINEL);
        assert_eq!(search.calls.load(Ordering::SeqCst), 1);
    }
}
