//! Prompt Builder — deterministic rendering of the two generation requests.
//! Pure formatting; byte-identical output for identical inputs.

use crate::generation::market::MarketDigest;
use crate::generation::profile::UserProfile;

/// Job-title prompt template. Replace `{profile_text}` before sending.
const JOB_TITLE_PROMPT_TEMPLATE: &str = r#"Based on the following user profile, suggest exactly 3 job titles that would be suitable for this person.

User Profile:
{profile_text}

Return ONLY the 3 job titles, one per line. No numbering, no explanations, just the job titles."#;

/// Roadmap prompt template.
/// Replace: {target_role}, {profile_json}, {market_digest}
const ROADMAP_PROMPT_TEMPLATE: &str = r#"Act as a Senior Technical Career Architect.

[INPUT DATA]
1. TARGET ROLE: {target_role}
2. USER PROFILE (JSON):
{profile_json}

3. REAL-TIME MARKET DEMAND (live job listings):
{market_digest}

[INSTRUCTIONS]
- Compare the User Profile against the Market Demand.
- Identify gaps: where the market demands a skill the user does not have, prioritize learning it.
- Structure a 6-phase roadmap to bridge the gap.

[OUTPUT FORMAT]
Return ONLY valid JSON. Do not include markdown formatting (like ```json).
Structure:
{
    "roadmap_summary": "string",
    "skills_gap_analysis": ["skill1", "skill2"],
    "phases": [
        {
            "phase_title": "string",
            "estimated_weeks": 4,
            "topics": ["topic1", "topic2"],
            "action_item": "Build X project"
        }
    ]
}"#;

pub fn build_job_title_prompt(profile: &UserProfile) -> String {
    JOB_TITLE_PROMPT_TEMPLATE.replace("{profile_text}", &profile.profile_text())
}

pub fn build_roadmap_prompt(
    profile: &UserProfile,
    target_role: &str,
    digest: &MarketDigest,
) -> String {
    let profile_json = serde_json::to_string_pretty(&profile.to_json())
        .unwrap_or_else(|_| "{}".to_string());

    ROADMAP_PROMPT_TEMPLATE
        .replace("{target_role}", target_role)
        .replace("{profile_json}", &profile_json)
        .replace("{market_digest}", digest.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::market::{fetch_market_digest, NO_DATA_SENTINEL};
    use crate::models::assessment::sample_assessment;
    use crate::models::user::sample_user;
    use crate::search_client::{JobLocale, JobPosting, JobSearchProvider, SearchError};
    use async_trait::async_trait;

    struct EmptySearch;

    #[async_trait]
    impl JobSearchProvider for EmptySearch {
        async fn search_jobs(
            &self,
            _query: &str,
            _locale: &JobLocale,
        ) -> Result<Vec<JobPosting>, SearchError> {
            Ok(vec![])
        }
    }

    fn sample_profile() -> UserProfile {
        let user = sample_user();
        let assessment = sample_assessment(user.id);
        UserProfile::assemble(&user, assessment)
    }

    async fn empty_digest() -> MarketDigest {
        fetch_market_digest(&EmptySearch, "role", &JobLocale::default()).await
    }

    #[test]
    fn test_job_title_prompt_embeds_profile_and_instruction() {
        let prompt = build_job_title_prompt(&sample_profile());
        assert!(prompt.contains("Main Goal: switch-career"));
        assert!(prompt.contains("Return ONLY the 3 job titles, one per line."));
    }

    #[test]
    fn test_job_title_prompt_is_deterministic() {
        let profile = sample_profile();
        assert_eq!(
            build_job_title_prompt(&profile),
            build_job_title_prompt(&profile)
        );
    }

    #[tokio::test]
    async fn test_roadmap_prompt_embeds_all_sections() {
        let digest = empty_digest().await;
        let prompt = build_roadmap_prompt(&sample_profile(), "Backend Developer", &digest);

        assert!(prompt.contains("TARGET ROLE: Backend Developer"));
        assert!(prompt.contains("\"career_path\": \"web-dev\""));
        assert!(prompt.contains(NO_DATA_SENTINEL));
        assert!(prompt.contains("Structure a 6-phase roadmap"));
        assert!(prompt.contains("Do not include markdown formatting"));
        assert!(prompt.contains("\"roadmap_summary\""));
        assert!(prompt.contains("\"skills_gap_analysis\""));
        assert!(prompt.contains("\"estimated_weeks\""));
    }

    #[tokio::test]
    async fn test_roadmap_prompt_is_deterministic() {
        let profile = sample_profile();
        let digest = empty_digest().await;
        let a = build_roadmap_prompt(&profile, "Backend Developer", &digest);
        let b = build_roadmap_prompt(&profile, "Backend Developer", &digest);
        assert_eq!(a, b);
    }
}
