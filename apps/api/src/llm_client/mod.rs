/// LLM Client — the single point of entry for all generative-text calls in Pathway.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// All generation MUST go through the `TextGenerator` trait, held in `AppState`
/// as `Arc<dyn TextGenerator>` so tests can substitute fakes.
///
/// Model: gemini-2.5-flash (hardcoded — do not make configurable to prevent drift)
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// The model used for all generation calls in Pathway.
pub const MODEL: &str = "gemini-2.5-flash";
const REQUEST_TIMEOUT_SECS: u64 = 30;
/// One retry on transient failures (transport error, 429, 5xx).
const MAX_ATTEMPTS: u32 = 2;

/// Declared output contract for a generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Plain text, parsed line-wise by the caller.
    FreeText,
    /// The provider is asked for a JSON response MIME type so it emits
    /// parseable JSON itself.
    StrictJson,
}

/// Classified generation failure. The pipeline never sees a raw transport
/// error or an opaque panic — only one of these.
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("provider returned no text")]
    EmptyResponse,
}

/// The generative-text provider seam.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, mode: OutputMode) -> Result<String, GenerationError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
}

impl<'a> GeminiRequest<'a> {
    fn new(prompt: &'a str, mode: OutputMode) -> Self {
        GeminiRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: match mode {
                OutputMode::FreeText => None,
                OutputMode::StrictJson => Some(GenerationConfig {
                    response_mime_type: "application/json",
                }),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiResponse {
    /// Extracts the text of the first candidate part that carries any.
    fn text(&self) -> Option<&str> {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|c| c.parts.iter())
            .find_map(|p| p.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// The production `TextGenerator` backed by the Gemini generateContent API.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
}

impl GeminiClient {
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
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str, mode: OutputMode) -> Result<String, GenerationError> {
        let request_body = GeminiRequest::new(prompt, mode);
        let url = format!("{GEMINI_API_URL}/{MODEL}:generateContent");

        let mut last_error: Option<GenerationError> = None;

        for attempt in 0..MAX_ATTEMPTS {
            if attempt > 0 {
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "Generation attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .header("content-type", "application/json")
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(GenerationError::Provider {
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Gemini API returned {}: {}", status, body);
                last_error = Some(GenerationError::Provider {
                    message: format!("status {status}: {body}"),
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                // Prefer the structured error message when the body parses
                let message = serde_json::from_str::<GeminiError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(GenerationError::Provider {
                    message: format!("status {status}: {message}"),
                });
            }

            let parsed: GeminiResponse =
                response
                    .json()
                    .await
                    .map_err(|e| GenerationError::Provider {
                        message: format!("unreadable response body: {e}"),
                    })?;

            let text = match parsed.text() {
                Some(t) if !t.trim().is_empty() => t.to_string(),
                _ => return Err(GenerationError::EmptyResponse),
            };

            debug!("Generation call succeeded ({} chars)", text.len());
            return Ok(text);
        }

        Err(last_error.unwrap_or(GenerationError::Provider {
            message: format!("gave up after {MAX_ATTEMPTS} attempts"),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_json_mode_sets_response_mime_type() {
        let request = GeminiRequest::new("prompt", OutputMode::StrictJson);
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }

    #[test]
    fn test_free_text_mode_omits_generation_config() {
        let request = GeminiRequest::new("prompt", OutputMode::FreeText);
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("generationConfig").is_none());
        assert_eq!(value["contents"][0]["parts"][0]["text"], "prompt");
    }

    #[test]
    fn test_response_text_extraction() {
        let json = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "Backend Developer"}]}}
            ]
        }"#;
        let response: GeminiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text(), Some("Backend Developer"));
    }

    #[test]
    fn test_response_without_candidates_has_no_text() {
        let response: GeminiResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.text(), None);
    }

    #[test]
    fn test_response_skips_textless_parts() {
        let json = r#"{
            "candidates": [
                {"content": {"parts": [{}, {"text": "second part"}]}}
            ]
        }"#;
        let response: GeminiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text(), Some("second part"));
    }
}
