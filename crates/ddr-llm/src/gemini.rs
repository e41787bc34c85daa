//! Gemini Provider Implementation
//!
//! Integration with the hosted Gemini `generateContent` API.
//!
//! # Features
//!
//! - Async HTTP communication via reqwest
//! - Configurable endpoint and model
//! - Retry with exponential backoff for transient transport failures
//! - Rate-limit responses surfaced as a distinct, non-retried error
//!
//! # Examples
//!
//! ```no_run
//! use ddr_llm::GeminiProvider;
//!
//! let provider = GeminiProvider::new("api-key", "gemini-2.5-flash");
//! ```

use crate::LlmError;
use ddr_domain::{GenerateOptions, TextGenerator};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default Gemini API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default transport-level timeout for model requests (120 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default number of attempts for transient transport failures
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Hosted Gemini provider
///
/// Rate-limit responses (HTTP 429 or a quota message in the error body) are
/// returned immediately as [`LlmError::RateLimited`] and never retried here;
/// other HTTP and network failures are retried with exponential backoff.
pub struct GeminiProvider {
    endpoint: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
    max_retries: u32,
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GeminiProvider {
    /// Create a new Gemini provider with the default endpoint
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT, api_key, model)
    }

    /// Create a provider against a non-default endpoint (e.g. a local stub)
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: model.into(),
            client,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Set the maximum number of attempts for transient failures
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// The model this provider is configured for
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate a completion using the Gemini API
    ///
    /// # Errors
    ///
    /// - [`LlmError::RateLimited`] on HTTP 429 or a quota error body
    /// - [`LlmError::ModelNotAvailable`] on HTTP 404
    /// - [`LlmError::Timeout`] when the transport timeout fires
    /// - [`LlmError::Communication`] for other transport failures after
    ///   retries are exhausted
    pub async fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<String, LlmError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.endpoint, self.model
        );

        let request_body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: options.temperature,
                max_output_tokens: options.max_output_tokens,
            },
        };

        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .json(&request_body)
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let parsed = response
                            .json::<GenerateContentResponse>()
                            .await
                            .map_err(|e| {
                                LlmError::InvalidResponse(format!(
                                    "Failed to parse response: {}",
                                    e
                                ))
                            })?;
                        return extract_candidate_text(parsed);
                    } else if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        let body = response.text().await.unwrap_or_default();
                        return Err(LlmError::RateLimited(format!("HTTP 429: {}", body)));
                    } else if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(LlmError::ModelNotAvailable(self.model.clone()));
                    } else {
                        let body = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Unknown error".to_string());
                        // Quota exhaustion sometimes arrives as a 400-class
                        // body rather than a 429 status.
                        let lowered = body.to_lowercase();
                        if lowered.contains("quota") || lowered.contains("rate_limit") {
                            return Err(LlmError::RateLimited(format!(
                                "HTTP {}: {}",
                                status, body
                            )));
                        }
                        last_error =
                            Some(LlmError::Communication(format!("HTTP {}: {}", status, body)));
                    }
                }
                Err(e) if e.is_timeout() => {
                    return Err(LlmError::Timeout);
                }
                Err(e) => {
                    last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                warn!(
                    "Gemini call failed (attempt {}/{}), retrying in {:?}",
                    attempts, self.max_retries, delay
                );
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
    }
}

fn extract_candidate_text(response: GenerateContentResponse) -> Result<String, LlmError> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::InvalidResponse("Response contained no candidates".to_string()))?;

    let text: String = candidate
        .content
        .parts
        .into_iter()
        .map(|p| p.text)
        .collect();

    if text.is_empty() {
        return Err(LlmError::InvalidResponse(
            "Candidate contained no text parts".to_string(),
        ));
    }

    debug!("Gemini response length: {} chars", text.len());
    Ok(text)
}

impl TextGenerator for GeminiProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str, options: &GenerateOptions) -> Result<String, Self::Error> {
        // Blocking wrapper for the async call; callers run this on a
        // dedicated worker (spawn_blocking), never on the async runtime.
        tokio::runtime::Runtime::new()
            .map_err(|e| LlmError::Other(format!("Failed to create runtime: {}", e)))?
            .block_on(async { self.generate(prompt, options).await })
    }
}
