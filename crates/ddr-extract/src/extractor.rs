//! Core extraction client
//!
//! Issues one combined inspection+thermal model call per attempt, parses
//! and validates the response, and retries format/validation failures up to
//! the configured attempt budget. Rate-limit and timeout failures are
//! terminal and surface immediately.

use crate::config::ExtractorConfig;
use crate::error::{ExtractError, RATE_LIMIT_GUIDANCE};
use crate::parser::parse_extraction;
use crate::prompt::PromptBuilder;
use ddr_domain::{CancelToken, ExtractionRecord, FailureClass, FailureKind, GenerateOptions,
    TextGenerator};
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Substrings that identify a quota/rate-limit failure in opaque provider
/// error text. Compatibility shim for transports that do not classify their
/// own failures; typed classification from the provider takes precedence.
const RATE_LIMIT_MARKERS: [&str; 3] = ["quota", "rate_limit", "429"];

/// The extraction client converts raw report text into a structured record
pub struct Extractor<L: TextGenerator> {
    provider: Arc<L>,
    config: ExtractorConfig,
}

impl<L> Extractor<L>
where
    L: TextGenerator + Send + Sync + 'static,
{
    /// Create a new extraction client
    pub fn new(provider: Arc<L>, config: ExtractorConfig) -> Self {
        Self { provider, config }
    }

    /// Extract a structured record from one inspection+thermal text pair
    ///
    /// The caller decides what subset of the source documents to pass; the
    /// prompt embeds at most the configured excerpt of each. Cancellation
    /// is checked before every attempt; once observed, no further attempts
    /// are made.
    pub async fn extract(
        &self,
        inspection_text: &str,
        thermal_text: &str,
        cancel: &CancelToken,
    ) -> Result<ExtractionRecord, ExtractError> {
        let prompt =
            PromptBuilder::new(inspection_text, thermal_text, self.config.excerpt_chars).build();
        let options = GenerateOptions {
            temperature: self.config.temperature,
            max_output_tokens: self.config.max_output_tokens,
        };

        debug!("Extraction prompt length: {} chars", prompt.len());

        let mut last_error = None;

        for attempt in 1..=self.config.max_attempts {
            if cancel.is_cancelled() {
                info!("Cancellation observed, stopping extraction attempts");
                return Err(ExtractError::Cancelled);
            }

            info!(
                "Extraction attempt {}/{}",
                attempt, self.config.max_attempts
            );

            match self.call_model(&prompt, &options).await {
                Ok(response) => {
                    debug!("Model response length: {} chars", response.len());
                    match parse_extraction(&response) {
                        Ok(record) => {
                            info!(
                                "Successfully extracted structured data ({} areas)",
                                record.areas.len()
                            );
                            return Ok(record);
                        }
                        Err(e) if e.is_retryable() => {
                            warn!("Attempt {}: {}", attempt, e);
                            last_error = Some(e);
                        }
                        Err(e) => return Err(e),
                    }
                }
                Err(e) if e.is_retryable() => {
                    warn!("Attempt {}: {}", attempt, e);
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ExtractError::Transport("Attempt budget exhausted without a result".to_string())
        }))
    }

    /// One blocking model call under the configured wall-clock budget
    async fn call_model(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<String, ExtractError> {
        let provider = Arc::clone(&self.provider);
        let prompt = prompt.to_string();
        let options = *options;

        let call = tokio::task::spawn_blocking(move || provider.generate(&prompt, &options));

        match timeout(self.config.call_timeout(), call).await {
            Err(_) => Err(ExtractError::Timeout),
            Ok(Err(join)) => Err(ExtractError::Transport(format!(
                "Task join error: {}",
                join
            ))),
            Ok(Ok(Ok(response))) => Ok(response),
            Ok(Ok(Err(e))) => Err(classify_provider_error(&e)),
        }
    }
}

/// Map a provider error onto the extraction error taxonomy
///
/// Typed classification first; the substring shim catches rate-limit text
/// hidden inside otherwise-generic transport errors.
fn classify_provider_error<E>(error: &E) -> ExtractError
where
    E: std::error::Error + FailureClass,
{
    match error.failure_kind() {
        FailureKind::RateLimited => {
            ExtractError::RateLimited(format!("{}\n\n({})", RATE_LIMIT_GUIDANCE, error))
        }
        FailureKind::Timeout => ExtractError::Timeout,
        FailureKind::Transport => {
            let text = error.to_string();
            let lowered = text.to_lowercase();
            if RATE_LIMIT_MARKERS.iter().any(|m| lowered.contains(m)) {
                ExtractError::RateLimited(format!("{}\n\n({})", RATE_LIMIT_GUIDANCE, text))
            } else {
                ExtractError::Transport(text)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddr_llm::{LlmError, MockProvider};

    const VALID_RESPONSE: &str = r#"{
        "areas": [{
            "area_name": "Hall",
            "inspection_findings": ["Skirting level dampness"],
            "thermal_findings": ["Temperature variation near door"],
            "conflicts": [],
            "missing_info": []
        }]
    }"#;

    fn extractor(provider: MockProvider) -> Extractor<MockProvider> {
        Extractor::new(Arc::new(provider), ExtractorConfig::default())
    }

    #[tokio::test]
    async fn test_extract_success() {
        let provider = MockProvider::new(VALID_RESPONSE);
        let record = extractor(provider)
            .extract("inspection text", "thermal text", &CancelToken::new())
            .await
            .unwrap();

        assert_eq!(record.areas.len(), 1);
        assert_eq!(record.areas[0].area_name, "Hall");
    }

    #[tokio::test]
    async fn test_prompt_embeds_sources() {
        let provider = MockProvider::new(VALID_RESPONSE);
        let ex = extractor(provider.clone());
        ex.extract("dampness near skirting", "cold spot behind wall", &CancelToken::new())
            .await
            .unwrap();

        let prompt = provider.last_prompt().unwrap();
        assert!(prompt.contains("dampness near skirting"));
        assert!(prompt.contains("cold spot behind wall"));
    }

    #[tokio::test]
    async fn test_malformed_then_valid_consumes_one_retry() {
        let provider = MockProvider::new("unused");
        provider.push_response("this is not json");
        provider.push_response(VALID_RESPONSE);

        let record = extractor(provider.clone())
            .extract("i", "t", &CancelToken::new())
            .await
            .unwrap();

        assert_eq!(record.areas[0].area_name, "Hall");
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_format_failure_exhausts_attempts() {
        let provider = MockProvider::new("still not json");
        let err = extractor(provider.clone())
            .extract("i", "t", &CancelToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ExtractError::Format(_)));
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_empty_areas_is_validation_failure() {
        let provider = MockProvider::new(r#"{"areas": []}"#);
        let err = extractor(provider)
            .extract("i", "t", &CancelToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ExtractError::Validation(_)));
    }

    #[tokio::test]
    async fn test_rate_limit_not_retried() {
        let provider = MockProvider::new(VALID_RESPONSE);
        provider.push_error(LlmError::RateLimited("quota exhausted".to_string()));

        let err = extractor(provider.clone())
            .extract("i", "t", &CancelToken::new())
            .await
            .unwrap_err();

        match err {
            ExtractError::RateLimited(guidance) => {
                assert!(guidance.contains("Wait a few minutes"));
            }
            other => panic!("Expected RateLimited, got {:?}", other),
        }
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_rate_limit_detected_via_substring_shim() {
        let provider = MockProvider::new(VALID_RESPONSE);
        provider.push_error(LlmError::Other(
            "backend returned status 429 too many requests".to_string(),
        ));

        let err = extractor(provider.clone())
            .extract("i", "t", &CancelToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ExtractError::RateLimited(_)));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_transport_error_retried_then_succeeds() {
        let provider = MockProvider::new("unused");
        provider.push_error(LlmError::Communication("connection reset".to_string()));
        provider.push_response(VALID_RESPONSE);

        let record = extractor(provider.clone())
            .extract("i", "t", &CancelToken::new())
            .await
            .unwrap();

        assert_eq!(record.areas[0].area_name, "Hall");
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_cancelled_before_first_attempt() {
        let provider = MockProvider::new(VALID_RESPONSE);
        let cancel = CancelToken::new();
        cancel.cancel();

        let err = extractor(provider.clone())
            .extract("i", "t", &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, ExtractError::Cancelled));
        assert_eq!(provider.call_count(), 0);
    }
}
