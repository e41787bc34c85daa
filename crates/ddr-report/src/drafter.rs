//! Narrative report drafting client

use crate::config::DrafterConfig;
use crate::error::{DraftError, RATE_LIMIT_GUIDANCE};
use crate::prompt::build_report_prompt;
use ddr_domain::{FailureClass, FailureKind, GenerateOptions, MergedRecord, TextGenerator};
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info};

/// Substrings identifying a quota/rate-limit failure in opaque provider
/// error text; same compatibility shim as the extraction client.
const RATE_LIMIT_MARKERS: [&str; 3] = ["quota", "rate_limit", "429"];

/// Drafts the final narrative report from a merged record
pub struct ReportDrafter<L: TextGenerator> {
    provider: Arc<L>,
    config: DrafterConfig,
}

impl<L> ReportDrafter<L>
where
    L: TextGenerator + Send + Sync + 'static,
{
    /// Create a new report drafter
    pub fn new(provider: Arc<L>, config: DrafterConfig) -> Self {
        Self { provider, config }
    }

    /// Draft the DDR narrative for a merged record
    ///
    /// One model call; no retries at this stage. Rate-limit failures carry
    /// guidance text for direct display, other failures propagate.
    pub async fn draft(&self, merged: &MergedRecord) -> Result<String, DraftError> {
        let prompt = build_report_prompt(merged);
        let options = GenerateOptions {
            temperature: self.config.temperature,
            max_output_tokens: self.config.max_output_tokens,
        };

        debug!("Drafting prompt length: {} chars", prompt.len());
        info!("Generating DDR narrative for {} areas", merged.areas.len());

        let provider = Arc::clone(&self.provider);
        let call = tokio::task::spawn_blocking(move || provider.generate(&prompt, &options));

        let narrative = match timeout(self.config.call_timeout(), call).await {
            Err(_) => return Err(DraftError::Timeout),
            Ok(Err(join)) => {
                return Err(DraftError::Transport(format!("Task join error: {}", join)))
            }
            Ok(Ok(Ok(narrative))) => narrative,
            Ok(Ok(Err(e))) => return Err(classify_provider_error(&e)),
        };

        info!("DDR narrative generated: {} chars", narrative.len());
        Ok(narrative)
    }
}

fn classify_provider_error<E>(error: &E) -> DraftError
where
    E: std::error::Error + FailureClass,
{
    match error.failure_kind() {
        FailureKind::RateLimited => {
            DraftError::RateLimited(format!("{}\n\n({})", RATE_LIMIT_GUIDANCE, error))
        }
        FailureKind::Timeout => DraftError::Timeout,
        FailureKind::Transport => {
            let text = error.to_string();
            let lowered = text.to_lowercase();
            if RATE_LIMIT_MARKERS.iter().any(|m| lowered.contains(m)) {
                DraftError::RateLimited(format!("{}\n\n({})", RATE_LIMIT_GUIDANCE, text))
            } else {
                DraftError::Transport(text)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddr_domain::AreaRecord;
    use ddr_llm::{LlmError, MockProvider};

    fn merged() -> MergedRecord {
        let mut hall = AreaRecord::new("Hall");
        hall.inspection_findings
            .push("Active leakage near ceiling".to_string());
        MergedRecord { areas: vec![hall] }
    }

    fn drafter(provider: MockProvider) -> ReportDrafter<MockProvider> {
        ReportDrafter::new(Arc::new(provider), DrafterConfig::default())
    }

    #[tokio::test]
    async fn test_draft_returns_narrative() {
        let provider = MockProvider::new("PROPERTY ISSUE SUMMARY\nAll fine.");
        let narrative = drafter(provider).draft(&merged()).await.unwrap();
        assert!(narrative.contains("PROPERTY ISSUE SUMMARY"));
    }

    #[tokio::test]
    async fn test_draft_prompt_carries_merged_data() {
        let provider = MockProvider::new("ok");
        drafter(provider.clone()).draft(&merged()).await.unwrap();

        let prompt = provider.last_prompt().unwrap();
        assert!(prompt.contains("Active leakage near ceiling"));
        assert!(prompt.contains("SEVERITY GUIDELINES"));
    }

    #[tokio::test]
    async fn test_draft_rate_limit_surfaces_guidance() {
        let provider = MockProvider::new("unused");
        provider.push_error(LlmError::RateLimited("free tier exceeded".to_string()));

        let err = drafter(provider).draft(&merged()).await.unwrap_err();
        match err {
            DraftError::RateLimited(guidance) => {
                assert!(guidance.contains("Wait a few minutes"));
            }
            other => panic!("Expected RateLimited, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_draft_transport_error_propagates() {
        let provider = MockProvider::new("unused");
        provider.push_error(LlmError::Communication("connection refused".to_string()));

        let err = drafter(provider.clone()).draft(&merged()).await.unwrap_err();
        assert!(matches!(err, DraftError::Transport(_)));
        // One call, no retries at the drafting stage.
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_draft_shim_classifies_quota_text() {
        let provider = MockProvider::new("unused");
        provider.push_error(LlmError::Other("insufficient quota remaining".to_string()));

        let err = drafter(provider).draft(&merged()).await.unwrap_err();
        assert!(matches!(err, DraftError::RateLimited(_)));
    }
}
