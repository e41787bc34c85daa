//! Error types for the report pipeline

use crate::render::RenderError;
use crate::source::SourceError;
use ddr_extract::ExtractError;
use ddr_report::DraftError;
use thiserror::Error;

/// Errors that abort a pipeline run
///
/// Each variant names the stage that failed; the wrapped error carries the
/// stage's own diagnosis (including rate-limit guidance where applicable).
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Reading a source document failed
    #[error("Source document error: {0}")]
    Source(#[from] SourceError),

    /// Structured extraction failed after all attempts
    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    /// Narrative drafting failed
    #[error("Report drafting failed: {0}")]
    Drafting(#[from] DraftError),

    /// Writing the final report failed
    #[error("Report rendering failed: {0}")]
    Render(#[from] RenderError),

    /// The configuration is invalid
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PipelineError {
    /// True when the failure is a model quota/rate-limit condition
    ///
    /// Callers show the embedded guidance text and stop; re-running
    /// immediately will not help.
    pub fn is_rate_limited(&self) -> bool {
        matches!(
            self,
            PipelineError::Extraction(ExtractError::RateLimited(_))
                | PipelineError::Drafting(DraftError::RateLimited(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_detection_spans_stages() {
        let extract = PipelineError::Extraction(ExtractError::RateLimited("quota".to_string()));
        let draft = PipelineError::Drafting(DraftError::RateLimited("quota".to_string()));
        let other = PipelineError::Config("bad".to_string());

        assert!(extract.is_rate_limited());
        assert!(draft.is_rate_limited());
        assert!(!other.is_rate_limited());
    }

    #[test]
    fn test_source_error_converts() {
        let err: PipelineError = SourceError::NotFound("x.txt".into()).into();
        assert!(err.to_string().contains("Document not found"));
    }
}
