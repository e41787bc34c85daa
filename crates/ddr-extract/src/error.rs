//! Error types for the extraction client

use thiserror::Error;

/// Guidance shown to the end user when the model API reports quota or
/// rate-limit exhaustion. Rate-limit failures are never retried.
pub const RATE_LIMIT_GUIDANCE: &str = "\
MODEL RATE LIMIT: the API refused the request due to quota or rate limits.

Solutions:
1. Wait a few minutes and try again
2. Use smaller input documents
3. Upgrade to a paid tier for higher limits";

/// Errors that can occur during structured extraction
#[derive(Error, Debug)]
pub enum ExtractError {
    /// No recoverable JSON could be located in the model response
    #[error("Invalid response format: {0}")]
    Format(String),

    /// Parsed JSON lacks the required extraction shape
    #[error("Invalid extraction structure: {0}")]
    Validation(String),

    /// Quota or rate limit exhaustion; carries guidance for direct display
    #[error("{0}")]
    RateLimited(String),

    /// Generic model-call failure (network, auth, unknown)
    #[error("Model call failed: {0}")]
    Transport(String),

    /// The model call exceeded its wall-clock budget
    #[error("Extraction timed out")]
    Timeout,

    /// Cancellation was requested mid-run
    #[error("Extraction cancelled")]
    Cancelled,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ExtractError {
    /// Whether the extraction client may consume a retry attempt on this
    /// error. Rate-limit, timeout, and cancellation are terminal.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ExtractError::Format(_) | ExtractError::Validation(_) | ExtractError::Transport(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classes() {
        assert!(ExtractError::Format("x".into()).is_retryable());
        assert!(ExtractError::Validation("x".into()).is_retryable());
        assert!(ExtractError::Transport("x".into()).is_retryable());
        assert!(!ExtractError::RateLimited("x".into()).is_retryable());
        assert!(!ExtractError::Timeout.is_retryable());
        assert!(!ExtractError::Cancelled.is_retryable());
    }
}
