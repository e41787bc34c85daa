//! Error types for report drafting

use thiserror::Error;

/// Guidance shown when the model API reports quota or rate-limit
/// exhaustion during drafting.
pub const RATE_LIMIT_GUIDANCE: &str = "\
MODEL RATE LIMIT: the API refused the drafting request due to quota or rate limits.

Solutions:
1. Wait a few minutes and try again
2. Upgrade to a paid tier for higher limits";

/// Errors that can occur while drafting the narrative report
#[derive(Error, Debug)]
pub enum DraftError {
    /// Quota or rate limit exhaustion; carries guidance for direct display
    #[error("{0}")]
    RateLimited(String),

    /// Generic model-call failure
    #[error("Model call failed: {0}")]
    Transport(String),

    /// The drafting call exceeded its wall-clock budget
    #[error("Report drafting timed out")]
    Timeout,
}
