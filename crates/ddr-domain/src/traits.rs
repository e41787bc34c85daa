//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and
//! infrastructure. Implementations live in other crates (ddr-llm,
//! ddr-pipeline, ddr-cli).

/// Sampling options for a single model call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerateOptions {
    /// Sampling temperature; lower favors determinism
    pub temperature: f32,

    /// Output-token ceiling, sized to avoid truncating the payload
    pub max_output_tokens: u32,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            max_output_tokens: 8_000,
        }
    }
}

/// Coarse classification of a model-call failure
///
/// Produced by the call site itself rather than inferred later from error
/// text. Callers use this to decide retry behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Quota or rate-limit exhaustion; never retried
    RateLimited,

    /// The call exceeded its wall-clock budget; not retried
    Timeout,

    /// Network, auth, or otherwise unclassified failure; retried up to the
    /// attempt budget
    Transport,
}

/// Classify an error into a [`FailureKind`]
///
/// Implemented by provider error types so callers can branch on failure
/// class without string matching.
pub trait FailureClass {
    /// The failure class of this error
    fn failure_kind(&self) -> FailureKind;
}

/// Trait for generative text model operations
///
/// Implemented by the infrastructure layer (ddr-llm). The call blocks until
/// the model returns or the transport-level timeout fires; callers needing
/// a wall-clock budget wrap the call themselves.
pub trait TextGenerator {
    /// Error type for model operations
    type Error: std::error::Error + FailureClass + Send + Sync + 'static;

    /// Generate a text completion for the given prompt
    fn generate(&self, prompt: &str, options: &GenerateOptions) -> Result<String, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = GenerateOptions::default();
        assert!(options.temperature > 0.0);
        assert!(options.max_output_tokens >= 1_000);
    }
}
