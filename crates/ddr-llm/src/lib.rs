//! DDR Model Provider Layer
//!
//! Pluggable generative-text-model providers behind the `TextGenerator`
//! trait from `ddr-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: deterministic scripted mock for testing
//! - `GeminiProvider`: hosted Gemini API integration
//!
//! # Examples
//!
//! ```
//! use ddr_llm::MockProvider;
//! use ddr_domain::{GenerateOptions, TextGenerator};
//!
//! let provider = MockProvider::new("Hello from the model!");
//! let result = provider.generate("test prompt", &GenerateOptions::default()).unwrap();
//! assert_eq!(result, "Hello from the model!");
//! ```

#![warn(missing_docs)]

pub mod gemini;

use ddr_domain::{FailureClass, FailureKind, GenerateOptions, TextGenerator};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use gemini::GeminiProvider;

/// Errors that can occur during model operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Response arrived but could not be interpreted
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Quota or rate limit exceeded; carries the provider's own message
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// Transport-level timeout
    #[error("Model call timed out")]
    Timeout,

    /// Requested model does not exist or is not served
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("Model error: {0}")]
    Other(String),
}

impl FailureClass for LlmError {
    fn failure_kind(&self) -> FailureKind {
        match self {
            LlmError::RateLimited(_) => FailureKind::RateLimited,
            LlmError::Timeout => FailureKind::Timeout,
            _ => FailureKind::Transport,
        }
    }
}

/// One scripted step of a [`MockProvider`]
enum MockStep {
    Respond(String),
    Fail(LlmError),
}

/// Mock model provider for deterministic testing
///
/// Returns pre-scripted responses (or errors) in order without any network
/// calls; once the script is exhausted it falls back to a fixed default
/// response. Clones share the same script and counters.
///
/// # Examples
///
/// ```
/// use ddr_llm::MockProvider;
/// use ddr_domain::{GenerateOptions, TextGenerator};
///
/// let provider = MockProvider::new("fallback");
/// provider.push_response("first");
///
/// let options = GenerateOptions::default();
/// assert_eq!(provider.generate("p", &options).unwrap(), "first");
/// assert_eq!(provider.generate("p", &options).unwrap(), "fallback");
/// assert_eq!(provider.call_count(), 2);
/// ```
#[derive(Clone)]
pub struct MockProvider {
    default_response: String,
    script: Arc<Mutex<VecDeque<MockStep>>>,
    call_count: Arc<Mutex<usize>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    /// Create a provider returning a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            script: Arc::new(Mutex::new(VecDeque::new())),
            call_count: Arc::new(Mutex::new(0)),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a response for the next unscripted call
    pub fn push_response(&self, response: impl Into<String>) {
        self.script
            .lock()
            .unwrap()
            .push_back(MockStep::Respond(response.into()));
    }

    /// Queue an error for the next unscripted call
    pub fn push_error(&self, error: LlmError) {
        self.script.lock().unwrap().push_back(MockStep::Fail(error));
    }

    /// Number of times `generate` was called
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// The prompt passed to the most recent `generate` call
    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }

    /// Every prompt passed to `generate`, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl TextGenerator for MockProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str, _options: &GenerateOptions) -> Result<String, Self::Error> {
        *self.call_count.lock().unwrap() += 1;
        self.prompts.lock().unwrap().push(prompt.to_string());

        match self.script.lock().unwrap().pop_front() {
            Some(MockStep::Respond(response)) => Ok(response),
            Some(MockStep::Fail(error)) => Err(error),
            None => Ok(self.default_response.clone()),
        }
    }
}
