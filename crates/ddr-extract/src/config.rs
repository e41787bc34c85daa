//! Configuration for the extraction client

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the extraction client and chunker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Total attempts for one extraction (first call plus retries)
    pub max_attempts: u32,

    /// Maximum characters of each source text embedded in the prompt
    pub excerpt_chars: usize,

    /// Sampling temperature for extraction calls
    pub temperature: f32,

    /// Output-token ceiling for extraction calls
    pub max_output_tokens: u32,

    /// Wall-clock budget for a single model call (seconds)
    pub call_timeout_secs: u64,

    /// Maximum characters per chunk
    pub chunk_size: usize,

    /// Character overlap shared between consecutive chunks
    pub chunk_overlap: usize,
}

impl ExtractorConfig {
    /// Get the per-call timeout as a Duration
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("max_attempts must be greater than 0".to_string());
        }
        if self.excerpt_chars == 0 {
            return Err("excerpt_chars must be greater than 0".to_string());
        }
        if self.chunk_size == 0 {
            return Err("chunk_size must be greater than 0".to_string());
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err("chunk_overlap must be smaller than chunk_size".to_string());
        }
        if self.call_timeout_secs == 0 {
            return Err("call_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            excerpt_chars: 3_000,
            temperature: 0.3,
            max_output_tokens: 8_000,
            call_timeout_secs: 120,
            chunk_size: 4_000,
            chunk_overlap: 300,
        }
    }
}
