//! Configuration for the report pipeline

use ddr_extract::ExtractorConfig;
use ddr_report::DrafterConfig;
use serde::{Deserialize, Serialize};

/// Configuration for one report run
///
/// The chunk-selection fields implement the request-budget policy: only the
/// first chunks of each source go to the model, hard-capped by character
/// count. Any truncation is signaled on the run outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Extraction client settings (also carries chunker settings)
    pub extractor: ExtractorConfig,

    /// Narrative drafting settings
    pub drafter: DrafterConfig,

    /// How many leading chunks of each source are sent to the model
    pub max_chunks_per_source: usize,

    /// Hard cap on the combined per-source text sent to the model
    pub max_prompt_chars: usize,
}

impl PipelineConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        self.extractor.validate()?;
        self.drafter.validate()?;
        if self.max_chunks_per_source == 0 {
            return Err("max_chunks_per_source must be greater than 0".to_string());
        }
        if self.max_prompt_chars == 0 {
            return Err("max_prompt_chars must be greater than 0".to_string());
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

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            extractor: ExtractorConfig::default(),
            drafter: DrafterConfig::default(),
            max_chunks_per_source: 2,
            max_prompt_chars: 12_000,
        }
    }
}
