//! Configuration for the report drafter

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the narrative drafting call
///
/// The narrative is typically longer than the structured extraction, so the
/// defaults use a lower temperature and a larger output-token ceiling than
/// the extraction client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrafterConfig {
    /// Sampling temperature for the drafting call
    pub temperature: f32,

    /// Output-token ceiling for the drafting call
    pub max_output_tokens: u32,

    /// Wall-clock budget for the drafting call (seconds)
    pub call_timeout_secs: u64,
}

impl DrafterConfig {
    /// Get the call timeout as a Duration
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_output_tokens == 0 {
            return Err("max_output_tokens must be greater than 0".to_string());
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

impl Default for DrafterConfig {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            max_output_tokens: 10_000,
            call_timeout_secs: 180,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(DrafterConfig::default().validate().is_ok());
    }

    #[test]
    fn test_drafting_runs_cooler_and_longer_than_extraction() {
        let config = DrafterConfig::default();
        assert!(config.temperature < 0.3);
        assert!(config.max_output_tokens > 8_000);
    }

    #[test]
    fn test_zero_timeout_invalid() {
        let mut config = DrafterConfig::default();
        config.call_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = DrafterConfig::default();
        let parsed = DrafterConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(config.max_output_tokens, parsed.max_output_tokens);
        assert_eq!(config.call_timeout_secs, parsed.call_timeout_secs);
    }
}
