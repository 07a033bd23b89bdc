use serde::Deserialize;
use std::fs;
use crate::error::{ExtractorError, Result};

/// Tuning knobs for the extraction pipeline. Everything has a sensible
/// default so the pipeline works without a config file present.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Maximum candidate blocks emitted per document; extras are dropped.
    pub max_blocks: usize,
    /// Lines shorter than this are treated as fragments, not description.
    pub description_min_line_len: usize,
    /// Lines longer than this are treated as boilerplate, not description.
    pub description_max_line_len: usize,
    /// How many description lines are concatenated per event.
    pub description_max_lines: usize,
    /// City/region assumed when location text matches no known neighborhood.
    pub default_city: String,
    pub default_region: String,
    pub default_currency: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_blocks: 15,
            description_min_line_len: 20,
            description_max_line_len: 500,
            description_max_lines: 3,
            default_city: "Seattle".to_string(),
            default_region: "WA".to_string(),
            default_currency: "USD".to_string(),
        }
    }
}

impl ExtractorConfig {
    pub fn load() -> Result<Self> {
        let config_path = "config.toml";
        let config_content = fs::read_to_string(config_path)
            .map_err(|e| ExtractorError::Config(format!("Failed to read config file '{}': {}", config_path, e)))?;

        let config: ExtractorConfig = toml::from_str(&config_content)?;
        Ok(config)
    }

    /// Load `config.toml` if present, otherwise fall back to defaults.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}
