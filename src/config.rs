//! Engine configuration.
//!
//! Loads settings from a TOML file or uses defaults. Every field has a
//! serde default so a partial file works; a missing file is a warn, not an
//! error.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Default config file path
pub const CONFIG_PATH: &str = "/etc/mamaput/config.toml";

/// Engine-wide tuning knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Recipes sent to the model per request (prompt-size cap).
    #[serde(default = "default_max_meals_for_ai")]
    pub max_meals_for_ai: usize,

    /// Ingredient entries listed per recipe in the prompt.
    #[serde(default = "default_max_ingredients_per_meal")]
    pub max_ingredients_per_meal_for_ai: usize,

    /// Live entries allowed in the AI response cache before a sweep evicts.
    #[serde(default = "default_cache_max_size")]
    pub cache_max_size: usize,

    /// Seconds between cache sweeps.
    #[serde(default = "default_cache_sweep_interval")]
    pub cache_sweep_interval_secs: u64,

    /// Title relevance threshold for the first search phase (percent).
    #[serde(default = "default_primary_threshold")]
    pub primary_threshold: f32,

    /// Relaxed threshold for the second phase (percent).
    #[serde(default = "default_secondary_threshold")]
    pub secondary_threshold: f32,

    /// Cap on unseen ingredients extracted from matched titles.
    #[serde(default = "default_max_additional_ingredients")]
    pub max_additional_ingredients: usize,

    #[serde(default)]
    pub ai: AiConfig,
}

/// Chat-completion endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the bearer API key. The key itself is
    /// never stored in config.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Low temperature biases the model toward deterministic output.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Per-request timeout. A timed-out call degrades to the fallback
    /// like any other transport failure.
    #[serde(default = "default_ai_timeout")]
    pub timeout_secs: u64,
}

fn default_max_meals_for_ai() -> usize {
    20
}

fn default_max_ingredients_per_meal() -> usize {
    8
}

fn default_cache_max_size() -> usize {
    100
}

fn default_cache_sweep_interval() -> u64 {
    3600
}

fn default_primary_threshold() -> f32 {
    50.0
}

fn default_secondary_threshold() -> f32 {
    25.0
}

fn default_max_additional_ingredients() -> usize {
    10
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_key_env() -> String {
    "MAMAPUT_API_KEY".to_string()
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_tokens() -> u32 {
    500
}

fn default_ai_timeout() -> u64 {
    30
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_meals_for_ai: default_max_meals_for_ai(),
            max_ingredients_per_meal_for_ai: default_max_ingredients_per_meal(),
            cache_max_size: default_cache_max_size(),
            cache_sweep_interval_secs: default_cache_sweep_interval(),
            primary_threshold: default_primary_threshold(),
            secondary_threshold: default_secondary_threshold(),
            max_additional_ingredients: default_max_additional_ingredients(),
            ai: AiConfig::default(),
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_ai_timeout(),
        }
    }
}

impl EngineConfig {
    /// Load config from a file, falling back to defaults if missing.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        info!("Loaded config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_recognized_options() {
        let config = EngineConfig::default();
        assert_eq!(config.max_meals_for_ai, 20);
        assert_eq!(config.max_ingredients_per_meal_for_ai, 8);
        assert_eq!(config.cache_max_size, 100);
        assert_eq!(config.cache_sweep_interval_secs, 3600);
        assert_eq!(config.primary_threshold, 50.0);
        assert_eq!(config.secondary_threshold, 25.0);
        assert_eq!(config.max_additional_ingredients, 10);
        assert_eq!(config.ai.temperature, 0.3);
        assert_eq!(config.ai.max_tokens, 500);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = EngineConfig::load(Path::new("/nonexistent/mamaput.toml")).unwrap();
        assert_eq!(config.cache_max_size, 100);
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "primary_threshold = 40.0\n\n[ai]\nmodel = \"gpt-4o\"").unwrap();

        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.primary_threshold, 40.0);
        assert_eq!(config.ai.model, "gpt-4o");
        // Untouched fields keep their defaults.
        assert_eq!(config.secondary_threshold, 25.0);
        assert_eq!(config.ai.max_tokens, 500);
    }
}
