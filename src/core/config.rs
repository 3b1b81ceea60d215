//! Estimator configuration
//!
//! Holds the tunable policies of a costing session. The working-time
//! assumptions behind the effective hourly rate are NOT here: they are fixed
//! constants in `rates::catalog` so rates stay comparable across installs.

use crate::core::error::{EstimateError, Result};
use crate::core::types::ClientId;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How `quotedUnitPrice` is rounded when it is seeded from a breakdown total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingPolicy {
    /// Round to the nearest whole unit, ties up (221.5 -> 222)
    #[default]
    HalfUp,
    /// Round to the nearest whole unit, ties to even (220.5 -> 220)
    HalfEven,
    /// Keep the exact total
    Unrounded,
}

impl RoundingPolicy {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            RoundingPolicy::HalfUp => (value + 0.5).floor(),
            RoundingPolicy::HalfEven => value.round_ties_even(),
            RoundingPolicy::Unrounded => value,
        }
    }
}

/// Settings for the external proposal generator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Endpoint URL; Anthropic URLs select the Anthropic wire format
    pub api_url: String,
    /// Model name sent with every request
    pub model: String,
    /// Sampling temperature. Costing wants low variance.
    pub temperature: f32,
    /// Output token ceiling per request
    pub max_tokens: u32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_url: "https://api.anthropic.com/v1/messages".into(),
            model: "claude-3-haiku-20240307".into(),
            temperature: 0.2,
            max_tokens: 8192,
        }
    }
}

/// Configuration for a costing session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Rounding applied when seeding a quoted unit price
    pub rounding: RoundingPolicy,

    /// Dashboard bucket for items without a category
    pub default_category: String,

    /// Client profile made active when a session starts
    ///
    /// When unset (or unknown) the first profile in the catalog is used.
    pub default_client: Option<ClientId>,

    /// Proposal generator settings
    pub llm: LlmSettings,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            rounding: RoundingPolicy::HalfUp,
            default_category: "Uncategorized".into(),
            default_client: None,
            llm: LlmSettings::default(),
        }
    }
}

impl EstimatorConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.default_category.trim().is_empty() {
            return Err("default_category must not be empty".into());
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(format!(
                "llm.temperature ({}) should be within 0.0..=2.0",
                self.llm.temperature
            ));
        }

        if self.llm.max_tokens == 0 {
            return Err("llm.max_tokens must be positive".into());
        }

        Ok(())
    }

    /// Load and validate a config from a TOML file
    pub fn load_from_toml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse and validate a config from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| EstimateError::ConfigError(e.to_string()))?;
        config.validate().map_err(EstimateError::ConfigError)?;
        Ok(config)
    }
}
