//! Resolver configuration with documented tunables
//!
//! The confidence weighting has no closed-form derivation; the numbers here are
//! tunables. Only their ordering relationships are load-bearing, and
//! [`ResolverConfig::validate`] enforces those.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::error::{IntentError, Result};

/// Configuration for the resolution engine and the LLM adapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    // === CONFIDENCE ===
    /// Confidence of the action's default pattern when no rule matched
    ///
    /// Every resolution starts here. Matched rules move it toward 1.0 in
    /// proportion to how much of the declared constraint specificity they explain.
    pub base_confidence: f32,

    /// Starting confidence of a pattern proposed by a rule instead of the default
    ///
    /// Kept below `base_confidence` so a proposed pattern has to explain more of
    /// the constraints than the default pattern before it can win.
    pub alternative_base: f32,

    /// Maximum distance below the winning confidence for an alternative to be kept
    pub alternative_margin: f32,

    /// Maximum number of alternatives attached to a resolution
    pub max_alternatives: usize,

    // === LLM ADAPTER ===
    /// Timeout applied around a single provider call (milliseconds)
    pub llm_timeout_ms: u64,

    /// Number of conversation messages kept when building a prompt
    ///
    /// Older turns are evicted first; the system prompt is never evicted.
    pub history_limit: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            base_confidence: 0.5,
            alternative_base: 0.3,
            alternative_margin: 0.25,
            max_alternatives: 3,

            llm_timeout_ms: 30_000,
            history_limit: 12,
        }
    }
}

impl ResolverConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ResolverConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn llm_timeout(&self) -> Duration {
        Duration::from_millis(self.llm_timeout_ms)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let unit = 0.0..=1.0;
        if !unit.contains(&self.base_confidence) || !unit.contains(&self.alternative_base) {
            return Err(IntentError::InvalidConfig(format!(
                "base_confidence ({}) and alternative_base ({}) must lie in [0, 1]",
                self.base_confidence, self.alternative_base
            )));
        }

        if self.alternative_base > self.base_confidence {
            return Err(IntentError::InvalidConfig(format!(
                "alternative_base ({}) should be <= base_confidence ({})",
                self.alternative_base, self.base_confidence
            )));
        }

        if !unit.contains(&self.alternative_margin) {
            return Err(IntentError::InvalidConfig(format!(
                "alternative_margin ({}) must lie in [0, 1]",
                self.alternative_margin
            )));
        }

        if self.llm_timeout_ms == 0 {
            return Err(IntentError::InvalidConfig(
                "llm_timeout_ms must be positive".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ResolverConfig::default().validate().is_ok());
    }

    #[test]
    fn test_alternative_base_above_base_rejected() {
        let config = ResolverConfig {
            alternative_base: 0.9,
            ..ResolverConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("alternative_base"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ResolverConfig::from_toml_str("alternative_margin = 0.1\n").unwrap();
        assert!((config.alternative_margin - 0.1).abs() < f32::EPSILON);
        assert_eq!(config.max_alternatives, 3);
        assert_eq!(config.llm_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_invalid_toml_reports_error() {
        let result = ResolverConfig::from_toml_str("base_confidence = \"high\"");
        assert!(matches!(result, Err(IntentError::TomlError(_))));
    }
}
