//! Analysis parameters.
//!
//! This module provides the configuration struct that controls binning and
//! the significance thresholds of an audit run.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Configuration for an audit run.
///
/// # Example
/// ```
/// use allin_audit::analysis::AnalysisConfig;
///
/// let config = AnalysisConfig::default().with_num_bins(25);
/// assert_eq!(config.min_hands, 15);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Number of equal-width bins over [0.5, 1.0].
    ///
    /// Hands are grouped by the favoured hand's conditional win
    /// probability. More bins give narrower groups with fewer hands each.
    pub num_bins: usize,

    /// Bins with fewer hands than this are left out of the per-bin test
    /// and of the Fisher statistic.
    pub min_hands: u64,

    /// p-values below this level are reported as suspicious.
    pub suspect_level: f64,

    /// p-values below this level reject the null hypothesis.
    ///
    /// Must not exceed `suspect_level`.
    pub reject_level: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            num_bins: 50,
            min_hands: 15,
            suspect_level: 0.05,
            reject_level: 0.01,
        }
    }
}

impl AnalysisConfig {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the number of bins.
    pub fn with_num_bins(mut self, num_bins: usize) -> Self {
        self.num_bins = num_bins;
        self
    }

    /// Builder method: set the minimum hands per tested bin.
    pub fn with_min_hands(mut self, min_hands: u64) -> Self {
        self.min_hands = min_hands;
        self
    }

    /// Builder method: set both significance levels.
    pub fn with_levels(mut self, suspect_level: f64, reject_level: f64) -> Self {
        self.suspect_level = suspect_level;
        self.reject_level = reject_level;
        self
    }

    /// Load a configuration from a JSON file. Missing fields take their
    /// default values.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_json_str(&content)
    }

    /// Parse a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_bins == 0 {
            return Err(ConfigError::NoBins);
        }

        for (name, level) in [
            ("suspect", self.suspect_level),
            ("reject", self.reject_level),
        ] {
            if !(level > 0.0 && level < 1.0) {
                return Err(ConfigError::InvalidLevel(name, level));
            }
        }

        if self.reject_level > self.suspect_level {
            return Err(ConfigError::LevelOrder {
                suspect: self.suspect_level,
                reject: self.reject_level,
            });
        }

        Ok(())
    }
}

/// Errors that can occur when loading or validating a configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("cannot read config: {0}")]
    Io(String),
    /// Config file is not valid JSON.
    #[error("cannot parse config: {0}")]
    Parse(String),
    /// `num_bins` is zero.
    #[error("at least one bin is required")]
    NoBins,
    /// Significance level outside (0, 1).
    #[error("{0} level {1} is out of range (0, 1)")]
    InvalidLevel(&'static str, f64),
    /// Reject level is less strict than the suspect level.
    #[error("reject level {reject} is above suspect level {suspect}")]
    LevelOrder {
        /// Configured suspect level.
        suspect: f64,
        /// Configured reject level.
        reject: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.num_bins, 50);
        assert_eq!(config.min_hands, 15);
        assert_eq!(config.suspect_level, 0.05);
        assert_eq!(config.reject_level, 0.01);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        assert_eq!(
            AnalysisConfig::new().with_num_bins(0).validate(),
            Err(ConfigError::NoBins)
        );
        assert_eq!(
            AnalysisConfig::new().with_levels(1.5, 0.01).validate(),
            Err(ConfigError::InvalidLevel("suspect", 1.5))
        );
        assert_eq!(
            AnalysisConfig::new().with_levels(0.05, 0.0).validate(),
            Err(ConfigError::InvalidLevel("reject", 0.0))
        );
        assert!(matches!(
            AnalysisConfig::new().with_levels(0.01, 0.05).validate(),
            Err(ConfigError::LevelOrder { .. })
        ));
    }

    #[test]
    fn test_from_json() {
        let config = AnalysisConfig::from_json_str(r#"{"num_bins": 20, "min_hands": 30}"#).unwrap();
        assert_eq!(config.num_bins, 20);
        assert_eq!(config.min_hands, 30);
        assert_eq!(config.suspect_level, 0.05);

        assert!(matches!(
            AnalysisConfig::from_json_str(r#"{"num_bins": 0}"#),
            Err(ConfigError::NoBins)
        ));
        assert!(matches!(
            AnalysisConfig::from_json_str("{"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            AnalysisConfig::from_json_file("/nonexistent/audit.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
