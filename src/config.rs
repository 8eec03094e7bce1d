//! YAML configuration file support for guesswork.
//!
//! Deployments that score passwords as part of a larger service usually
//! keep the scoring knobs in a configuration file next to everything else.
//! This module loads them from YAML:
//!
//! ```yaml
//! version: "1.0"
//! name: "signup form policy"
//!
//! scoring:
//!   reference_year: 2026
//!   exclude_additive: false
//! ```
//!
//! Omitted fields fall back to the same defaults as [`ScoringConfig`];
//! in particular a missing `reference_year` means "the current calendar
//! year at call time".

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use scoring::ScoringConfig;

/// Errors that can occur when loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level YAML configuration for the scorer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct GuessworkConfig {
    /// Configuration format version.
    pub version: String,

    /// Optional configuration name/description.
    #[serde(default)]
    pub name: Option<String>,

    /// Scoring knobs.
    #[serde(default)]
    pub scoring: ScoringYamlConfig,
}

impl GuessworkConfig {
    /// Load a YAML configuration file from the given path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: GuessworkConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;
        self.scoring.validate()?;
        Ok(())
    }
}

impl Default for GuessworkConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            scoring: ScoringYamlConfig::default(),
        }
    }
}

/// Scoring section of the YAML configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ScoringYamlConfig {
    /// Year that date distances are measured against; the current
    /// calendar year when omitted.
    #[serde(default)]
    pub reference_year: Option<i32>,

    /// Skip the additive shorter-covers-first term.
    #[serde(default)]
    pub exclude_additive: bool,
}

impl ScoringYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if let Some(year) = self.reference_year {
            if !(1000..=9999).contains(&year) {
                return Err(ConfigLoadError::Validation(format!(
                    "scoring.reference_year must be a four-digit year, got {year}"
                )));
            }
        }
        Ok(())
    }

    /// Resolve into the scorer's runtime configuration.
    pub fn to_scoring_config(&self) -> ScoringConfig {
        ScoringConfig {
            reference_year: self
                .reference_year
                .unwrap_or_else(ScoringConfig::current_year),
            exclude_additive: self.exclude_additive,
        }
    }
}
