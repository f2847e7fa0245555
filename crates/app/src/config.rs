//! Configuration loading: TOML file with environment variable overrides.
//!
//! Every field has a default so the file is optional. Environment variables
//! take precedence over file values.

use std::path::Path;

use serde::Deserialize;

/// Confidence, in percent, the detector must reach before a frame counts as
/// showing a cat.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 50.0;

/// Environment variable overriding [`SecurityConfig::confidence_threshold`].
pub const CONFIDENCE_THRESHOLD_ENV: &str = "CATPOINT_CONFIDENCE_THRESHOLD";

/// Settings owned by the
/// [`SecurityService`](crate::services::security_service::SecurityService).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Threshold handed to the image-analysis collaborator, in percent.
    pub confidence_threshold: f32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }
}

impl SecurityConfig {
    /// Load configuration from `path` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is unreadable or malformed,
    /// or if the resulting threshold is out of range.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let threshold = std::env::var(CONFIDENCE_THRESHOLD_ENV).ok();
        Self::load_with_override(path.as_ref(), threshold.as_deref())
    }

    fn load_with_override(path: &Path, threshold: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        if let Some(val) = threshold {
            config.apply_threshold_override(val)?;
        }
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_threshold_override(&mut self, val: &str) -> Result<(), ConfigError> {
        self.confidence_threshold = val.trim().parse().map_err(|_| {
            ConfigError::Validation(format!("{CONFIDENCE_THRESHOLD_ENV} is not a number: {val}"))
        })?;
        Ok(())
    }

    /// Check the threshold is a percentage.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] unless the threshold is finite and
    /// within `0..=100`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=100.0).contains(&self.confidence_threshold) {
            return Err(ConfigError::Validation(format!(
                "confidence_threshold must be within 0..=100, got {}",
                self.confidence_threshold
            )));
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
