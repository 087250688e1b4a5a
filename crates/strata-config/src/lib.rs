//! Strata configuration system
//!
//! This crate provides centralized configuration management for Strata,
//! loading settings from `strata.toml` as an alternative to environment
//! variables.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for Strata
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StrataConfig {
    /// Animation engine settings
    pub animation: AnimationConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

/// Animation engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Default animation duration in seconds
    pub default_duration: f64,
    /// Default easing name (linear, ease, ease-in, ease-out, ease-in-out)
    pub default_easing: Option<String>,
    /// Clamp for per-tick delta time in seconds, to absorb wall-clock spikes
    pub max_frame_delta: Option<f64>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log filter string passed to the logger (e.g. "debug", "strata_scene=trace")
    pub filter: Option<String>,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            default_duration: 1.0,
            default_easing: None,
            max_frame_delta: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: None }
    }
}

impl StrataConfig {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the strata.toml configuration file
    ///
    /// # Returns
    /// * `Ok(StrataConfig)` - Successfully loaded configuration
    /// * `Err(String)` - Error message if loading failed
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Load configuration from the default location (strata.toml in the current
    /// directory) or return default configuration if file doesn't exist
    pub fn load_or_default() -> Self {
        Self::load_from_file("strata.toml").unwrap_or_default()
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    /// This allows for temporary overrides without modifying the config file.
    pub fn merge_with_env(&mut self) {
        if let Ok(val) = std::env::var("STRATA_DEFAULT_DURATION") {
            if let Ok(duration) = val.parse::<f64>() {
                self.animation.default_duration = duration;
            }
        }
        if let Ok(easing) = std::env::var("STRATA_DEFAULT_EASING") {
            self.animation.default_easing = Some(easing);
        }
        if let Ok(val) = std::env::var("STRATA_MAX_FRAME_DELTA") {
            if let Ok(delta) = val.parse::<f64>() {
                self.animation.max_frame_delta = Some(delta);
            }
        }
        if let Ok(filter) = std::env::var("STRATA_LOG") {
            self.logging.filter = Some(filter);
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// This is the recommended way to load configuration:
    /// 1. Load from strata.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StrataConfig::default();
        assert_eq!(config.animation.default_duration, 1.0);
        assert!(config.animation.default_easing.is_none());
        assert!(config.animation.max_frame_delta.is_none());
        assert!(config.logging.filter.is_none());
    }

    #[test]
    fn test_toml_serialization() {
        let config = StrataConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: StrataConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.animation.default_duration, 1.0);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let parsed: StrataConfig = toml::from_str(
            r#"
            [animation]
            default_easing = "ease-out"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.animation.default_easing.as_deref(), Some("ease-out"));
        assert_eq!(parsed.animation.default_duration, 1.0);
    }

    #[test]
    fn test_load_or_default() {
        // Should not panic even if strata.toml doesn't exist
        let config = StrataConfig::load_or_default();
        assert_eq!(config.animation.default_duration, 1.0);
    }

    #[test]
    fn test_merge_with_env() {
        unsafe {
            std::env::set_var("STRATA_DEFAULT_DURATION", "0.25");
            std::env::set_var("STRATA_LOG", "strata_scene=debug");
        }

        let mut config = StrataConfig::default();
        config.merge_with_env();

        assert_eq!(config.animation.default_duration, 0.25);
        assert_eq!(config.logging.filter.as_deref(), Some("strata_scene=debug"));

        unsafe {
            std::env::remove_var("STRATA_DEFAULT_DURATION");
            std::env::remove_var("STRATA_LOG");
        }
    }
}
