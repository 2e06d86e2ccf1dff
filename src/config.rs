// ABOUTME: Environment-driven engine configuration: definitions directory, environment, debounce default
// ABOUTME: Typed parse helpers read PIERRE_FORM_* variables with documented fallbacks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-only configuration. There is no config file; every knob is
//! an environment variable with a default.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use pierre_form_core::constants::{defaults, documents, env_config};
use pierre_form_core::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Directory holding `<exercise>.yaml` documents
    pub definitions_dir: PathBuf,
    /// Deployment environment
    pub environment: Environment,
    /// Debounce applied when a definition sets none
    pub default_min_rep_duration: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            definitions_dir: PathBuf::from(documents::DEFAULT_DIR),
            environment: Environment::default(),
            default_min_rep_duration: Duration::from_secs_f64(defaults::MIN_REP_DURATION_SECS),
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` if `PIERRE_FORM_MIN_REP_DURATION` is not a
    /// non-negative number of seconds.
    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(dir) = env::var(env_config::DEFINITIONS_DIR) {
            if !dir.trim().is_empty() {
                config.definitions_dir = PathBuf::from(dir);
            }
        }

        if let Ok(environment) = env::var(env_config::ENVIRONMENT) {
            config.environment = Environment::from_str_or_default(&environment);
        }

        if let Some(seconds) = parse_env_f64(env_config::DEFAULT_MIN_REP_DURATION)? {
            config.default_min_rep_duration = Duration::try_from_secs_f64(seconds).map_err(|_| {
                AppError::config_invalid(format!(
                    "{} must be a non-negative number of seconds, got {seconds}",
                    env_config::DEFAULT_MIN_REP_DURATION
                ))
            })?;
        }

        debug!(
            definitions_dir = %config.definitions_dir.display(),
            environment = %config.environment,
            default_min_rep_duration_secs = config.default_min_rep_duration.as_secs_f64(),
            "Engine configuration loaded"
        );
        Ok(config)
    }
}

/// Parse an environment variable as f64, `None` when unset
fn parse_env_f64(env_var: &str) -> AppResult<Option<f64>> {
    match env::var(env_var) {
        Ok(value) => value.trim().parse::<f64>().map(Some).map_err(|e| {
            AppError::config_invalid(format!("{env_var} is not a number: {value}")).with_source(e)
        }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parsing_falls_back_to_development() {
        assert_eq!(Environment::from_str_or_default("PROD"), Environment::Production);
        assert_eq!(Environment::from_str_or_default("test"), Environment::Testing);
        assert_eq!(Environment::from_str_or_default("staging"), Environment::Development);
    }

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.definitions_dir, PathBuf::from("definitions"));
        assert_eq!(config.default_min_rep_duration, Duration::from_millis(500));
    }
}
