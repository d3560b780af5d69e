//! Configuration management utilities

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while reading configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable held a value of the wrong shape
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Application name
    pub app_name: String,
    /// Environment (dev, prod, etc.)
    pub environment: String,
    /// Width in characters of the longest bar in text charts
    pub chart_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "dcf".to_string(),
            environment: "development".to_string(),
            chart_width: 40,
        }
    }
}

impl Config {
    /// Defaults overridden by `DCF_ENV` and `DCF_CHART_WIDTH`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with an injectable variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(env) = lookup("DCF_ENV") {
            config.environment = env;
        }

        if let Some(width) = lookup("DCF_CHART_WIDTH") {
            config.chart_width = match width.trim().parse::<usize>() {
                Ok(w) if w > 0 => w,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "DCF_CHART_WIDTH".to_string(),
                        value: width,
                    });
                }
            };
        }

        Ok(config)
    }

    /// Set the chart width
    pub fn with_chart_width(mut self, width: usize) -> Self {
        self.chart_width = width.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.chart_width, 40);
    }

    #[test]
    fn test_env_overrides() {
        let config =
            Config::from_lookup(lookup_from(&[("DCF_ENV", "prod"), ("DCF_CHART_WIDTH", "60")]))
                .unwrap();
        assert_eq!(config.environment, "prod");
        assert_eq!(config.chart_width, 60);
    }

    #[test]
    fn test_invalid_chart_width() {
        let err = Config::from_lookup(lookup_from(&[("DCF_CHART_WIDTH", "0")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: "DCF_CHART_WIDTH".to_string(),
                value: "0".to_string(),
            }
        );
    }

    #[test]
    fn test_with_chart_width_floor() {
        assert_eq!(Config::default().with_chart_width(0).chart_width, 1);
    }
}
