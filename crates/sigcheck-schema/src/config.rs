//! # Check Configuration
//!
//! Settings shared by validators and guards. Loaded from YAML/JSON text or
//! from the environment:
//!
//! ```bash
//! export SIGCHECK_ENABLED=false     # guards start with checking off
//! export SIGCHECK_MAX_DEPTH=64      # cap on schema nesting depth
//! ```

use serde::Deserialize;
use thiserror::Error;

/// Environment variable for [`CheckConfig::enabled`].
pub const ENV_ENABLED: &str = "SIGCHECK_ENABLED";
/// Environment variable for [`CheckConfig::max_depth`].
pub const ENV_MAX_DEPTH: &str = "SIGCHECK_MAX_DEPTH";

const DEFAULT_MAX_DEPTH: usize = 256;

/// Error loading a [`CheckConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration text could not be parsed.
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// An environment variable held an unusable value.
    #[error("environment variable {var} has invalid value '{value}': expected {expected}")]
    InvalidEnv {
        /// Variable name.
        var: &'static str,
        /// The value found.
        value: String,
        /// What was expected.
        expected: &'static str,
    },
}

/// Validation settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckConfig {
    /// Initial per-guard checking flag.
    pub enabled: bool,
    /// Maximum trail depth before a check fails with `DepthExceeded`.
    pub max_depth: usize,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl CheckConfig {
    /// Parse from YAML (or JSON, which is valid YAML). Missing keys take
    /// their defaults.
    ///
    /// # Errors
    ///
    /// `ConfigError::Parse` on malformed text or unknown keys.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Read `SIGCHECK_ENABLED` and `SIGCHECK_MAX_DEPTH`; unset variables take
    /// their defaults.
    ///
    /// # Errors
    ///
    /// `ConfigError::InvalidEnv` if a variable is set but unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Like [`from_env`](Self::from_env) with a caller-supplied lookup.
    ///
    /// # Errors
    ///
    /// `ConfigError::InvalidEnv` if a variable is set but unparseable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_ENABLED) {
            config.enabled = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(ConfigError::InvalidEnv {
                        var: ENV_ENABLED,
                        value: raw,
                        expected: "a boolean (true/false/1/0/yes/no/on/off)",
                    })
                }
            };
        }

        if let Some(raw) = lookup(ENV_MAX_DEPTH) {
            config.max_depth = raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: ENV_MAX_DEPTH,
                value: raw.clone(),
                expected: "a non-negative integer",
            })?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn defaults() {
        let config = CheckConfig::default();
        assert!(config.enabled);
        assert_eq!(config.max_depth, 256);
    }

    #[test]
    fn yaml_fills_missing_keys() {
        let config = CheckConfig::from_yaml_str("max_depth: 12\n").unwrap();
        assert_eq!(
            config,
            CheckConfig {
                enabled: true,
                max_depth: 12
            }
        );
    }

    #[test]
    fn yaml_rejects_unknown_keys() {
        assert!(matches!(
            CheckConfig::from_yaml_str("max_dept: 12\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn env_lookup_parses_values() {
        let config =
            CheckConfig::from_lookup(lookup(&[(ENV_ENABLED, "off"), (ENV_MAX_DEPTH, " 8 ")]))
                .unwrap();
        assert!(!config.enabled);
        assert_eq!(config.max_depth, 8);
    }

    #[test]
    fn env_lookup_rejects_garbage() {
        let err = CheckConfig::from_lookup(lookup(&[(ENV_MAX_DEPTH, "deep")])).unwrap_err();
        assert!(err.to_string().contains(ENV_MAX_DEPTH));
        let err = CheckConfig::from_lookup(lookup(&[(ENV_ENABLED, "maybe")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { var: ENV_ENABLED, .. }));
    }
}
