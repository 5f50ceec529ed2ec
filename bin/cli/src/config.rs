//! Centralized CLI configuration.
//!
//! This module provides strongly-typed configuration for the CLI,
//! loaded via the `config` crate from environment variables with the
//! `FLOWCRAFT` prefix (e.g. `FLOWCRAFT__OUTPUT__PRETTY=true`).

use serde::Deserialize;

/// CLI configuration.
#[derive(Debug, Deserialize)]
pub struct CliConfig {
    /// Path to a task catalog file overriding the builtin catalog.
    #[serde(default)]
    pub catalog_path: Option<String>,

    /// Output formatting configuration.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Output-related configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Whether to pretty-print JSON output.
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

fn default_pretty() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: default_pretty(),
        }
    }
}

impl CliConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if present configuration is invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::with_prefix("FLOWCRAFT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_config_has_correct_defaults() {
        let config = OutputConfig::default();
        assert!(config.pretty);
    }
}
