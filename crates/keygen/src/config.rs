//! Configuration loading and validation for the key generator.

use anyhow::{Context, Result};
use serde::Deserialize;

/// How generated keys are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// `CRYPTO_KEY_*="..."` lines with a short header.
    Dotenv,
    /// A pretty-printed JSON object keyed by family.
    Json,
}

/// Validated key generator configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Output format: `dotenv` or `json`.
    #[serde(default = "default_format")]
    pub keygen_format: String,

    /// Tracing log level. Logs go to stderr so stdout stays clean.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_format() -> String {
    "dotenv".into()
}
fn default_log_level() -> String {
    "warn".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build keygen configuration")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise keygen configuration")?;

        c.validate()?;
        Ok(c)
    }

    fn validate(&self) -> Result<()> {
        self.format().map(|_| ())
    }

    /// The parsed output format.
    pub fn format(&self) -> Result<OutputFormat> {
        match self.keygen_format.trim().to_ascii_lowercase().as_str() {
            "dotenv" | "env" => Ok(OutputFormat::Dotenv),
            "json" => Ok(OutputFormat::Json),
            other => anyhow::bail!("KEYGEN_FORMAT must be `dotenv` or `json`, got `{other}`"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_format(format: &str) -> Config {
        Config {
            keygen_format: format.into(),
            log_level: default_log_level(),
        }
    }

    #[test]
    fn defaults() {
        assert_eq!(default_format(), "dotenv");
        assert_eq!(default_log_level(), "warn");
    }

    #[test]
    fn format_is_case_insensitive() {
        assert_eq!(with_format("JSON").format().unwrap(), OutputFormat::Json);
        assert_eq!(with_format(" dotenv ").format().unwrap(), OutputFormat::Dotenv);
    }

    #[test]
    fn validate_rejects_unknown_format() {
        assert!(with_format("yaml").validate().is_err());
    }

    #[test]
    fn validate_accepts_valid_config() {
        assert!(with_format("dotenv").validate().is_ok());
        assert!(with_format("json").validate().is_ok());
    }
}
