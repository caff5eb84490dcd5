//! Configuration loading and validation for the API service.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any variable is present but invalid.
//! Key values are never printed, including through `Debug`.

use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use cipher_core::{Algorithm, KeyProvider};
use serde::Deserialize;

/// Validated API service configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Port the HTTP(S) server listens on.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// OTLP gRPC endpoint. Spans are exported only when this is set.
    #[serde(default)]
    pub otel_exporter_otlp_endpoint: Option<String>,

    /// PEM certificate chain. TLS is enabled when this and `tls_key_path` are set.
    #[serde(default)]
    pub tls_cert_path: Option<String>,

    /// PEM private key matching `tls_cert_path`.
    #[serde(default)]
    pub tls_key_path: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Algorithm used when a request omits `crypto_type`.
    #[serde(default = "default_crypto_type")]
    pub default_crypto_type: String,

    /// Minimum number of characters accepted by `POST /encrypt`.
    #[serde(default = "default_min_text_length")]
    pub min_text_length: usize,

    /// Maximum age of Fernet tokens accepted by `POST /decrypt`. Unlimited when unset.
    #[serde(default)]
    pub fernet_ttl_secs: Option<u64>,

    /// Base64 Fernet key (32 bytes: signing half || encryption half).
    #[serde(default)]
    pub crypto_key_fernet: Option<String>,

    /// Base64 AES-256-GCM key (32 bytes).
    #[serde(default)]
    pub crypto_key_aes256: Option<String>,

    /// Base64 ChaCha20-Poly1305 key (32 bytes).
    #[serde(default)]
    pub crypto_key_chacha20: Option<String>,
}

fn default_listen_port() -> u16 {
    8000
}
fn default_log_level() -> String {
    "info".into()
}
fn default_request_timeout() -> u64 {
    30
}
fn default_crypto_type() -> String {
    "fernet".into()
}
fn default_min_text_length() -> usize {
    10
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        if self.request_timeout_secs == 0 {
            anyhow::bail!("REQUEST_TIMEOUT_SECS must be > 0");
        }
        if self.fernet_ttl_secs == Some(0) {
            anyhow::bail!("FERNET_TTL_SECS must be > 0 when set");
        }
        Algorithm::parse(&self.default_crypto_type)
            .context("DEFAULT_CRYPTO_TYPE must name a supported algorithm")?;

        match (non_blank(&self.tls_cert_path), non_blank(&self.tls_key_path)) {
            (Some(_), None) => anyhow::bail!("TLS_KEY_PATH is required when TLS_CERT_PATH is set"),
            (None, Some(_)) => anyhow::bail!("TLS_CERT_PATH is required when TLS_KEY_PATH is set"),
            _ => {}
        }
        Ok(())
    }

    /// Build the immutable key provider from the three `CRYPTO_KEY_*` values.
    pub fn key_provider(&self) -> KeyProvider {
        KeyProvider::from_optional(
            self.crypto_key_fernet.clone(),
            self.crypto_key_aes256.clone(),
            self.crypto_key_chacha20.clone(),
        )
    }

    /// Certificate and key paths, when TLS is configured.
    pub fn tls_paths(&self) -> Option<(&str, &str)> {
        non_blank(&self.tls_cert_path).zip(non_blank(&self.tls_key_path))
    }

    /// OTLP endpoint, when configured and non-blank.
    pub fn otlp_endpoint(&self) -> Option<&str> {
        non_blank(&self.otel_exporter_otlp_endpoint)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn fernet_ttl(&self) -> Option<Duration> {
        self.fernet_ttl_secs.map(Duration::from_secs)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("listen_port", &self.listen_port)
            .field("log_level", &self.log_level)
            .field("otel_exporter_otlp_endpoint", &self.otel_exporter_otlp_endpoint)
            .field("tls_cert_path", &self.tls_cert_path)
            .field("tls_key_path", &self.tls_key_path)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("default_crypto_type", &self.default_crypto_type)
            .field("min_text_length", &self.min_text_length)
            .field("fernet_ttl_secs", &self.fernet_ttl_secs)
            .field("keys", &self.key_provider())
            .finish()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
