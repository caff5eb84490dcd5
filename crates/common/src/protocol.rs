//! Request and response types exchanged with API callers.
//!
//! All types are serialised as JSON over the public HTTP API.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Encrypt endpoint
// ---------------------------------------------------------------------------

/// Request body for `POST /encrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptRequest {
    /// Text to encrypt.
    pub text: String,
    /// Algorithm identifier (e.g. `"fernet"`, `"aes"`, `"chacha20"`).
    /// Falls back to the service default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crypto_type: Option<String>,
    /// Caller-declared length of `text`. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
}

/// Successful response body for `POST /encrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptResponse {
    /// Base64 envelope.
    pub token: String,
    /// Canonical name of the algorithm that produced `token`.
    pub crypto_type: String,
    /// Service version.
    pub version: String,
}

// ---------------------------------------------------------------------------
// Decrypt endpoint
// ---------------------------------------------------------------------------

/// Request body for `POST /decrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecryptRequest {
    /// Base64 envelope previously returned by `POST /encrypt`.
    pub token: String,
    /// Algorithm identifier the token was produced with.
    /// Falls back to the service default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crypto_type: Option<String>,
    /// Caller-declared length of `token`. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
}

/// Successful response body for `POST /decrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecryptResponse {
    /// Recovered plaintext.
    pub text: String,
    /// Canonical name of the algorithm that verified the token.
    pub crypto_type: String,
    /// Service version.
    pub version: String,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"bad_request"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&crate::ServiceError> for ErrorResponse {
    fn from(err: &crate::ServiceError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Root and health check
// ---------------------------------------------------------------------------

/// Response body for `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
}

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status: `"ok"` or `"degraded"`.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Canonical names of the algorithms that have a usable key.
    pub algorithms: Vec<String>,
}
