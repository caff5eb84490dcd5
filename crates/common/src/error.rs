//! Common error types shared across crates.

use thiserror::Error;

/// Top-level service error type.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::BadRequest`] → 400
/// - [`ServiceError::InvalidToken`] → 400
/// - [`ServiceError::EncryptionFailure`] → 500
/// - [`ServiceError::Unavailable`] → 503
/// - [`ServiceError::Internal`] → 500
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request was malformed: unknown algorithm, text too short, or a body
    /// that is not the expected JSON.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The token could not be decoded, verified, or decrypted.
    ///
    /// Carries no detail on purpose: callers must not learn which check failed.
    #[error("invalid token or cannot be decrypted")]
    InvalidToken,

    /// Encryption failed inside the cipher layer.
    #[error("encryption failure: {0}")]
    EncryptionFailure(String),

    /// A required resource (an algorithm's key) is not configured.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// An unexpected internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::InvalidToken => 400,
            ServiceError::EncryptionFailure(_) => 500,
            ServiceError::Unavailable(_) => 503,
            ServiceError::Internal(_) => 500,
        }
    }

    /// Short machine-readable code placed in the error response body.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::BadRequest(_) => "bad_request",
            ServiceError::InvalidToken => "invalid_token",
            ServiceError::EncryptionFailure(_) => "encryption_failure",
            ServiceError::Unavailable(_) => "service_unavailable",
            ServiceError::Internal(_) => "internal_error",
        }
    }
}
