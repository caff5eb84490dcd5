//! Errors produced by key resolution and the cipher suites.
//!
//! No variant carries key bytes, key text, plaintext or envelope contents.

use std::fmt;

use thiserror::Error;

use crate::algorithm::Algorithm;

/// What failed to decode from its textual form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoded {
    /// The provisioned key for an algorithm family.
    Key(Algorithm),
    /// A caller-supplied envelope.
    Envelope,
}

impl fmt::Display for Encoded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoded::Key(alg) => write!(f, "{alg} key"),
            Encoded::Envelope => f.write_str("envelope"),
        }
    }
}

/// Errors produced by the cipher layer.
#[derive(Debug, Error)]
pub enum CipherError {
    /// No key has been provisioned for the requested family.
    #[error("no key configured for {0} (set {env})", env = .0.env_var())]
    MissingKey(Algorithm),

    /// A key or envelope is not valid base64.
    #[error("invalid base64 encoding for {0}")]
    InvalidEncoding(Encoded),

    /// The decoded key has the wrong length.
    #[error("invalid {algorithm} key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength {
        algorithm: Algorithm,
        expected: usize,
        actual: usize,
    },

    /// The identifier matches no supported family.
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The envelope is malformed, truncated, tampered with, or bound to another key.
    #[error("authentication failed")]
    AuthenticationFailure,

    /// The OS random source could not produce output.
    #[error("secure random source unavailable")]
    RandomnessFailure,

    /// The AEAD primitive refused to encrypt (plaintext beyond its size limit).
    #[error("aead operation failed")]
    AeadFailure,
}

impl CipherError {
    /// Returns `true` when the caller's input caused the failure, `false` when
    /// it points at the service's own provisioning or environment.
    pub fn is_client_error(&self) -> bool {
        match self {
            CipherError::UnsupportedAlgorithm(_)
            | CipherError::AuthenticationFailure
            | CipherError::InvalidEncoding(Encoded::Envelope) => true,
            CipherError::MissingKey(_)
            | CipherError::InvalidEncoding(Encoded::Key(_))
            | CipherError::InvalidKeyLength { .. }
            | CipherError::RandomnessFailure
            | CipherError::AeadFailure => false,
        }
    }
}
