//! Key provisioning and resolution.
//!
//! [`KeyProvider`] holds the operator-supplied textual secrets, one optional
//! value per family, and never changes after construction. [`resolve`] turns
//! one of those values into validated [`KeyMaterial`].
//!
//! # Security invariants
//!
//! - Key text and key bytes are zeroized on drop.
//! - Neither type prints its contents through `Debug`; neither implements `Display`.
//! - Resolution errors report lengths and family names only.

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::algorithm::Algorithm;
use crate::error::{CipherError, Encoded};

/// Byte length of every decoded key (256 bits).
pub const KEY_LEN: usize = 32;

/// Immutable set of base64-encoded secrets, one optional value per family.
///
/// The three values are independent; none is derived from another.
#[derive(Clone, Default)]
pub struct KeyProvider {
    fernet: Option<Zeroizing<String>>,
    aes256: Option<Zeroizing<String>>,
    chacha20: Option<Zeroizing<String>>,
}

impl KeyProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a provider from the three optional values, in
    /// fernet / AES-256 / ChaCha20 order.
    pub fn from_optional(
        fernet: Option<String>,
        aes256: Option<String>,
        chacha20: Option<String>,
    ) -> Self {
        Self {
            fernet: fernet.map(Zeroizing::new),
            aes256: aes256.map(Zeroizing::new),
            chacha20: chacha20.map(Zeroizing::new),
        }
    }

    /// Return a copy of this provider with `algorithm`'s key set to `text`.
    pub fn with_key(mut self, algorithm: Algorithm, text: impl Into<String>) -> Self {
        let value = Some(Zeroizing::new(text.into()));
        match algorithm {
            Algorithm::Fernet => self.fernet = value,
            Algorithm::Aes256Gcm => self.aes256 = value,
            Algorithm::ChaCha20Poly1305 => self.chacha20 = value,
        }
        self
    }

    /// The textual key for `algorithm`, or `None` when absent or blank.
    pub fn key_text(&self, algorithm: Algorithm) -> Option<&str> {
        let slot = match algorithm {
            Algorithm::Fernet => &self.fernet,
            Algorithm::Aes256Gcm => &self.aes256,
            Algorithm::ChaCha20Poly1305 => &self.chacha20,
        };
        slot.as_deref()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    /// Families that have a non-blank value, in priority order.
    pub fn configured(&self) -> Vec<Algorithm> {
        Algorithm::ALL
            .into_iter()
            .filter(|alg| self.key_text(*alg).is_some())
            .collect()
    }
}

impl fmt::Debug for KeyProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.configured().into_iter().map(Algorithm::as_str).collect();
        f.debug_struct("KeyProvider")
            .field("configured", &names)
            .finish_non_exhaustive()
    }
}

/// Validated raw key bytes bound to one algorithm family.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyMaterial {
    #[zeroize(skip)]
    algorithm: Algorithm,
    bytes: [u8; KEY_LEN],
}

impl KeyMaterial {
    /// Bind `bytes` to `algorithm` after checking the length.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidKeyLength`] if `bytes` is not exactly
    /// [`KEY_LEN`] bytes.
    pub fn new(algorithm: Algorithm, bytes: &[u8]) -> Result<Self, CipherError> {
        if bytes.len() != KEY_LEN {
            return Err(CipherError::InvalidKeyLength {
                algorithm,
                expected: KEY_LEN,
                actual: bytes.len(),
            });
        }
        let mut key = [0u8; KEY_LEN];
        key.copy_from_slice(bytes);
        Ok(Self {
            algorithm,
            bytes: key,
        })
    }

    /// The family this key is bound to.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Borrow the raw key bytes. Use immediately; do not copy out.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyMaterial({}, [REDACTED])", self.algorithm)
    }
}

/// Decode and validate the provisioned key for `algorithm`.
///
/// Keys are standard-alphabet base64 for every family. Surrounding whitespace
/// is ignored.
///
/// # Errors
///
/// - [`CipherError::MissingKey`] if the provider has no value for `algorithm`.
/// - [`CipherError::InvalidEncoding`] if the value is not valid base64.
/// - [`CipherError::InvalidKeyLength`] if the decoded key is not [`KEY_LEN`] bytes.
pub fn resolve(provider: &KeyProvider, algorithm: Algorithm) -> Result<KeyMaterial, CipherError> {
    let text = provider
        .key_text(algorithm)
        .ok_or(CipherError::MissingKey(algorithm))?;
    let decoded = Zeroizing::new(
        STANDARD
            .decode(text)
            .map_err(|_| CipherError::InvalidEncoding(Encoded::Key(algorithm)))?,
    );
    KeyMaterial::new(algorithm, &decoded)
}
