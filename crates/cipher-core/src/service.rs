//! Textual envelope codec: the interface the request layer talks to.
//!
//! Every family's raw envelope crosses this boundary as standard-alphabet,
//! padded base64. Fernet tokens are re-encoded from their raw bytes, so the
//! textual form is uniform across all three families.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;

use crate::algorithm::Algorithm;
use crate::error::{CipherError, Encoded};
use crate::factory::CipherFactory;

/// Result of [`CipherService::encrypt`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    /// Base64 envelope.
    pub token: String,
    /// Family that produced the envelope.
    pub algorithm: Algorithm,
}

/// Result of [`CipherService::decrypt`].
#[derive(Clone, PartialEq, Eq)]
pub struct Opened {
    /// Recovered plaintext bytes.
    pub plaintext: Vec<u8>,
    /// Family that verified the envelope.
    pub algorithm: Algorithm,
}

impl std::fmt::Debug for Opened {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Opened")
            .field("plaintext_len", &self.plaintext.len())
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

/// Encrypts plaintext to base64 envelopes and back, selecting the suite by
/// caller-supplied identifier on every call.
#[derive(Clone, Debug)]
pub struct CipherService {
    factory: CipherFactory,
}

impl CipherService {
    /// Wrap a configured [`CipherFactory`].
    pub fn new(factory: CipherFactory) -> Self {
        Self { factory }
    }

    /// The underlying factory.
    pub fn factory(&self) -> &CipherFactory {
        &self.factory
    }

    /// Encrypt `plaintext` with the family named by `algorithm`.
    ///
    /// # Errors
    ///
    /// Propagates selection errors from [`CipherFactory::select`] and
    /// encryption errors from the suite.
    pub fn encrypt(&self, plaintext: &[u8], algorithm: &str) -> Result<Sealed, CipherError> {
        let suite = self.factory.select(algorithm)?;
        let envelope = suite.encrypt(plaintext)?;
        debug!(algorithm = %suite.algorithm(), envelope_len = envelope.len(), "encrypted");
        Ok(Sealed {
            token: STANDARD.encode(envelope),
            algorithm: suite.algorithm(),
        })
    }

    /// Decode `token` and decrypt it with the family named by `algorithm`.
    ///
    /// # Errors
    ///
    /// - [`CipherError::InvalidEncoding`] with [`Encoded::Envelope`] if `token`
    ///   is not base64.
    /// - [`CipherError::AuthenticationFailure`] if verification fails.
    /// - Selection errors from [`CipherFactory::select`].
    pub fn decrypt(&self, token: &str, algorithm: &str) -> Result<Opened, CipherError> {
        let suite = self.factory.select(algorithm)?;
        let envelope = STANDARD
            .decode(token.trim())
            .map_err(|_| CipherError::InvalidEncoding(Encoded::Envelope))?;
        let plaintext = suite.decrypt(&envelope)?;
        debug!(algorithm = %suite.algorithm(), "decrypted");
        Ok(Opened {
            plaintext,
            algorithm: suite.algorithm(),
        })
    }
}
