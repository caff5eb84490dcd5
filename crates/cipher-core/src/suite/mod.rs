//! The three cipher suites behind one closed [`CipherSuite`] type.
//!
//! # Raw output formats
//!
//! ```text
//! AES-256-GCM / ChaCha20-Poly1305:  nonce (12) || ciphertext || tag (16)
//! Fernet:                           0x80 || timestamp (8, BE) || iv (16) || ciphertext || hmac (32)
//! ```
//!
//! Textual encoding of these bytes is the caller's concern; see [`crate::service`].

pub mod aead;
pub mod fernet;

pub use aead::{AesGcmCipher, ChaChaCipher, NONCE_LEN, TAG_LEN};
pub use fernet::FernetCipher;

use aes_gcm::aead::{rand_core::RngCore, OsRng};

use crate::algorithm::Algorithm;
use crate::error::CipherError;
use crate::keys::KeyMaterial;

/// A constructed cipher bound to one resolved key.
///
/// Holds no mutable state, so a suite can be built per request or shared
/// across threads.
#[derive(Clone, Debug)]
pub enum CipherSuite {
    Fernet(FernetCipher),
    AesGcm(AesGcmCipher),
    ChaCha20Poly1305(ChaChaCipher),
}

impl CipherSuite {
    /// Build the suite matching `key`'s family.
    pub fn from_key(key: &KeyMaterial) -> Self {
        match key.algorithm() {
            Algorithm::Fernet => CipherSuite::Fernet(FernetCipher::new(key)),
            Algorithm::Aes256Gcm => CipherSuite::AesGcm(AesGcmCipher::new(key)),
            Algorithm::ChaCha20Poly1305 => CipherSuite::ChaCha20Poly1305(ChaChaCipher::new(key)),
        }
    }

    /// The family this suite implements.
    pub fn algorithm(&self) -> Algorithm {
        match self {
            CipherSuite::Fernet(_) => Algorithm::Fernet,
            CipherSuite::AesGcm(_) => Algorithm::Aes256Gcm,
            CipherSuite::ChaCha20Poly1305(_) => Algorithm::ChaCha20Poly1305,
        }
    }

    /// Encrypt `plaintext` into this suite's raw envelope bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::RandomnessFailure`] if no nonce or IV could be
    /// drawn, or [`CipherError::AeadFailure`] if the primitive rejects the input.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CipherError> {
        match self {
            CipherSuite::Fernet(c) => c.encrypt(plaintext),
            CipherSuite::AesGcm(c) => c.encrypt(plaintext),
            CipherSuite::ChaCha20Poly1305(c) => c.encrypt(plaintext),
        }
    }

    /// Verify and decrypt raw envelope bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::AuthenticationFailure`] for any malformed,
    /// truncated, tampered or foreign-key envelope, without saying which.
    pub fn decrypt(&self, envelope: &[u8]) -> Result<Vec<u8>, CipherError> {
        match self {
            CipherSuite::Fernet(c) => c.decrypt(envelope),
            CipherSuite::AesGcm(c) => c.decrypt(envelope),
            CipherSuite::ChaCha20Poly1305(c) => c.decrypt(envelope),
        }
    }
}

/// Fill `buf` from the OS CSPRNG.
pub(crate) fn fill_random(buf: &mut [u8]) -> Result<(), CipherError> {
    OsRng
        .try_fill_bytes(buf)
        .map_err(|_| CipherError::RandomnessFailure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KEY_LEN;

    fn suite(alg: Algorithm, byte: u8) -> CipherSuite {
        CipherSuite::from_key(&KeyMaterial::new(alg, &[byte; KEY_LEN]).unwrap())
    }

    #[test]
    fn from_key_selects_matching_variant() {
        for alg in Algorithm::ALL {
            assert_eq!(suite(alg, 7).algorithm(), alg);
        }
    }

    #[test]
    fn every_suite_round_trips() {
        for alg in Algorithm::ALL {
            let s = suite(alg, 9);
            let envelope = s.encrypt(b"Texto de exemplo para criptografia").unwrap();
            assert_eq!(s.decrypt(&envelope).unwrap(), b"Texto de exemplo para criptografia");
        }
    }

    #[test]
    fn empty_envelope_is_rejected() {
        for alg in Algorithm::ALL {
            assert!(matches!(
                suite(alg, 1).decrypt(&[]),
                Err(CipherError::AuthenticationFailure)
            ));
        }
    }

    #[test]
    fn fill_random_produces_distinct_output() {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        fill_random(&mut a).unwrap();
        fill_random(&mut b).unwrap();
        assert_ne!(a, b);
    }
}
