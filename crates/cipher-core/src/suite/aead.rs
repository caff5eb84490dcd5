//! Raw AEAD suites: AES-256-GCM and ChaCha20-Poly1305.
//!
//! Both follow the same protocol:
//!
//! - a fresh 96-bit nonce from the OS CSPRNG for every encryption, never
//!   derived from the plaintext and never reused;
//! - no associated data;
//! - output is `nonce || ciphertext || tag`.
//!
//! **Do NOT add a deterministic or counter nonce here.** Nonce reuse under
//! either primitive breaks both confidentiality and authentication.

use std::fmt;

use aes_gcm::{
    aead::{consts::U12, generic_array::GenericArray, Aead, AeadCore, KeyInit},
    Aes256Gcm,
};
use chacha20poly1305::ChaCha20Poly1305;

use super::fill_random;
use crate::error::CipherError;
use crate::keys::KeyMaterial;

/// Byte length of the nonce prefix (96 bits).
pub const NONCE_LEN: usize = 12;

/// Byte length of the authentication tag appended by the primitive.
pub const TAG_LEN: usize = 16;

/// AES-256 in Galois/Counter Mode.
#[derive(Clone)]
pub struct AesGcmCipher {
    inner: Aes256Gcm,
}

impl AesGcmCipher {
    /// Initialise the cipher from a resolved 32-byte key.
    pub fn new(key: &KeyMaterial) -> Self {
        Self {
            inner: Aes256Gcm::new(GenericArray::from_slice(key.as_bytes())),
        }
    }

    /// Encrypt under a fresh random nonce.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CipherError> {
        seal(&self.inner, plaintext)
    }

    /// Split off the nonce, verify the tag and decrypt.
    pub fn decrypt(&self, envelope: &[u8]) -> Result<Vec<u8>, CipherError> {
        open(&self.inner, envelope)
    }
}

impl fmt::Debug for AesGcmCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AesGcmCipher([REDACTED])")
    }
}

/// ChaCha20 stream cipher with a Poly1305 authenticator.
#[derive(Clone)]
pub struct ChaChaCipher {
    inner: ChaCha20Poly1305,
}

impl ChaChaCipher {
    /// Initialise the cipher from a resolved 32-byte key.
    pub fn new(key: &KeyMaterial) -> Self {
        Self {
            inner: ChaCha20Poly1305::new(GenericArray::from_slice(key.as_bytes())),
        }
    }

    /// Encrypt under a fresh random nonce.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CipherError> {
        seal(&self.inner, plaintext)
    }

    /// Split off the nonce, verify the tag and decrypt.
    pub fn decrypt(&self, envelope: &[u8]) -> Result<Vec<u8>, CipherError> {
        open(&self.inner, envelope)
    }
}

impl fmt::Debug for ChaChaCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ChaChaCipher([REDACTED])")
    }
}

fn seal<A>(cipher: &A, plaintext: &[u8]) -> Result<Vec<u8>, CipherError>
where
    A: Aead + AeadCore<NonceSize = U12>,
{
    let mut nonce = [0u8; NONCE_LEN];
    fill_random(&mut nonce)?;

    let ciphertext = cipher
        .encrypt(GenericArray::from_slice(&nonce), plaintext)
        .map_err(|_| CipherError::AeadFailure)?;

    let mut envelope = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    envelope.extend_from_slice(&nonce);
    envelope.extend_from_slice(&ciphertext);
    Ok(envelope)
}

fn open<A>(cipher: &A, envelope: &[u8]) -> Result<Vec<u8>, CipherError>
where
    A: Aead + AeadCore<NonceSize = U12>,
{
    if envelope.len() < NONCE_LEN {
        return Err(CipherError::AuthenticationFailure);
    }
    let (nonce, ciphertext) = envelope.split_at(NONCE_LEN);
    cipher
        .decrypt(GenericArray::from_slice(nonce), ciphertext)
        .map_err(|_| CipherError::AuthenticationFailure)
}
