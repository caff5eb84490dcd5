//! Fernet: a self-describing, versioned, timestamped authenticated token.
//!
//! Token layout (raw bytes, before any textual encoding):
//!
//! ```text
//! version (1, 0x80) || timestamp (8, big-endian seconds) || iv (16)
//!     || AES-128-CBC/PKCS#7 ciphertext || HMAC-SHA256 (32)
//! ```
//!
//! The HMAC covers every byte before it and is checked in constant time before
//! any decryption happens. The 32-byte key is split into a signing half
//! (first 16 bytes) and an encryption half (last 16 bytes).

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use aes::Aes128;
use cbc::cipher::{
    block_padding::Pkcs7, generic_array::GenericArray, BlockDecryptMut, BlockEncryptMut, KeyIvInit,
};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroizing;

use super::fill_random;
use crate::error::CipherError;
use crate::keys::{KeyMaterial, KEY_LEN};

type HmacSha256 = Hmac<Sha256>;
type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;

const VERSION: u8 = 0x80;
const HALF_KEY_LEN: usize = KEY_LEN / 2;
const TIMESTAMP_LEN: usize = 8;
const IV_LEN: usize = 16;
const BLOCK_LEN: usize = 16;
const HMAC_LEN: usize = 32;
const HEADER_LEN: usize = 1 + TIMESTAMP_LEN + IV_LEN;
const MIN_TOKEN_LEN: usize = HEADER_LEN + BLOCK_LEN + HMAC_LEN;

/// Tokens stamped further than this into the future are rejected when a TTL applies.
const MAX_CLOCK_SKEW_SECS: u64 = 60;

/// Fernet token cipher bound to one 32-byte key.
#[derive(Clone)]
pub struct FernetCipher {
    signing_key: Zeroizing<[u8; HALF_KEY_LEN]>,
    encryption_key: Zeroizing<[u8; HALF_KEY_LEN]>,
    ttl: Option<Duration>,
}

impl FernetCipher {
    /// Split a resolved key into its signing and encryption halves.
    pub fn new(key: &KeyMaterial) -> Self {
        let bytes = key.as_bytes();
        let mut signing_key = Zeroizing::new([0u8; HALF_KEY_LEN]);
        let mut encryption_key = Zeroizing::new([0u8; HALF_KEY_LEN]);
        signing_key.copy_from_slice(&bytes[..HALF_KEY_LEN]);
        encryption_key.copy_from_slice(&bytes[HALF_KEY_LEN..]);
        Self {
            signing_key,
            encryption_key,
            ttl: None,
        }
    }

    /// Reject tokens older than `ttl` on decryption.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Generate a fresh Fernet key: 32 random bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::RandomnessFailure`] if the OS source fails.
    pub fn generate_key() -> Result<Zeroizing<[u8; KEY_LEN]>, CipherError> {
        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        fill_random(&mut key[..])?;
        Ok(key)
    }

    /// Produce a token stamped with the current time and a random IV.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CipherError> {
        let mut iv = [0u8; IV_LEN];
        fill_random(&mut iv)?;
        self.seal(plaintext, unix_now(), &iv)
    }

    /// Verify a token and return its embedded plaintext.
    pub fn decrypt(&self, token: &[u8]) -> Result<Vec<u8>, CipherError> {
        self.open(token, unix_now())
    }

    fn seal(&self, plaintext: &[u8], timestamp: u64, iv: &[u8; IV_LEN]) -> Result<Vec<u8>, CipherError> {
        let ciphertext = Aes128CbcEnc::new(
            GenericArray::from_slice(&self.encryption_key[..]),
            GenericArray::from_slice(iv),
        )
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext);

        let mut token = Vec::with_capacity(HEADER_LEN + ciphertext.len() + HMAC_LEN);
        token.push(VERSION);
        token.extend_from_slice(&timestamp.to_be_bytes());
        token.extend_from_slice(iv);
        token.extend_from_slice(&ciphertext);

        let mut mac = self.mac()?;
        mac.update(&token);
        token.extend_from_slice(&mac.finalize().into_bytes());
        Ok(token)
    }

    fn open(&self, token: &[u8], now: u64) -> Result<Vec<u8>, CipherError> {
        if token.len() < MIN_TOKEN_LEN || token[0] != VERSION {
            return Err(CipherError::AuthenticationFailure);
        }

        let (signed, tag) = token.split_at(token.len() - HMAC_LEN);
        let mut mac = self.mac()?;
        mac.update(signed);
        mac.verify_slice(tag)
            .map_err(|_| CipherError::AuthenticationFailure)?;

        let mut stamp = [0u8; TIMESTAMP_LEN];
        stamp.copy_from_slice(&signed[1..1 + TIMESTAMP_LEN]);
        self.check_age(u64::from_be_bytes(stamp), now)?;

        let iv = &signed[1 + TIMESTAMP_LEN..HEADER_LEN];
        let ciphertext = &signed[HEADER_LEN..];
        if ciphertext.len() % BLOCK_LEN != 0 {
            return Err(CipherError::AuthenticationFailure);
        }

        Aes128CbcDec::new(
            GenericArray::from_slice(&self.encryption_key[..]),
            GenericArray::from_slice(iv),
        )
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| CipherError::AuthenticationFailure)
    }

    fn check_age(&self, timestamp: u64, now: u64) -> Result<(), CipherError> {
        let Some(ttl) = self.ttl else {
            return Ok(());
        };
        let expired = timestamp.saturating_add(ttl.as_secs()) < now;
        let from_future = timestamp > now.saturating_add(MAX_CLOCK_SKEW_SECS);
        if expired || from_future {
            return Err(CipherError::AuthenticationFailure);
        }
        Ok(())
    }

    fn mac(&self) -> Result<HmacSha256, CipherError> {
        // HMAC accepts keys of any length; this cannot fail for a 16-byte key.
        HmacSha256::new_from_slice(&self.signing_key[..]).map_err(|_| CipherError::AeadFailure)
    }
}

impl fmt::Debug for FernetCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FernetCipher")
            .field("key", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish()
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::Algorithm;
    use base64::{engine::general_purpose::URL_SAFE, Engine as _};

    // Published Fernet test vector from the token format repository (generate.json).
    const VECTOR_SECRET: &str = "cw_0x689RpI-jtRR7oE8h_eQsKImvJapLeSbXpwF4e4=";
    const VECTOR_TOKEN: &str = "gAAAAAAdwJ6wAAECAwQFBgcICQoLDA0ODy021cpGVWKZ_eEwCGM4BLLF_5CV9dOPmrhuVUPgJobwOz7JcbmrR64jVmpU4IwqDA==";
    const VECTOR_NOW: u64 = 499_162_800;
    const VECTOR_IV: [u8; IV_LEN] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];

    fn vector_cipher() -> FernetCipher {
        let secret = URL_SAFE.decode(VECTOR_SECRET).unwrap();
        FernetCipher::new(&KeyMaterial::new(Algorithm::Fernet, &secret).unwrap())
    }

    fn cipher(byte: u8) -> FernetCipher {
        FernetCipher::new(&KeyMaterial::new(Algorithm::Fernet, &[byte; KEY_LEN]).unwrap())
    }

    #[test]
    fn matches_published_vector() {
        let cipher = vector_cipher();
        let expected = URL_SAFE.decode(VECTOR_TOKEN).unwrap();
        let token = cipher.seal(b"hello", VECTOR_NOW, &VECTOR_IV).unwrap();
        assert_eq!(token, expected);
        assert_eq!(cipher.open(&expected, VECTOR_NOW).unwrap(), b"hello");
    }

    #[test]
    fn round_trip() {
        let c = cipher(0x11);
        let token = c.encrypt(b"Mensagem para teste do endpoint").unwrap();
        assert_eq!(token[0], VERSION);
        assert_eq!(c.decrypt(&token).unwrap(), b"Mensagem para teste do endpoint");
    }

    #[test]
    fn wrong_key_fails() {
        let token = cipher(1).encrypt(b"secret").unwrap();
        assert!(matches!(
            cipher(2).decrypt(&token),
            Err(CipherError::AuthenticationFailure)
        ));
    }

    #[test]
    fn tampered_token_fails() {
        let c = cipher(3);
        let token = c.encrypt(b"tamper me").unwrap();
        for idx in [0, 5, HEADER_LEN, token.len() - 1] {
            let mut bad = token.clone();
            bad[idx] ^= 0x01;
            assert!(matches!(c.decrypt(&bad), Err(CipherError::AuthenticationFailure)));
        }
    }

    #[test]
    fn truncated_token_fails() {
        let c = cipher(4);
        let token = c.encrypt(b"short").unwrap();
        assert!(c.decrypt(&token[..MIN_TOKEN_LEN - 1]).is_err());
    }

    #[test]
    fn ttl_rejects_expired_and_future_tokens() {
        let c = cipher(5).with_ttl(Duration::from_secs(60));
        let iv = [7u8; IV_LEN];
        let token = c.seal(b"ttl", 1_000, &iv).unwrap();
        assert!(c.open(&token, 1_030).is_ok());
        assert!(c.open(&token, 1_061).is_err());
        assert!(c.open(&token, 900).is_err());
    }

    #[test]
    fn no_ttl_accepts_old_tokens() {
        let c = cipher(6);
        let token = c.seal(b"old", 10, &[0u8; IV_LEN]).unwrap();
        assert_eq!(c.open(&token, u64::MAX).unwrap(), b"old");
    }

    #[test]
    fn generated_keys_differ() {
        let a = FernetCipher::generate_key().unwrap();
        let b = FernetCipher::generate_key().unwrap();
        assert_ne!(*a, *b);
    }
}
