//! Offline key generation for operator provisioning.
//!
//! Not on the request path. Output is one base64 value per family, ready to be
//! placed in the environment the service reads its keys from.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::algorithm::Algorithm;
use crate::error::CipherError;
use crate::keys::KEY_LEN;
use crate::suite::{fill_random, FernetCipher};

/// Freshly generated, base64-encoded keys for every family.
#[derive(Serialize, Zeroize, ZeroizeOnDrop)]
pub struct GeneratedKeys {
    pub fernet: String,
    pub aes256: String,
    pub chacha20: String,
}

impl GeneratedKeys {
    /// The encoded key for `algorithm`.
    pub fn get(&self, algorithm: Algorithm) -> &str {
        match algorithm {
            Algorithm::Fernet => &self.fernet,
            Algorithm::Aes256Gcm => &self.aes256,
            Algorithm::ChaCha20Poly1305 => &self.chacha20,
        }
    }

    /// Render as `.env` lines, one `CRYPTO_KEY_*="..."` per family.
    pub fn to_dotenv(&self) -> String {
        let mut out = String::from("# Add these to your .env file\n\n");
        for algorithm in Algorithm::ALL {
            out.push_str(&format!(
                "{}=\"{}\"\n",
                algorithm.env_var(),
                self.get(algorithm)
            ));
        }
        out
    }
}

/// 32 random bytes from the OS CSPRNG.
///
/// # Errors
///
/// Returns [`CipherError::RandomnessFailure`] if the OS source fails.
pub fn generate_raw_key() -> Result<Zeroizing<[u8; KEY_LEN]>, CipherError> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    fill_random(&mut key[..])?;
    Ok(key)
}

/// Generate one independent key per family.
///
/// The Fernet key comes from [`FernetCipher::generate_key`]; the two raw AEAD
/// keys from [`generate_raw_key`].
pub fn generate_all() -> Result<GeneratedKeys, CipherError> {
    let fernet = FernetCipher::generate_key()?;
    let aes256 = generate_raw_key()?;
    let chacha20 = generate_raw_key()?;
    Ok(GeneratedKeys {
        fernet: STANDARD.encode(&fernet[..]),
        aes256: STANDARD.encode(&aes256[..]),
        chacha20: STANDARD.encode(&chacha20[..]),
    })
}
