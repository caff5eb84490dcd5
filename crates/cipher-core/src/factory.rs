//! Identifier -> key -> cipher suite selection.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::algorithm::Algorithm;
use crate::error::CipherError;
use crate::keys::{self, KeyProvider};
use crate::suite::CipherSuite;

/// Builds the [`CipherSuite`] for a caller-supplied algorithm identifier.
///
/// Cheap to clone and safe to share: the only state is the immutable
/// [`KeyProvider`] and an optional Fernet TTL.
#[derive(Clone, Debug)]
pub struct CipherFactory {
    keys: Arc<KeyProvider>,
    fernet_ttl: Option<Duration>,
}

impl CipherFactory {
    /// Create a factory over the given key provider.
    pub fn new(keys: Arc<KeyProvider>) -> Self {
        Self {
            keys,
            fernet_ttl: None,
        }
    }

    /// Reject Fernet tokens older than `ttl` on decryption.
    pub fn with_fernet_ttl(mut self, ttl: Duration) -> Self {
        self.fernet_ttl = Some(ttl);
        self
    }

    /// Parse `identifier`, resolve its key and build the matching suite.
    ///
    /// # Errors
    ///
    /// - [`CipherError::UnsupportedAlgorithm`] if no family matches.
    /// - Any key resolution error from [`keys::resolve`].
    pub fn select(&self, identifier: &str) -> Result<CipherSuite, CipherError> {
        let algorithm = Algorithm::parse(identifier)?;
        self.suite_for(algorithm)
    }

    /// Resolve the key for an already-parsed `algorithm` and build its suite.
    pub fn suite_for(&self, algorithm: Algorithm) -> Result<CipherSuite, CipherError> {
        let key = keys::resolve(&self.keys, algorithm)?;
        let suite = match (CipherSuite::from_key(&key), self.fernet_ttl) {
            (CipherSuite::Fernet(c), Some(ttl)) => CipherSuite::Fernet(c.with_ttl(ttl)),
            (suite, _) => suite,
        };
        debug!(algorithm = %algorithm, "cipher suite selected");
        Ok(suite)
    }

    /// Resolve every configured key once so that encoding and length problems
    /// surface at startup rather than on the first request.
    ///
    /// Families with no key are skipped with a warning; they fail per request
    /// with [`CipherError::MissingKey`].
    ///
    /// # Errors
    ///
    /// Returns the first resolution error for a family that has a key.
    pub fn preflight(&self) -> Result<Vec<Algorithm>, CipherError> {
        let mut ready = Vec::new();
        for algorithm in Algorithm::ALL {
            match keys::resolve(&self.keys, algorithm) {
                Ok(_) => ready.push(algorithm),
                Err(CipherError::MissingKey(_)) => {
                    warn!(
                        algorithm = %algorithm,
                        env = algorithm.env_var(),
                        "no key configured; requests for this algorithm will be rejected"
                    );
                }
                Err(e) => return Err(e),
            }
        }
        info!(count = ready.len(), "cipher keys validated");
        Ok(ready)
    }

    /// Families that currently have a key configured.
    pub fn configured(&self) -> Vec<Algorithm> {
        self.keys.configured()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KEY_LEN;
    use base64::{engine::general_purpose::STANDARD, Engine as _};

    fn key_text(byte: u8, len: usize) -> String {
        STANDARD.encode(vec![byte; len])
    }

    fn full_factory() -> CipherFactory {
        let provider = KeyProvider::new()
            .with_key(Algorithm::Fernet, key_text(1, KEY_LEN))
            .with_key(Algorithm::Aes256Gcm, key_text(2, KEY_LEN))
            .with_key(Algorithm::ChaCha20Poly1305, key_text(3, KEY_LEN));
        CipherFactory::new(Arc::new(provider))
    }

    #[test]
    fn selects_each_family() {
        let factory = full_factory();
        assert_eq!(factory.select("FERNET").unwrap().algorithm(), Algorithm::Fernet);
        assert_eq!(factory.select("aes-gcm").unwrap().algorithm(), Algorithm::Aes256Gcm);
        assert_eq!(
            factory.select("chacha20").unwrap().algorithm(),
            Algorithm::ChaCha20Poly1305
        );
    }

    #[test]
    fn unknown_identifier_rejected() {
        let err = full_factory().select("rot13").unwrap_err();
        assert!(matches!(err, CipherError::UnsupportedAlgorithm(ref id) if id == "rot13"));
    }

    #[test]
    fn missing_key_surfaces_per_request() {
        let factory = CipherFactory::new(Arc::new(KeyProvider::new()));
        assert!(matches!(
            factory.select("aes"),
            Err(CipherError::MissingKey(Algorithm::Aes256Gcm))
        ));
    }

    #[test]
    fn ttl_is_applied_to_fernet_only() {
        let factory = full_factory().with_fernet_ttl(Duration::from_secs(30));
        match factory.select("fernet").unwrap() {
            CipherSuite::Fernet(c) => assert!(format!("{c:?}").contains("30s")),
            other => panic!("expected fernet suite, got {other:?}"),
        }
        assert!(matches!(factory.select("aes").unwrap(), CipherSuite::AesGcm(_)));
    }

    #[test]
    fn preflight_skips_missing_and_reports_ready() {
        let provider = KeyProvider::new().with_key(Algorithm::Aes256Gcm, key_text(9, KEY_LEN));
        let ready = CipherFactory::new(Arc::new(provider)).preflight().unwrap();
        assert_eq!(ready, vec![Algorithm::Aes256Gcm]);
    }

    #[test]
    fn preflight_fails_on_bad_key() {
        let provider = KeyProvider::new().with_key(Algorithm::ChaCha20Poly1305, key_text(9, 16));
        let err = CipherFactory::new(Arc::new(provider)).preflight().unwrap_err();
        assert!(matches!(err, CipherError::InvalidKeyLength { actual: 16, .. }));
    }
}
