//! Algorithm identifiers and their caller-facing parsing rules.

use std::fmt;
use std::str::FromStr;

use crate::error::CipherError;

/// One of the three supported authenticated-encryption families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Fernet tokens (AES-128-CBC + HMAC-SHA256, versioned and timestamped).
    Fernet,
    /// AES-256 in Galois/Counter Mode with a random 96-bit nonce.
    Aes256Gcm,
    /// ChaCha20-Poly1305 (RFC 8439) with a random 96-bit nonce.
    ChaCha20Poly1305,
}

impl Algorithm {
    /// All families, in the order used to break ties when parsing.
    pub const ALL: [Algorithm; 3] = [
        Algorithm::Fernet,
        Algorithm::Aes256Gcm,
        Algorithm::ChaCha20Poly1305,
    ];

    /// Resolve a caller-supplied identifier.
    ///
    /// Matching is case-insensitive and by substring: anything containing
    /// `fernet`, `aes` or `chacha` selects that family. When an identifier
    /// contains more than one token the first family in [`Algorithm::ALL`] wins.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::UnsupportedAlgorithm`] naming `identifier` when
    /// no token matches.
    pub fn parse(identifier: &str) -> Result<Self, CipherError> {
        let folded = identifier.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|alg| folded.contains(alg.token()))
            .ok_or_else(|| CipherError::UnsupportedAlgorithm(identifier.to_owned()))
    }

    /// Canonical name, echoed back to callers and used in log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Fernet => "fernet",
            Algorithm::Aes256Gcm => "aes-256-gcm",
            Algorithm::ChaCha20Poly1305 => "chacha20-poly1305",
        }
    }

    /// Environment variable the operator provisions this family's key under.
    pub fn env_var(self) -> &'static str {
        match self {
            Algorithm::Fernet => "CRYPTO_KEY_FERNET",
            Algorithm::Aes256Gcm => "CRYPTO_KEY_AES256",
            Algorithm::ChaCha20Poly1305 => "CRYPTO_KEY_CHACHA20",
        }
    }

    fn token(self) -> &'static str {
        match self {
            Algorithm::Fernet => "fernet",
            Algorithm::Aes256Gcm => "aes",
            Algorithm::ChaCha20Poly1305 => "chacha",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = CipherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_and_loose_identifiers() {
        assert_eq!(Algorithm::parse("fernet").unwrap(), Algorithm::Fernet);
        assert_eq!(Algorithm::parse("Fernet-like").unwrap(), Algorithm::Fernet);
        assert_eq!(Algorithm::parse("aes").unwrap(), Algorithm::Aes256Gcm);
        assert_eq!(Algorithm::parse("AES-256-GCM").unwrap(), Algorithm::Aes256Gcm);
        assert_eq!(
            Algorithm::parse("ChaCha20-Poly1305").unwrap(),
            Algorithm::ChaCha20Poly1305
        );
    }

    #[test]
    fn rejects_unknown_identifier_by_name() {
        let err = Algorithm::parse("rot13").unwrap_err();
        assert!(matches!(err, CipherError::UnsupportedAlgorithm(ref id) if id == "rot13"));
        assert!(Algorithm::parse("").is_err());
    }

    #[test]
    fn ambiguous_identifier_follows_priority() {
        assert_eq!(Algorithm::parse("chacha-aes").unwrap(), Algorithm::Aes256Gcm);
        assert_eq!(Algorithm::parse("aes-fernet").unwrap(), Algorithm::Fernet);
    }

    #[test]
    fn canonical_names_round_trip() {
        for alg in Algorithm::ALL {
            assert_eq!(alg.as_str().parse::<Algorithm>().unwrap(), alg);
            assert_eq!(alg.to_string(), alg.as_str());
        }
    }
}
