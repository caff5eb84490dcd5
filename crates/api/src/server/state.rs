//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use cipher_core::{CipherFactory, CipherService, KeyProvider};

/// Application state shared across all request handlers.
///
/// All fields are cheaply cloneable (`Arc`-wrapped or already `Arc`-backed) so
/// that Axum can clone the state for each request without copying key material.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Envelope codec over the immutable key provider.
    pub cipher: CipherService,
    /// Algorithm used when a request omits `crypto_type`.
    pub default_crypto_type: Arc<String>,
    /// Minimum number of characters accepted by `POST /encrypt`.
    pub min_text_length: usize,
}

impl AppState {
    /// Create a new [`AppState`].
    pub fn new(cipher: CipherService, default_crypto_type: String, min_text_length: usize) -> Self {
        Self {
            cipher,
            default_crypto_type: Arc::new(default_crypto_type),
            min_text_length,
        }
    }
}

impl Default for AppState {
    /// Creates an [`AppState`] with no keys configured, suitable for tests.
    fn default() -> Self {
        Self::new(
            CipherService::new(CipherFactory::new(Arc::new(KeyProvider::new()))),
            "fernet".into(),
            10,
        )
    }
}
