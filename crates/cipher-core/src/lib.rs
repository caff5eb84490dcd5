//! Cipher abstraction and key management for the SecureCipher service.
//!
//! Control flow for every request:
//!
//! ```text
//! identifier -> Algorithm::parse -> keys::resolve -> CipherFactory -> CipherSuite
//! ```
//!
//! The crate is free of HTTP, configuration loading and global state. Secrets
//! enter only through an explicit [`KeyProvider`] value.

pub mod algorithm;
pub mod error;
pub mod factory;
pub mod keygen;
pub mod keys;
pub mod service;
pub mod suite;

pub use algorithm::Algorithm;
pub use error::{CipherError, Encoded};
pub use factory::CipherFactory;
pub use keys::{KeyMaterial, KeyProvider, KEY_LEN};
pub use service::{CipherService, Opened, Sealed};
pub use suite::CipherSuite;
