//! End-to-end properties of the cipher layer through its public API.

use std::collections::HashSet;
use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use cipher_core::suite::{NONCE_LEN, TAG_LEN};
use cipher_core::{Algorithm, CipherError, CipherFactory, CipherService, KeyProvider, KEY_LEN};

fn provider_with(byte: u8) -> KeyProvider {
    Algorithm::ALL.into_iter().fold(KeyProvider::new(), |p, alg| {
        p.with_key(alg, STANDARD.encode([byte ^ alg as u8; KEY_LEN]))
    })
}

fn service_with(byte: u8) -> CipherService {
    CipherService::new(CipherFactory::new(Arc::new(provider_with(byte))))
}

#[test]
fn round_trip_for_all_algorithms() {
    let svc = service_with(0x10);
    let samples: [&[u8]; 4] = [
        b"a",
        b"Mensagem para teste do endpoint",
        "acentua\u{e7}\u{e3}o \u{1f512}".as_bytes(),
        &[0u8, 255, 1, 254, 2, 253],
    ];
    for id in ["fernet", "aes", "chacha"] {
        for plaintext in samples {
            let sealed = svc.encrypt(plaintext, id).unwrap();
            assert_eq!(svc.decrypt(&sealed.token, id).unwrap().plaintext, plaintext);
        }
    }
}

#[test]
fn single_bit_flips_are_rejected_for_raw_aead() {
    let factory = CipherFactory::new(Arc::new(provider_with(0x20)));
    for id in ["aes", "chacha"] {
        let suite = factory.select(id).unwrap();
        let envelope = suite.encrypt(b"flip every bit of me").unwrap();
        for byte in 0..envelope.len() {
            for bit in 0..8 {
                let mut tampered = envelope.clone();
                tampered[byte] ^= 1 << bit;
                assert!(
                    matches!(suite.decrypt(&tampered), Err(CipherError::AuthenticationFailure)),
                    "{id}: flip at byte {byte} bit {bit} was accepted"
                );
            }
        }
    }
}

#[test]
fn off_by_one_key_lengths_rejected_before_encryption() {
    for len in [31, 33] {
        for alg in [Algorithm::Aes256Gcm, Algorithm::ChaCha20Poly1305] {
            let provider = KeyProvider::new().with_key(alg, STANDARD.encode(vec![7u8; len]));
            let svc = CipherService::new(CipherFactory::new(Arc::new(provider)));
            assert!(matches!(
                svc.encrypt(b"never encrypted", alg.as_str()),
                Err(CipherError::InvalidKeyLength { expected: 32, actual, .. }) if actual == len
            ));
        }
    }
}

#[test]
fn rot13_is_unsupported() {
    let err = service_with(0x30).encrypt(b"hello", "rot13").unwrap_err();
    assert!(matches!(err, CipherError::UnsupportedAlgorithm(ref id) if id == "rot13"));
}

#[test]
fn ten_thousand_nonces_are_distinct() {
    for id in ["aes", "chacha"] {
        let suite = CipherFactory::new(Arc::new(provider_with(0x40)))
            .select(id)
            .unwrap();
        let mut nonces = HashSet::with_capacity(10_000);
        for _ in 0..10_000 {
            let envelope = suite.encrypt(b"same plaintext, same key").unwrap();
            let mut nonce = [0u8; NONCE_LEN];
            nonce.copy_from_slice(&envelope[..NONCE_LEN]);
            nonces.insert(nonce);
        }
        assert_eq!(nonces.len(), 10_000, "{id} repeated a nonce");
    }
}

#[test]
fn cross_key_rejection_within_family() {
    let a = service_with(0x50);
    let b = service_with(0x51);
    for id in ["fernet", "aes", "chacha"] {
        let sealed = a.encrypt(b"bound to key A", id).unwrap();
        assert!(matches!(
            b.decrypt(&sealed.token, id),
            Err(CipherError::AuthenticationFailure)
        ));
    }
}

#[test]
fn aes_full_cycle_scenario() {
    let plaintext = "Mensagem de teste para ciclo completo.";
    let key_k = STANDARD.encode([0x6Bu8; KEY_LEN]);
    let other = STANDARD.encode([0x6Cu8; KEY_LEN]);

    let svc_k = CipherService::new(CipherFactory::new(Arc::new(
        KeyProvider::new().with_key(Algorithm::Aes256Gcm, key_k),
    )));
    let svc_other = CipherService::new(CipherFactory::new(Arc::new(
        KeyProvider::new().with_key(Algorithm::Aes256Gcm, other),
    )));

    let sealed = svc_k.encrypt(plaintext.as_bytes(), "aes").unwrap();
    assert_eq!(
        STANDARD.decode(&sealed.token).unwrap().len(),
        NONCE_LEN + plaintext.len() + TAG_LEN
    );
    assert_eq!(
        svc_k.decrypt(&sealed.token, "aes").unwrap().plaintext,
        plaintext.as_bytes()
    );
    assert!(matches!(
        svc_other.decrypt(&sealed.token, "aes"),
        Err(CipherError::AuthenticationFailure)
    ));
}

#[test]
fn suites_are_shareable_across_threads() {
    let svc = Arc::new(service_with(0x60));
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let svc = Arc::clone(&svc);
            std::thread::spawn(move || {
                let msg = format!("thread {i}");
                let sealed = svc.encrypt(msg.as_bytes(), "chacha").unwrap();
                svc.decrypt(&sealed.token, "chacha").unwrap().plaintext == msg.as_bytes()
            })
        })
        .collect();
    for h in handles {
        assert!(h.join().unwrap());
    }
}
