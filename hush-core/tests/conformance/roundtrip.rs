//! Conformance: round-trip correctness.
//!
//! Invariants under test:
//! - `decrypt(encrypt(p)) == p` for boundary lengths 0, 1, 15, 16, 17 and
//!   a 1 MiB payload, on both the block and stream paths
//! - fresh random keys per case (no dependence on a lucky fixed key)
//! - transport envelopes decode back to the exact sealed bytes

use rand::rngs::OsRng;
use rand::RngCore;

use hush_core::envelope::FilePayload;
use hush_core::{block, pipeline, stream};

const BOUNDARY_LENGTHS: [usize; 6] = [0, 1, 15, 16, 17, 1_048_576];

fn random_key() -> [u8; 32] {
    let mut key = [0u8; 32];
    OsRng.fill_bytes(&mut key);
    key
}

fn patterned_payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

#[test]
fn conformance_block_roundtrip_boundary_lengths() {
    for len in BOUNDARY_LENGTHS {
        let key = random_key();
        let plaintext = patterned_payload(len);
        let payload = block::encrypt(&plaintext, &key).unwrap();
        let recovered = block::decrypt_payload(&payload, &key).unwrap();
        assert_eq!(recovered, plaintext, "block path, len {len}");
    }
}

#[test]
fn conformance_stream_roundtrip_boundary_lengths() {
    for len in BOUNDARY_LENGTHS {
        let key = random_key();
        let mac_key = random_key();
        let plaintext = patterned_payload(len);
        let sealed = stream::encrypt_file(&plaintext, &key, &mac_key).unwrap();
        assert_eq!(sealed.ciphertext.len(), len, "stream adds no padding");
        let recovered = stream::open_sealed_file(&sealed, &key, &mac_key).unwrap();
        assert_eq!(recovered, plaintext, "stream path, len {len}");
    }
}

#[test]
fn conformance_file_envelope_roundtrip() {
    let key = random_key();
    let mac_key = random_key();
    let plaintext = patterned_payload(4099);

    let sealed = stream::encrypt_file(&plaintext, &key, &mac_key).unwrap();
    let payload = FilePayload::from_sealed(&sealed);
    let reopened = payload.to_sealed().unwrap();
    let recovered = stream::open_sealed_file(&reopened, &key, &mac_key).unwrap();
    assert_eq!(recovered, plaintext);
}

#[test]
fn conformance_layered_roundtrip_text() {
    let master = b"conformance master secret";
    for text in [
        "",
        "a",
        "SecretMessage123",
        "longer message with spaces, digits 0123456789 and punctuation!?",
    ] {
        let payload = pipeline::layered_encrypt(text, master, "chat:conformance").unwrap();
        let recovered = pipeline::layered_decrypt(&payload, master, "chat:conformance").unwrap();
        assert_eq!(recovered, text, "layered path, input {text:?}");
    }
}

#[test]
fn conformance_fresh_iv_and_nonce_give_distinct_ciphertexts() {
    use std::collections::HashSet;

    const N: usize = 64;
    let key = random_key();
    let mac_key = random_key();

    let mut ivs = HashSet::new();
    let mut block_cts = HashSet::new();
    let mut nonces = HashSet::new();
    let mut stream_cts = HashSet::new();

    for _ in 0..N {
        let payload = block::encrypt(b"identical message", &key).unwrap();
        assert!(ivs.insert(payload.iv.clone()), "duplicate IV");
        assert!(block_cts.insert(payload.ciphertext), "duplicate block ciphertext");

        let sealed = stream::encrypt_file(b"identical file", &key, &mac_key).unwrap();
        assert!(nonces.insert(sealed.nonce), "duplicate nonce");
        assert!(stream_cts.insert(sealed.ciphertext), "duplicate stream ciphertext");
    }

    assert_eq!(ivs.len(), N);
    assert_eq!(nonces.len(), N);
}
