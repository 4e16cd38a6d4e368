//! Conformance: end-to-end scenarios with pinned intermediate values.
//!
//! Two scenarios exercise the full public surface:
//! - message pipeline: affine mapping pinned character by character, then
//!   the full three-layer round trip
//! - file AEAD: a 70-byte UTF-8 payload under fixed keys, including the
//!   corrupted-last-byte rejection

use hush_core::classical::{AffineCipher, TextStage};
use hush_core::{pipeline, stream, CoreError};

// ── Scenario: message pipeline ──────────────────────────────────

/// Affine stage with the default parameters `a = 5, b = 8`:
/// `E('S') = (5·18 + 8) mod 26 = 20 → 'U'`, and so on for every letter;
/// digits shift by `b mod 10`.
#[test]
fn scenario_affine_stage_mapping() {
    let affine = AffineCipher::new(5, 8).unwrap();
    assert_eq!(affine.apply("S"), "U");
    assert_eq!(affine.apply("SecretMessage123"), "UcspczQcuuimc901");
    assert_eq!(affine.invert("UcspczQcuuimc901"), "SecretMessage123");
}

#[test]
fn scenario_message_pipeline_round_trip() {
    let master = b"scenario master key";
    let chat = "chat:scenario";

    let payload = pipeline::layered_encrypt("SecretMessage123", master, chat).unwrap();
    assert_eq!(payload.layers, 3);

    // The envelope fields must be valid base64 transport strings.
    assert!(hush_core::encoding::from_base64(&payload.ciphertext).is_ok());
    assert_eq!(
        hush_core::encoding::from_base64(&payload.iv).unwrap().len(),
        16
    );

    let recovered = pipeline::layered_decrypt(&payload, master, chat).unwrap();
    assert_eq!(recovered, "SecretMessage123");
}

// ── Scenario: file AEAD ─────────────────────────────────────────

const FILE_KEY: [u8; 32] = [0x42; 32];
const FILE_MAC_KEY: [u8; 32] = [0x24; 32];

/// 70 bytes of UTF-8, multibyte characters included.
fn seventy_byte_payload() -> Vec<u8> {
    let data = format!("{}{}", "café ".repeat(10), "0123456789");
    assert_eq!(data.len(), 70);
    data.into_bytes()
}

#[test]
fn scenario_file_aead_round_trip() {
    let plaintext = seventy_byte_payload();
    let sealed = stream::encrypt_file(&plaintext, &FILE_KEY, &FILE_MAC_KEY).unwrap();

    assert_eq!(sealed.ciphertext.len(), 70);
    assert_eq!(sealed.nonce.len(), 12);
    assert_eq!(sealed.tag.len(), 64);
    assert_ne!(sealed.ciphertext, plaintext);

    let recovered = stream::open_sealed_file(&sealed, &FILE_KEY, &FILE_MAC_KEY).unwrap();
    assert_eq!(recovered, plaintext);
}

#[test]
fn scenario_file_aead_corrupt_last_byte_rejected() {
    let plaintext = seventy_byte_payload();
    let mut sealed = stream::encrypt_file(&plaintext, &FILE_KEY, &FILE_MAC_KEY).unwrap();

    let last = sealed.ciphertext.len() - 1;
    sealed.ciphertext[last] ^= 0x01;

    let err = stream::open_sealed_file(&sealed, &FILE_KEY, &FILE_MAC_KEY).unwrap_err();
    assert!(matches!(err, CoreError::Authentication));
}
