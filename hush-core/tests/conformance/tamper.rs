//! Conformance: tamper detection on the authenticated file path.
//!
//! Invariants under test:
//! - flipping ANY single bit of the ciphertext or tag causes an
//!   `Authentication` failure — deterministic, not probabilistic
//! - truncation and extension are rejected (the tag binds the length)
//! - a tampered payload never yields plaintext bytes

use hush_core::{stream, CoreError};

const KEY: [u8; 32] = [0x42; 32];
const MAC_KEY: [u8; 32] = [0x24; 32];

fn assert_rejected(ciphertext: &[u8], nonce: &[u8], tag: &[u8], what: &str) {
    let result = stream::decrypt_file(ciphertext, nonce, tag, &KEY, &MAC_KEY);
    match result {
        Err(CoreError::Authentication) => {}
        Err(other) => panic!("{what}: wrong error {other:?}"),
        Ok(_) => panic!("{what}: tampered payload decrypted"),
    }
}

#[test]
fn conformance_every_ciphertext_bit_flip_rejected() {
    let sealed = stream::encrypt_file(b"tamper me", &KEY, &MAC_KEY).unwrap();
    for byte in 0..sealed.ciphertext.len() {
        for bit in 0..8 {
            let mut corrupt = sealed.ciphertext.clone();
            corrupt[byte] ^= 1 << bit;
            assert_rejected(
                &corrupt,
                &sealed.nonce,
                &sealed.tag,
                &format!("ciphertext byte {byte} bit {bit}"),
            );
        }
    }
}

#[test]
fn conformance_every_tag_bit_flip_rejected() {
    let sealed = stream::encrypt_file(b"tamper me", &KEY, &MAC_KEY).unwrap();
    for byte in 0..sealed.tag.len() {
        for bit in 0..8 {
            let mut corrupt = sealed.tag;
            corrupt[byte] ^= 1 << bit;
            assert_rejected(
                &sealed.ciphertext,
                &sealed.nonce,
                &corrupt,
                &format!("tag byte {byte} bit {bit}"),
            );
        }
    }
}

#[test]
fn conformance_nonce_tampering_rejected() {
    // The nonce is bound into the tag; a swapped nonce must fail closed
    // rather than silently decrypting to garbage.
    let sealed = stream::encrypt_file(b"tamper me", &KEY, &MAC_KEY).unwrap();
    for byte in 0..sealed.nonce.len() {
        let mut corrupt = sealed.nonce;
        corrupt[byte] ^= 0x01;
        assert_rejected(
            &sealed.ciphertext,
            &corrupt,
            &sealed.tag,
            &format!("nonce byte {byte}"),
        );
    }
}

#[test]
fn conformance_truncation_and_extension_rejected() {
    let sealed = stream::encrypt_file(b"length binding test payload", &KEY, &MAC_KEY).unwrap();

    let truncated = &sealed.ciphertext[..sealed.ciphertext.len() - 1];
    assert_rejected(truncated, &sealed.nonce, &sealed.tag, "truncated by one");

    assert_rejected(&[], &sealed.nonce, &sealed.tag, "fully truncated");

    let mut extended = sealed.ciphertext.clone();
    extended.push(0x00);
    assert_rejected(&extended, &sealed.nonce, &sealed.tag, "extended by one");
}

#[test]
fn conformance_swapped_payload_fields_rejected() {
    // Tags are not transferable between payloads, even under the same keys.
    let a = stream::encrypt_file(b"payload one", &KEY, &MAC_KEY).unwrap();
    let b = stream::encrypt_file(b"payload two", &KEY, &MAC_KEY).unwrap();
    assert_rejected(&a.ciphertext, &a.nonce, &b.tag, "foreign tag");
    assert_rejected(&a.ciphertext, &b.nonce, &a.tag, "foreign nonce");
}
