//! Authentication layer — keyed-hash tags and constant-time comparison.
//!
//! The tag is HMAC-SHA-512 over `nonce ‖ declared-length (8 bytes LE) ‖
//! ciphertext`, always computed over data the receiver can reconstruct.
//! Verification compares with a byte-wise XOR accumulation that never
//! short-circuits on the first mismatching byte.

use hmac::{Hmac, Mac};
use sha2::Sha512;

use crate::constants::{MAC_KEY_LENGTH, NONCE_LENGTH, TAG_LENGTH};

type HmacSha512 = Hmac<Sha512>;

/// Compute the 64-byte authentication tag for a file payload.
pub fn tag(
    mac_key: &[u8; MAC_KEY_LENGTH],
    nonce: &[u8; NONCE_LENGTH],
    declared_len: u64,
    ciphertext: &[u8],
) -> [u8; TAG_LENGTH] {
    let mut mac =
        HmacSha512::new_from_slice(mac_key).expect("HMAC accepts any key length");
    mac.update(nonce);
    mac.update(&declared_len.to_le_bytes());
    mac.update(ciphertext);
    let digest = mac.finalize().into_bytes();
    let mut out = [0u8; TAG_LENGTH];
    out.copy_from_slice(&digest);
    out
}

/// Recompute the tag and compare in constant time.
pub fn verify(
    mac_key: &[u8; MAC_KEY_LENGTH],
    nonce: &[u8; NONCE_LENGTH],
    declared_len: u64,
    ciphertext: &[u8],
    received: &[u8],
) -> bool {
    let expected = tag(mac_key, nonce, declared_len, ciphertext);
    constant_time_eq(&expected, received)
}

/// Incremental tag verification for chunked file delivery.
///
/// Feed ciphertext chunks in order with [`update`](Self::update), then
/// call [`finalize`](Self::finalize). The keystream pass over the same
/// chunks must not start until finalize returns `true`.
pub struct FileTagVerifier {
    mac: HmacSha512,
}

impl FileTagVerifier {
    /// Start a verification over `(nonce, declared_len)`.
    pub fn new(
        mac_key: &[u8; MAC_KEY_LENGTH],
        nonce: &[u8; NONCE_LENGTH],
        declared_len: u64,
    ) -> Self {
        let mut mac =
            HmacSha512::new_from_slice(mac_key).expect("HMAC accepts any key length");
        mac.update(nonce);
        mac.update(&declared_len.to_le_bytes());
        Self { mac }
    }

    /// Absorb the next ciphertext chunk.
    pub fn update(&mut self, chunk: &[u8]) {
        self.mac.update(chunk);
    }

    /// Consume the verifier and compare against the received tag in
    /// constant time.
    pub fn finalize(self, received: &[u8]) -> bool {
        let digest = self.mac.finalize().into_bytes();
        let mut expected = [0u8; TAG_LENGTH];
        expected.copy_from_slice(&digest);
        constant_time_eq(&expected, received)
    }
}

/// Constant-time byte comparison: XOR-accumulates every byte pair so the
/// running time does not depend on the position of the first mismatch.
/// Length mismatch fails without comparing bytes.
#[inline(never)]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
