//! Stream cipher engine — ARX double-round keystream generator.
//!
//! State: 16 unsigned 32-bit words — 4 constants, 8 key words, 1 block
//! counter, 3 nonce words. Ten double-rounds (column then diagonal
//! quarter-rounds), feed-forward addition of the original state, and
//! little-endian serialization produce one 64-byte keystream block.
//! Encryption and decryption are the same XOR.
//!
//! The generator matches the published ARX block-function vectors
//! (RFC 8439), which pins the whole construction with a known-answer test.
//!
//! File payloads pair the keystream with a keyed-hash tag (see
//! [`crate::auth`]). Decryption is two-phase: the tag is verified over the
//! entire received ciphertext before a single keystream byte is applied.

use rand::rngs::OsRng;
use rand::RngCore;
use tracing::{debug, warn};

use crate::auth;
use crate::constants::{
    KEYSTREAM_BLOCK_SIZE, MAC_KEY_LENGTH, NONCE_LENGTH, STREAM_CHUNK_SIZE, STREAM_DOUBLE_ROUNDS,
    STREAM_KEY_LENGTH, TAG_LENGTH,
};
use crate::errors::CoreError;

/// The four fixed state words ("expand 32-byte k", little-endian).
const STATE_CONSTANTS: [u32; 4] = [0x6170_7865, 0x3320_646e, 0x7962_2d32, 0x6b20_6574];

/// A sealed file: ciphertext plus the nonce and tag needed to open it.
///
/// Produced by [`encrypt_file`], consumed by [`decrypt_file`], discarded
/// after use. The base64 transport form is
/// [`crate::envelope::FilePayload`].
#[derive(Debug, Clone)]
pub struct SealedFile {
    /// Keystream-XORed payload bytes.
    pub ciphertext: Vec<u8>,
    /// Fresh per-call nonce. Never reused with the same key.
    pub nonce: [u8; NONCE_LENGTH],
    /// Keyed-hash tag over `nonce ‖ length ‖ ciphertext`.
    pub tag: [u8; TAG_LENGTH],
}

/// One ARX quarter-round on state words `(a, b, c, d)`.
#[inline(always)]
fn quarter_round(state: &mut [u32; 16], a: usize, b: usize, c: usize, d: usize) {
    state[a] = state[a].wrapping_add(state[b]);
    state[d] ^= state[a];
    state[d] = state[d].rotate_left(16);

    state[c] = state[c].wrapping_add(state[d]);
    state[b] ^= state[c];
    state[b] = state[b].rotate_left(12);

    state[a] = state[a].wrapping_add(state[b]);
    state[d] ^= state[a];
    state[d] = state[d].rotate_left(8);

    state[c] = state[c].wrapping_add(state[d]);
    state[b] ^= state[c];
    state[b] = state[b].rotate_left(7);
}

/// Generate one 64-byte keystream block for `(key, counter, nonce)`.
fn keystream_block(
    key: &[u8; STREAM_KEY_LENGTH],
    counter: u32,
    nonce: &[u8; NONCE_LENGTH],
) -> [u8; KEYSTREAM_BLOCK_SIZE] {
    let mut state = [0u32; 16];
    state[..4].copy_from_slice(&STATE_CONSTANTS);
    for (word, chunk) in state[4..12].iter_mut().zip(key.chunks_exact(4)) {
        *word = u32::from_le_bytes(chunk.try_into().unwrap());
    }
    state[12] = counter;
    for (word, chunk) in state[13..16].iter_mut().zip(nonce.chunks_exact(4)) {
        *word = u32::from_le_bytes(chunk.try_into().unwrap());
    }

    let original = state;
    for _ in 0..STREAM_DOUBLE_ROUNDS {
        // Columns.
        quarter_round(&mut state, 0, 4, 8, 12);
        quarter_round(&mut state, 1, 5, 9, 13);
        quarter_round(&mut state, 2, 6, 10, 14);
        quarter_round(&mut state, 3, 7, 11, 15);
        // Diagonals.
        quarter_round(&mut state, 0, 5, 10, 15);
        quarter_round(&mut state, 1, 6, 11, 12);
        quarter_round(&mut state, 2, 7, 8, 13);
        quarter_round(&mut state, 3, 4, 9, 14);
    }
    for (word, orig) in state.iter_mut().zip(original.iter()) {
        *word = word.wrapping_add(*orig);
    }

    let mut out = [0u8; KEYSTREAM_BLOCK_SIZE];
    for (chunk, word) in out.chunks_exact_mut(4).zip(state.iter()) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }
    out
}

/// Incremental keystream application.
///
/// Feed plaintext (or ciphertext) in arbitrary-size chunks, in order; the
/// cursor keeps the block counter consistent with the total number of
/// bytes consumed, carrying partial keystream blocks across chunk
/// boundaries. The caller is responsible for chunk ordering.
pub struct KeystreamCursor {
    key: [u8; STREAM_KEY_LENGTH],
    nonce: [u8; NONCE_LENGTH],
    counter: u32,
    block: [u8; KEYSTREAM_BLOCK_SIZE],
    /// Offset into `block`; `KEYSTREAM_BLOCK_SIZE` means exhausted.
    offset: usize,
}

impl KeystreamCursor {
    /// Cursor positioned at counter 0 for `(key, nonce)`.
    pub fn new(key: &[u8; STREAM_KEY_LENGTH], nonce: &[u8; NONCE_LENGTH]) -> Self {
        Self {
            key: *key,
            nonce: *nonce,
            counter: 0,
            block: [0u8; KEYSTREAM_BLOCK_SIZE],
            offset: KEYSTREAM_BLOCK_SIZE,
        }
    }

    /// XOR the next keystream bytes into `data` in place.
    pub fn apply(&mut self, data: &mut [u8]) {
        for byte in data.iter_mut() {
            if self.offset == KEYSTREAM_BLOCK_SIZE {
                self.block = keystream_block(&self.key, self.counter, &self.nonce);
                self.counter = self.counter.wrapping_add(1);
                self.offset = 0;
            }
            *byte ^= self.block[self.offset];
            self.offset += 1;
        }
    }
}

fn check_stream_key(key: &[u8]) -> Result<[u8; STREAM_KEY_LENGTH], CoreError> {
    key.try_into().map_err(|_| CoreError::InvalidKeyLength {
        expected: STREAM_KEY_LENGTH,
        actual: key.len(),
    })
}

fn check_nonce(nonce: &[u8]) -> Result<[u8; NONCE_LENGTH], CoreError> {
    nonce.try_into().map_err(|_| CoreError::InvalidKeyLength {
        expected: NONCE_LENGTH,
        actual: nonce.len(),
    })
}

/// Generate a fresh random nonce.
pub(crate) fn generate_nonce() -> [u8; NONCE_LENGTH] {
    let mut nonce = [0u8; NONCE_LENGTH];
    OsRng.fill_bytes(&mut nonce);
    nonce
}

/// Encrypt a file payload: keystream XOR plus authentication tag.
///
/// A fresh nonce is generated per call. The input is processed in
/// [`STREAM_CHUNK_SIZE`] chunks, so peak working memory beyond the output
/// buffer is bounded regardless of payload size.
///
/// # Errors
/// Returns `CoreError::InvalidKeyLength` unless both keys are exactly
/// 32 bytes.
pub fn encrypt_file(data: &[u8], key: &[u8], mac_key: &[u8]) -> Result<SealedFile, CoreError> {
    let key = check_stream_key(key)?;
    let mac_key: [u8; MAC_KEY_LENGTH] =
        mac_key.try_into().map_err(|_| CoreError::InvalidKeyLength {
            expected: MAC_KEY_LENGTH,
            actual: mac_key.len(),
        })?;
    let nonce = generate_nonce();

    let mut ciphertext = data.to_vec();
    let mut cursor = KeystreamCursor::new(&key, &nonce);
    for chunk in ciphertext.chunks_mut(STREAM_CHUNK_SIZE) {
        cursor.apply(chunk);
    }

    let tag = auth::tag(&mac_key, &nonce, data.len() as u64, &ciphertext);
    debug!(payload_len = data.len(), "sealed file payload");
    Ok(SealedFile {
        ciphertext,
        nonce,
        tag,
    })
}

/// Decrypt a file payload.
///
/// Two-phase: the tag is recomputed over the entire received ciphertext
/// and compared in constant time; only on success is the keystream
/// applied. No plaintext byte is ever produced from a payload that fails
/// verification.
///
/// # Errors
/// `CoreError::Authentication` on tag mismatch (terminal);
/// `CoreError::InvalidKeyLength` on malformed key, nonce, or tag lengths.
pub fn decrypt_file(
    ciphertext: &[u8],
    nonce: &[u8],
    tag: &[u8],
    key: &[u8],
    mac_key: &[u8],
) -> Result<Vec<u8>, CoreError> {
    let key = check_stream_key(key)?;
    let mac_key: [u8; MAC_KEY_LENGTH] =
        mac_key.try_into().map_err(|_| CoreError::InvalidKeyLength {
            expected: MAC_KEY_LENGTH,
            actual: mac_key.len(),
        })?;
    let nonce = check_nonce(nonce)?;
    if tag.len() != TAG_LENGTH {
        return Err(CoreError::InvalidKeyLength {
            expected: TAG_LENGTH,
            actual: tag.len(),
        });
    }

    // Phase 1: authenticate everything we received.
    if !auth::verify(&mac_key, &nonce, ciphertext.len() as u64, ciphertext, tag) {
        warn!(payload_len = ciphertext.len(), "file payload rejected: tag mismatch");
        return Err(CoreError::Authentication);
    }

    // Phase 2: the ciphertext is authentic; apply the keystream.
    let mut plaintext = ciphertext.to_vec();
    let mut cursor = KeystreamCursor::new(&key, &nonce);
    for chunk in plaintext.chunks_mut(STREAM_CHUNK_SIZE) {
        cursor.apply(chunk);
    }
    Ok(plaintext)
}

/// Decrypt a sealed file record. See [`decrypt_file`].
pub fn open_sealed_file(
    sealed: &SealedFile,
    key: &[u8],
    mac_key: &[u8],
) -> Result<Vec<u8>, CoreError> {
    decrypt_file(&sealed.ciphertext, &sealed.nonce, &sealed.tag, key, mac_key)
}
