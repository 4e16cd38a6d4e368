//! Block cipher engine — Feistel network under CBC chaining.
//!
//! ## Construction
//! ```text
//! block     = L (8 bytes) ‖ R (8 bytes)
//! round i   : R' = F(R, rk_i) ^ L;  (L, R) = (R, R')      for i in 0..18
//! output    = R_final ‖ L_final                            (final swap)
//! F(h, rk)  = each byte of (h ^ rk) through the four
//!             substitution tables in sequence
//! rk_i[j]   = key[(8·i + j) mod 32] ^ i
//! ```
//! Decryption undoes the final swap and walks the rounds in reverse; the
//! F-function is never inverted, so the substitution tables need no
//! inverse.
//!
//! CBC chains blocks through a fresh random IV per encryption call.
//! Plaintext is PKCS7-padded before chaining; decryption strips padding
//! leniently — corrupt padding yields the unstripped buffer, not an error
//! (see [`crate::padding`]).

use rand::rngs::OsRng;
use rand::RngCore;
use tracing::debug;

use crate::constants::{
    ALGORITHM_BLOCK, BLOCK_KEY_LENGTH, BLOCK_SIZE, FEISTEL_ROUNDS, HALF_BLOCK_SIZE, IV_LENGTH,
};
use crate::encoding::to_base64;
use crate::envelope::BlockPayload;
use crate::errors::CoreError;
use crate::padding;
use crate::sbox::{self, TABLES};

/// Round key schedule: 18 keys of 8 bytes each.
type RoundKeys = [[u8; HALF_BLOCK_SIZE]; FEISTEL_ROUNDS];

/// Derive the per-round keys from the 32-byte master key. Every key byte
/// rotates through the schedule; the XOR with the round index separates
/// rounds that would otherwise reuse the same window.
fn round_keys(key: &[u8; BLOCK_KEY_LENGTH]) -> RoundKeys {
    let mut keys = [[0u8; HALF_BLOCK_SIZE]; FEISTEL_ROUNDS];
    for (i, rk) in keys.iter_mut().enumerate() {
        for (j, byte) in rk.iter_mut().enumerate() {
            *byte = key[(HALF_BLOCK_SIZE * i + j) % BLOCK_KEY_LENGTH] ^ i as u8;
        }
    }
    keys
}

/// Feistel round function: XOR with the round key, then four chained
/// table substitutions per byte.
fn feistel_mix(half: [u8; HALF_BLOCK_SIZE], rk: &[u8; HALF_BLOCK_SIZE]) -> [u8; HALF_BLOCK_SIZE] {
    let mut out = half;
    for (byte, &k) in out.iter_mut().zip(rk.iter()) {
        let mut b = *byte ^ k;
        for table in TABLES.iter() {
            b = sbox::substitute(table, b);
        }
        *byte = b;
    }
    out
}

fn xor_halves(a: [u8; HALF_BLOCK_SIZE], b: [u8; HALF_BLOCK_SIZE]) -> [u8; HALF_BLOCK_SIZE] {
    let mut out = [0u8; HALF_BLOCK_SIZE];
    for i in 0..HALF_BLOCK_SIZE {
        out[i] = a[i] ^ b[i];
    }
    out
}

fn split_block(block: &[u8; BLOCK_SIZE]) -> ([u8; HALF_BLOCK_SIZE], [u8; HALF_BLOCK_SIZE]) {
    let mut l = [0u8; HALF_BLOCK_SIZE];
    let mut r = [0u8; HALF_BLOCK_SIZE];
    l.copy_from_slice(&block[..HALF_BLOCK_SIZE]);
    r.copy_from_slice(&block[HALF_BLOCK_SIZE..]);
    (l, r)
}

fn join_block(a: [u8; HALF_BLOCK_SIZE], b: [u8; HALF_BLOCK_SIZE]) -> [u8; BLOCK_SIZE] {
    let mut block = [0u8; BLOCK_SIZE];
    block[..HALF_BLOCK_SIZE].copy_from_slice(&a);
    block[HALF_BLOCK_SIZE..].copy_from_slice(&b);
    block
}

/// Encrypt a single 16-byte block.
fn encrypt_block(block: &[u8; BLOCK_SIZE], keys: &RoundKeys) -> [u8; BLOCK_SIZE] {
    let (mut l, mut r) = split_block(block);
    for rk in keys.iter() {
        let mixed = xor_halves(feistel_mix(r, rk), l);
        l = r;
        r = mixed;
    }
    // Standard Feistel output convention: halves swapped.
    join_block(r, l)
}

/// Decrypt a single 16-byte block: undo the final swap, then run the
/// rounds in reverse order.
fn decrypt_block(block: &[u8; BLOCK_SIZE], keys: &RoundKeys) -> [u8; BLOCK_SIZE] {
    let (r_final, l_final) = split_block(block);
    let (mut l, mut r) = (l_final, r_final);
    for rk in keys.iter().rev() {
        let mixed = xor_halves(r, feistel_mix(l, rk));
        r = l;
        l = mixed;
    }
    join_block(l, r)
}

fn xor_block(block: &mut [u8; BLOCK_SIZE], other: &[u8; BLOCK_SIZE]) {
    for (b, o) in block.iter_mut().zip(other.iter()) {
        *b ^= o;
    }
}

/// CBC-encrypt already padded data. `padded.len()` must be a multiple of
/// [`BLOCK_SIZE`].
fn encrypt_cbc(padded: &[u8], key: &[u8; BLOCK_KEY_LENGTH], iv: &[u8; IV_LENGTH]) -> Vec<u8> {
    let keys = round_keys(key);
    let mut out = Vec::with_capacity(padded.len());
    let mut chain = *iv;
    for chunk in padded.chunks_exact(BLOCK_SIZE) {
        let mut block = [0u8; BLOCK_SIZE];
        block.copy_from_slice(chunk);
        xor_block(&mut block, &chain);
        chain = encrypt_block(&block, &keys);
        out.extend_from_slice(&chain);
    }
    out
}

/// CBC-decrypt without removing padding. The chain value for block `i` is
/// the *ciphertext* block `i - 1`, never the recovered plaintext.
fn decrypt_cbc(ciphertext: &[u8], key: &[u8; BLOCK_KEY_LENGTH], iv: &[u8; IV_LENGTH]) -> Vec<u8> {
    let keys = round_keys(key);
    let mut out = Vec::with_capacity(ciphertext.len());
    let mut chain = *iv;
    for chunk in ciphertext.chunks_exact(BLOCK_SIZE) {
        let mut block = [0u8; BLOCK_SIZE];
        block.copy_from_slice(chunk);
        let mut plain = decrypt_block(&block, &keys);
        xor_block(&mut plain, &chain);
        chain = block;
        out.extend_from_slice(&plain);
    }
    out
}

fn check_key(key: &[u8]) -> Result<[u8; BLOCK_KEY_LENGTH], CoreError> {
    key.try_into().map_err(|_| CoreError::InvalidKeyLength {
        expected: BLOCK_KEY_LENGTH,
        actual: key.len(),
    })
}

fn check_iv(iv: &[u8]) -> Result<[u8; IV_LENGTH], CoreError> {
    iv.try_into().map_err(|_| CoreError::InvalidKeyLength {
        expected: IV_LENGTH,
        actual: iv.len(),
    })
}

/// Pad and CBC-encrypt with the given IV, returning raw ciphertext bytes.
/// Shared with the layered pipeline, which supplies its own envelope.
pub(crate) fn seal_bytes(
    plaintext: &[u8],
    key: &[u8; BLOCK_KEY_LENGTH],
    iv: &[u8; IV_LENGTH],
) -> Vec<u8> {
    encrypt_cbc(&padding::pad(plaintext), key, iv)
}

/// CBC-decrypt raw ciphertext bytes and strip padding leniently.
///
/// # Errors
/// Returns `CoreError::Encoding` if the ciphertext length is not a
/// multiple of the block size.
pub(crate) fn open_bytes(
    ciphertext: &[u8],
    key: &[u8; BLOCK_KEY_LENGTH],
    iv: &[u8; IV_LENGTH],
) -> Result<Vec<u8>, CoreError> {
    if ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(CoreError::Encoding(format!(
            "ciphertext length {} is not a multiple of the {BLOCK_SIZE}-byte block size",
            ciphertext.len()
        )));
    }
    Ok(padding::unpad_lenient(&decrypt_cbc(ciphertext, key, iv)))
}

/// Generate a fresh random IV.
pub(crate) fn generate_iv() -> [u8; IV_LENGTH] {
    let mut iv = [0u8; IV_LENGTH];
    OsRng.fill_bytes(&mut iv);
    iv
}

/// Encrypt a chat message under the block cipher.
///
/// Pads with PKCS7, chains under CBC with a fresh random IV, and wraps
/// the result in a base64 transport record.
///
/// # Errors
/// Returns `CoreError::InvalidKeyLength` unless `key` is exactly 32 bytes.
pub fn encrypt(plaintext: &[u8], key: &[u8]) -> Result<BlockPayload, CoreError> {
    let key = check_key(key)?;
    let iv = generate_iv();
    let ciphertext = seal_bytes(plaintext, &key, &iv);
    debug!(plaintext_len = plaintext.len(), "sealed block payload");
    Ok(BlockPayload {
        ciphertext: to_base64(&ciphertext),
        iv: to_base64(&iv),
        algorithm: ALGORITHM_BLOCK.to_string(),
    })
}

/// Decrypt a chat message from raw ciphertext bytes.
///
/// Padding is stripped leniently: if the recovered padding bytes are
/// inconsistent the unstripped buffer is returned rather than an error.
///
/// # Errors
/// Returns `CoreError::InvalidKeyLength` unless `key` is exactly 32 bytes
/// and `iv` exactly 16; `CoreError::Encoding` if the ciphertext length is
/// not a block multiple.
pub fn decrypt(ciphertext: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>, CoreError> {
    let key = check_key(key)?;
    let iv = check_iv(iv)?;
    open_bytes(ciphertext, &key, &iv)
}

/// Decrypt a [`BlockPayload`] transport record.
///
/// # Errors
/// As [`decrypt`], plus `CoreError::Encoding` on malformed base64 or a
/// mismatched algorithm id.
pub fn decrypt_payload(payload: &BlockPayload, key: &[u8]) -> Result<Vec<u8>, CoreError> {
    let (ciphertext, iv) = payload.decode()?;
    decrypt(&ciphertext, key, &iv)
}
