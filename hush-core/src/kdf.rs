//! Key derivation — fallback-chained strategies over a secure hash.
//!
//! `derive_keys` turns `(base_secret, context)` into a 32-byte cipher key
//! and a 32-byte authentication key. Three strategies run in fixed
//! priority order; the first success wins and the last error surfaces
//! only if every strategy fails. All three are deterministic, so the two
//! ends of a conversation derive byte-identical keys from the same
//! inputs.
//!
//! With the bundled hash backend the strategies cannot fail at runtime;
//! the chain models the contract that the hash is a swappable service,
//! and callers may treat derivation as infallible.

use sha2::{Digest, Sha256, Sha512};
use tracing::warn;

use crate::constants::{
    KDF_AUTH_TAG, KDF_CIPHER_TAG, KDF_DOMAIN_TAG, KDF_ITERATIONS, MAC_KEY_LENGTH,
    STREAM_KEY_LENGTH,
};
use crate::encoding::to_hex;
use crate::errors::CoreError;

/// Derived sub-keys for one session: cipher key for the confidentiality
/// path, auth key for the tag path. Never persisted; recomputed per
/// session. Zeroized on drop via volatile writes.
#[derive(Clone)]
pub struct SessionKeys {
    /// Stream/block cipher key (32 bytes).
    pub cipher_key: [u8; STREAM_KEY_LENGTH],
    /// Keyed-hash authentication key (32 bytes).
    pub auth_key: [u8; MAC_KEY_LENGTH],
}

impl Drop for SessionKeys {
    fn drop(&mut self) {
        // Volatile writes prevent the compiler from optimizing away the
        // zeroization.
        for byte in self.cipher_key.iter_mut().chain(self.auth_key.iter_mut()) {
            unsafe { std::ptr::write_volatile(byte as *mut u8, 0u8) };
        }
        std::sync::atomic::compiler_fence(std::sync::atomic::Ordering::SeqCst);
    }
}

type Strategy = fn(&[u8]) -> Result<SessionKeys, CoreError>;

/// Derivation strategies in priority order.
const STRATEGIES: [(&str, Strategy); 3] = [
    ("digest-split", strategy_digest_split),
    ("iterated-hex", strategy_iterated_hex),
    ("two-hash", strategy_two_hash),
];

/// Derive the session sub-keys for `(base_secret, context)`.
///
/// The input material is `base_secret ‖ "::" ‖ context ‖ "::" ‖ domain
/// tag`, so distinct contexts (chats, file channels) yield independent
/// keys from the same base secret.
///
/// # Errors
/// Only if every strategy fails — not expected in normal operation.
pub fn derive_keys(base_secret: &[u8], context: &str) -> Result<SessionKeys, CoreError> {
    let mut material = Vec::with_capacity(base_secret.len() + context.len() + 16);
    material.extend_from_slice(base_secret);
    material.extend_from_slice(b"::");
    material.extend_from_slice(context.as_bytes());
    material.extend_from_slice(b"::");
    material.extend_from_slice(KDF_DOMAIN_TAG);

    let mut last_err = None;
    for (name, strategy) in STRATEGIES {
        match strategy(&material) {
            Ok(keys) => return Ok(keys),
            Err(err) => {
                warn!(strategy = name, %err, "derivation strategy failed, falling through");
                last_err = Some(err);
            }
        }
    }
    Err(last_err
        .unwrap_or_else(|| CoreError::KeyDerivation("no derivation strategies".into())))
}

/// Split a 64-byte digest into the two sub-keys.
fn split_digest(digest: &[u8]) -> SessionKeys {
    let mut cipher_key = [0u8; STREAM_KEY_LENGTH];
    let mut auth_key = [0u8; MAC_KEY_LENGTH];
    cipher_key.copy_from_slice(&digest[..STREAM_KEY_LENGTH]);
    auth_key.copy_from_slice(&digest[STREAM_KEY_LENGTH..STREAM_KEY_LENGTH + MAC_KEY_LENGTH]);
    SessionKeys {
        cipher_key,
        auth_key,
    }
}

/// Strategy 1: single SHA-512 pass, digest split 32/32.
fn strategy_digest_split(material: &[u8]) -> Result<SessionKeys, CoreError> {
    let digest = Sha512::digest(material);
    Ok(split_digest(&digest))
}

/// Strategy 2: 100-round iterated SHA-256 with intermediate hex
/// re-encoding, final state expanded through SHA-512.
fn strategy_iterated_hex(material: &[u8]) -> Result<SessionKeys, CoreError> {
    let mut state = material.to_vec();
    for round in 0..KDF_ITERATIONS {
        let mut hasher = Sha256::new();
        hasher.update(&state);
        hasher.update([round as u8]);
        state = to_hex(&hasher.finalize()).into_bytes();
    }
    let digest = Sha512::digest(&state);
    Ok(split_digest(&digest))
}

/// Strategy 3: minimal two-hash split with independent domain tags.
fn strategy_two_hash(material: &[u8]) -> Result<SessionKeys, CoreError> {
    let cipher_digest = Sha256::new()
        .chain_update(material)
        .chain_update(KDF_CIPHER_TAG)
        .finalize();
    let auth_digest = Sha256::new()
        .chain_update(material)
        .chain_update(KDF_AUTH_TAG)
        .finalize();
    Ok(SessionKeys {
        cipher_key: cipher_digest.into(),
        auth_key: auth_digest.into(),
    })
}
