//! Error types for hush-core.
//!
//! A single enum covers the whole codec surface. Severity differs by
//! variant: `Authentication` is terminal (no plaintext is released),
//! `Padding` is raised only by the strict unpad API — the message path
//! deliberately returns the unstripped buffer instead (see
//! [`crate::padding::unpad_lenient`]), and `ModularInverse` is a
//! configuration error surfaced at construction time, never per character.

/// Unified error type for all hush-core operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Key, IV, or nonce length does not match the construction's fixed
    /// requirement. Rejected before any transform runs.
    #[error("Invalid key material length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength {
        /// Required length in bytes.
        expected: usize,
        /// Length that was supplied.
        actual: usize,
    },

    /// Authentication tag mismatch on the stream-cipher path. The message
    /// never includes expected or received tag bytes.
    #[error("Authentication failed: tag mismatch")]
    Authentication,

    /// PKCS7 padding bytes inconsistent (strict unpad only).
    #[error("Padding validation failed")]
    Padding,

    /// Affine multiplier has no inverse modulo the letter alphabet.
    #[error("No modular inverse for multiplier {a} modulo {modulus}")]
    ModularInverse {
        /// The offending multiplier.
        a: u32,
        /// The modulus it must be coprime with.
        modulus: u32,
    },

    /// Malformed transport input (base64, hex, envelope shape).
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// All key-derivation strategies failed. Not expected in normal
    /// operation; callers may treat derivation as infallible.
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),
}
