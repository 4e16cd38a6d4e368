//! Encoding utilities — base64 and hex.
//!
//! All transport fields (ciphertext, IV, nonce, tag) travel as standard
//! base64 strings inside the envelope records. Hex is used by the
//! iterated-hash derivation strategy and by tests.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::errors::CoreError;

/// Encode bytes to standard base64 (RFC 4648, with padding).
pub fn to_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decode standard base64 to bytes.
///
/// # Errors
/// Returns `CoreError::Encoding` on invalid base64 input.
pub fn from_base64(encoded: &str) -> Result<Vec<u8>, CoreError> {
    STANDARD
        .decode(encoded)
        .map_err(|e| CoreError::Encoding(format!("invalid base64: {e}")))
}

/// Encode bytes to lowercase hex string.
pub fn to_hex(data: &[u8]) -> String {
    data.iter().map(|b| format!("{b:02x}")).collect()
}

/// Decode hex string to bytes.
///
/// # Errors
/// Returns `CoreError::Encoding` on invalid hex input.
pub fn from_hex(encoded: &str) -> Result<Vec<u8>, CoreError> {
    if encoded.len() % 2 != 0 {
        return Err(CoreError::Encoding("odd-length hex string".into()));
    }
    (0..encoded.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&encoded[i..i + 2], 16)
                .map_err(|e| CoreError::Encoding(format!("invalid hex: {e}")))
        })
        .collect()
}
