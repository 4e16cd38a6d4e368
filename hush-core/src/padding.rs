//! PKCS7 padding over 16-byte blocks.
//!
//! `pad` always appends between 1 and 16 bytes — a full padding block on
//! exact multiples — so `unpad` can always rely on the final byte.
//!
//! Two removal variants exist. `unpad` is strict and errors on
//! inconsistent padding. `unpad_lenient` returns the input unmodified when
//! validation fails; this is the message-path contract (corrupt padding
//! yields the unstripped buffer, not an error) and callers that need the
//! hard failure must use `unpad`.

use crate::constants::BLOCK_SIZE;
use crate::errors::CoreError;

/// Append PKCS7 padding, returning a buffer whose length is a non-zero
/// multiple of [`BLOCK_SIZE`].
pub fn pad(data: &[u8]) -> Vec<u8> {
    let pad_len = BLOCK_SIZE - (data.len() % BLOCK_SIZE);
    let mut padded = Vec::with_capacity(data.len() + pad_len);
    padded.extend_from_slice(data);
    padded.extend(std::iter::repeat(pad_len as u8).take(pad_len));
    padded
}

/// Validate and strip PKCS7 padding.
///
/// # Errors
/// Returns `CoreError::Padding` if the buffer is empty, the final byte is
/// not in `1..=16`, or the trailing `n` bytes are not all equal to `n`.
pub fn unpad(data: &[u8]) -> Result<Vec<u8>, CoreError> {
    match padding_length(data) {
        Some(n) => Ok(data[..data.len() - n].to_vec()),
        None => Err(CoreError::Padding),
    }
}

/// Strip PKCS7 padding if it validates; otherwise return the input
/// unmodified. See the module docs for when this variant applies.
pub fn unpad_lenient(data: &[u8]) -> Vec<u8> {
    match padding_length(data) {
        Some(n) => data[..data.len() - n].to_vec(),
        None => data.to_vec(),
    }
}

/// Padding length if the trailing bytes form valid PKCS7 padding.
fn padding_length(data: &[u8]) -> Option<usize> {
    let &last = data.last()?;
    let n = last as usize;
    if n == 0 || n > BLOCK_SIZE || n > data.len() {
        return None;
    }
    if data[data.len() - n..].iter().all(|&b| b == last) {
        Some(n)
    } else {
        None
    }
}
