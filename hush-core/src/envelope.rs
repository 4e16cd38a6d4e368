//! Transport payload records.
//!
//! Flat key/value envelopes with all byte fields as standard base64
//! strings. Each record carries an algorithm id so a decoder can dispatch
//! without guessing; decode helpers verify the id before touching the
//! ciphertext. Records are immutable value types: produced by an encrypt
//! call, consumed by the matching decrypt call, discarded after use.

use serde::{Deserialize, Serialize};

use crate::constants::{
    ALGORITHM_BLOCK, ALGORITHM_LAYERED, ALGORITHM_STREAM, IV_LENGTH, NONCE_LENGTH, TAG_LENGTH,
};
use crate::encoding::{from_base64, to_base64};
use crate::errors::CoreError;
use crate::stream::SealedFile;

/// Block-cipher message payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockPayload {
    /// Base64 ciphertext.
    pub ciphertext: String,
    /// Base64 initialization vector (16 bytes decoded).
    pub iv: String,
    /// Algorithm id; [`ALGORITHM_BLOCK`].
    pub algorithm: String,
}

impl BlockPayload {
    /// Decode to `(ciphertext, iv)` bytes.
    ///
    /// # Errors
    /// `CoreError::Encoding` on a mismatched algorithm id, malformed
    /// base64, or an IV that does not decode to 16 bytes.
    pub fn decode(&self) -> Result<(Vec<u8>, Vec<u8>), CoreError> {
        check_algorithm(&self.algorithm, ALGORITHM_BLOCK)?;
        let ciphertext = from_base64(&self.ciphertext)?;
        let iv = from_base64(&self.iv)?;
        if iv.len() != IV_LENGTH {
            return Err(CoreError::Encoding(format!(
                "iv decodes to {} bytes, expected {IV_LENGTH}",
                iv.len()
            )));
        }
        Ok((ciphertext, iv))
    }
}

/// Authenticated stream-cipher file payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePayload {
    /// Base64 ciphertext.
    pub ciphertext: String,
    /// Base64 nonce (12 bytes decoded).
    pub nonce: String,
    /// Base64 authentication tag (64 bytes decoded).
    pub tag: String,
    /// Algorithm id; [`ALGORITHM_STREAM`].
    pub algorithm: String,
}

impl FilePayload {
    /// Wrap a sealed file for transport.
    pub fn from_sealed(sealed: &SealedFile) -> Self {
        Self {
            ciphertext: to_base64(&sealed.ciphertext),
            nonce: to_base64(&sealed.nonce),
            tag: to_base64(&sealed.tag),
            algorithm: ALGORITHM_STREAM.to_string(),
        }
    }

    /// Decode back to a [`SealedFile`].
    ///
    /// # Errors
    /// `CoreError::Encoding` on a mismatched algorithm id, malformed
    /// base64, or nonce/tag fields of the wrong decoded length.
    pub fn to_sealed(&self) -> Result<SealedFile, CoreError> {
        check_algorithm(&self.algorithm, ALGORITHM_STREAM)?;
        let ciphertext = from_base64(&self.ciphertext)?;
        let nonce_bytes = from_base64(&self.nonce)?;
        let nonce: [u8; NONCE_LENGTH] = nonce_bytes.as_slice().try_into().map_err(|_| {
            CoreError::Encoding(format!(
                "nonce decodes to {} bytes, expected {NONCE_LENGTH}",
                nonce_bytes.len()
            ))
        })?;
        let tag_bytes = from_base64(&self.tag)?;
        let tag: [u8; TAG_LENGTH] = tag_bytes.as_slice().try_into().map_err(|_| {
            CoreError::Encoding(format!(
                "tag decodes to {} bytes, expected {TAG_LENGTH}",
                tag_bytes.len()
            ))
        })?;
        Ok(SealedFile {
            ciphertext,
            nonce,
            tag,
        })
    }
}

/// Layered-pipeline message payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayeredPayload {
    /// Base64 ciphertext of the block-cipher layer.
    pub ciphertext: String,
    /// Base64 initialization vector (16 bytes decoded).
    pub iv: String,
    /// Number of composed layers; always 3.
    pub layers: u8,
    /// Algorithm id; [`ALGORITHM_LAYERED`].
    pub algorithm: String,
}

impl LayeredPayload {
    /// Decode to `(ciphertext, iv)` bytes, checking id and layer count.
    ///
    /// # Errors
    /// `CoreError::Encoding` on mismatched algorithm id or layer count,
    /// malformed base64, or a wrong-length IV.
    pub fn decode(&self) -> Result<(Vec<u8>, Vec<u8>), CoreError> {
        check_algorithm(&self.algorithm, ALGORITHM_LAYERED)?;
        if self.layers != 3 {
            return Err(CoreError::Encoding(format!(
                "unsupported layer count {}, expected 3",
                self.layers
            )));
        }
        let ciphertext = from_base64(&self.ciphertext)?;
        let iv = from_base64(&self.iv)?;
        if iv.len() != IV_LENGTH {
            return Err(CoreError::Encoding(format!(
                "iv decodes to {} bytes, expected {IV_LENGTH}",
                iv.len()
            )));
        }
        Ok((ciphertext, iv))
    }
}

fn check_algorithm(found: &str, expected: &str) -> Result<(), CoreError> {
    if found != expected {
        return Err(CoreError::Encoding(format!(
            "algorithm id {found:?} does not match {expected:?}"
        )));
    }
    Ok(())
}
