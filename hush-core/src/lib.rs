//! Hush Core — canonical codec engine for the Hush messenger.
//!
//! This crate is the source of truth for the symmetric constructions and
//! transport envelope formats that protect chat payloads and file
//! transfers. The mobile app and backend glue consume it as a library;
//! everything here is synchronous, allocation-bounded, and free of I/O.
//!
//! # Module Map
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`constants`] | lengths, round counts, algorithm ids, domain tags |
//! | [`errors`] | unified [`CoreError`](errors::CoreError) taxonomy |
//! | [`encoding`] | base64 and hex transport helpers |
//! | [`sbox`] | seeded substitution tables (process-lifetime, read-only) |
//! | [`padding`] | PKCS7 pad/unpad, strict and lenient |
//! | [`block`] | Feistel block cipher under CBC — message path |
//! | [`stream`] | ARX keystream cipher — file path |
//! | [`auth`] | keyed-hash tags, constant-time verification |
//! | [`kdf`] | fallback-chained key derivation |
//! | [`classical`] | affine and polyalphabetic text stages |
//! | [`pipeline`] | layered composition of classical stages + block cipher |
//! | [`envelope`] | serde transport records with base64 fields |
//!
//! # Paths
//!
//! Messages travel `plaintext → classical pipeline → block cipher`
//! ([`pipeline::layered_encrypt`]) or directly through the block cipher
//! ([`block::encrypt`]). Files travel `plaintext → keystream XOR → tag`
//! ([`stream::encrypt_file`]); decryption verifies the tag over the whole
//! ciphertext before releasing a single plaintext byte. Both paths take
//! their keys from [`kdf::derive_keys`].

/// Protocol constants — wire-contract values.
pub mod constants;

/// Error types for hush-core operations.
pub mod errors;

/// Encoding utilities — base64 and hex.
pub mod encoding;

/// Seeded substitution tables for the block cipher.
pub mod sbox;

/// PKCS7 padding.
pub mod padding;

/// Block cipher engine (Feistel + CBC) — message path.
pub mod block;

/// Stream cipher engine (ARX keystream) — file path.
pub mod stream;

/// Authentication tags and constant-time comparison.
pub mod auth;

/// Key derivation with ordered fallback strategies.
pub mod kdf;

/// Classical cipher stages — affine and polyalphabetic.
pub mod classical;

/// Layered classical pipeline.
pub mod pipeline;

/// Transport payload records.
pub mod envelope;

pub use envelope::{BlockPayload, FilePayload, LayeredPayload};
pub use errors::CoreError;
pub use kdf::{derive_keys, SessionKeys};
pub use stream::SealedFile;
