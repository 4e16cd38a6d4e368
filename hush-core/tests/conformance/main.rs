//! Conformance harness — core codec invariant tests.
//!
//! Enforces the MUST-level invariants of the codec engine end to end,
//! through the public API only:
//!
//! - Round-trip correctness at boundary lengths, both paths
//! - Tamper detection on the authenticated file path (bit-exact)
//! - IV/nonce freshness (no ciphertext repetition across calls)
//! - Key-derivation determinism and sub-key independence
//! - The message-pipeline and file scenarios, with pinned values

mod determinism;
mod roundtrip;
mod scenarios;
mod tamper;
