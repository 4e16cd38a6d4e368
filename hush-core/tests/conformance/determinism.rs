//! Conformance: key-derivation determinism.
//!
//! Invariants under test:
//! - identical `(secret, context)` inputs MUST yield byte-identical keys,
//!   with no hidden entropy source in any strategy
//! - sub-keys MUST be independent of each other
//! - distinct contexts MUST yield distinct keys (domain separation)

use hush_core::derive_keys;

#[test]
fn conformance_kdf_deterministic_100_rounds() {
    let reference = derive_keys(b"conformance secret", "chat:determinism").unwrap();

    for round in 1..=100 {
        let keys = derive_keys(b"conformance secret", "chat:determinism").unwrap();
        assert_eq!(
            keys.cipher_key, reference.cipher_key,
            "cipher key drift at round {round}"
        );
        assert_eq!(
            keys.auth_key, reference.auth_key,
            "auth key drift at round {round}"
        );
    }
}

#[test]
fn conformance_kdf_sub_key_independence() {
    let keys = derive_keys(b"conformance secret", "chat:determinism").unwrap();
    assert_ne!(keys.cipher_key, keys.auth_key);
    assert_ne!(keys.cipher_key, [0u8; 32]);
    assert_ne!(keys.auth_key, [0u8; 32]);
}

#[test]
fn conformance_kdf_context_separation() {
    use std::collections::HashSet;

    let mut seen = HashSet::new();
    for context in ["chat:1", "chat:2", "chat:3", "file:1", "file:2", ""] {
        let keys = derive_keys(b"same base secret", context).unwrap();
        assert!(
            seen.insert(keys.cipher_key),
            "cipher key collision for context {context:?}"
        );
    }
}

#[test]
fn conformance_kdf_secret_separation() {
    let a = derive_keys(b"secret a", "chat:1").unwrap();
    let b = derive_keys(b"secret b", "chat:1").unwrap();
    assert_ne!(a.cipher_key, b.cipher_key);
    assert_ne!(a.auth_key, b.auth_key);
}
