//! Seeded substitution tables for the Feistel round function.
//!
//! Four independent 16×16 byte tables, each generated deterministically
//! from one fixed seed in [`crate::constants::SBOX_SEEDS`]. They are built
//! once per process and shared read-only by every block-cipher operation;
//! they are not tied to any key.
//!
//! A lookup maps a byte through `table[high_nibble][low_nibble]`. The
//! tables sit inside the Feistel F-function and are never inverted, so
//! they are not required to be bijective.

use once_cell::sync::Lazy;

use crate::constants::SBOX_SEEDS;

/// One substitution table: 256 entries addressed by nibble pair.
pub type SubstitutionTable = [[u8; 16]; 16];

/// The four process-lifetime tables, in application order.
pub static TABLES: Lazy<[SubstitutionTable; 4]> = Lazy::new(|| {
    [
        generate_table(SBOX_SEEDS[0]),
        generate_table(SBOX_SEEDS[1]),
        generate_table(SBOX_SEEDS[2]),
        generate_table(SBOX_SEEDS[3]),
    ]
});

/// SplitMix64 step. Full 64-bit avalanche per output, so consecutive
/// table entries carry no visible seed structure.
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Generate one 16×16 table from a seed.
fn generate_table(seed: u64) -> SubstitutionTable {
    let mut state = seed;
    let mut table = [[0u8; 16]; 16];
    for row in table.iter_mut() {
        for entry in row.iter_mut() {
            *entry = splitmix64(&mut state) as u8;
        }
    }
    table
}

/// Substitute one byte through a table by its nibble pair.
#[inline(always)]
pub fn substitute(table: &SubstitutionTable, byte: u8) -> u8 {
    table[(byte >> 4) as usize][(byte & 0x0f) as usize]
}
