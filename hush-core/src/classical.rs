//! Classical cipher stages — affine and polyalphabetic substitution.
//!
//! Both stages are pure text transforms with explicit inverses, composed
//! by [`crate::pipeline`] in front of the block cipher. They contribute
//! layering, not formal strength; the outer block cipher dominates the
//! security of the composition.
//!
//! Character classes: uppercase and lowercase letters transform within
//! their case (modulus 26), digits within `0..9` (modulus 10), and every
//! other character passes through unchanged without consuming key
//! material.

use sha2::{Digest, Sha256};

use crate::constants::{CLASSICAL_DOMAIN_TAG, VIGENERE_KEY_LENGTH};
use crate::errors::CoreError;

const LETTER_MODULUS: u32 = 26;
const DIGIT_MODULUS: u32 = 10;

/// A reversible per-character text transform. Implemented by both
/// classical stages so the pipeline can hold them as an ordered list.
pub trait TextStage {
    /// Forward transform.
    fn apply(&self, input: &str) -> String;
    /// Exact inverse of [`apply`](Self::apply).
    fn invert(&self, input: &str) -> String;
}

/// Brute-force search for the multiplicative inverse of `a` modulo `m`.
/// Returns `None` when `a` and `m` are not coprime.
fn mod_inverse(a: u32, m: u32) -> Option<u32> {
    let a = a % m;
    (1..m).find(|&x| (a * x) % m == 1)
}

/// Affine substitution: `E(x) = (a·x + b) mod 26` on letters within their
/// case. Digits take the additive part only (`(x + b) mod 10`), which
/// keeps the digit class invertible for every valid letter multiplier.
///
/// `a` must be coprime with 26; this is validated once at construction,
/// never per character.
#[derive(Debug)]
pub struct AffineCipher {
    a: u32,
    b: u32,
    a_inv: u32,
}

impl AffineCipher {
    /// Build an affine stage from multiplier `a` and offset `b`.
    ///
    /// # Errors
    /// Returns `CoreError::ModularInverse` when `a` has no inverse
    /// modulo 26 (i.e. `a` is even or divisible by 13).
    pub fn new(a: u32, b: u32) -> Result<Self, CoreError> {
        let a_inv = mod_inverse(a, LETTER_MODULUS).ok_or(CoreError::ModularInverse {
            a,
            modulus: LETTER_MODULUS,
        })?;
        Ok(Self { a, b, a_inv })
    }

    fn encrypt_char(&self, c: char) -> char {
        match c {
            'A'..='Z' => shift_letter(c, 'A', |x| (self.a * x + self.b) % LETTER_MODULUS),
            'a'..='z' => shift_letter(c, 'a', |x| (self.a * x + self.b) % LETTER_MODULUS),
            '0'..='9' => shift_digit(c, |x| (x + self.b) % DIGIT_MODULUS),
            other => other,
        }
    }

    fn decrypt_char(&self, c: char) -> char {
        let undo_letter = |y: u32| {
            let shifted = (y + LETTER_MODULUS - self.b % LETTER_MODULUS) % LETTER_MODULUS;
            (self.a_inv * shifted) % LETTER_MODULUS
        };
        match c {
            'A'..='Z' => shift_letter(c, 'A', undo_letter),
            'a'..='z' => shift_letter(c, 'a', undo_letter),
            '0'..='9' => shift_digit(c, |y| (y + DIGIT_MODULUS - self.b % DIGIT_MODULUS) % DIGIT_MODULUS),
            other => other,
        }
    }
}

impl TextStage for AffineCipher {
    fn apply(&self, input: &str) -> String {
        input.chars().map(|c| self.encrypt_char(c)).collect()
    }

    fn invert(&self, input: &str) -> String {
        input.chars().map(|c| self.decrypt_char(c)).collect()
    }
}

/// Polyalphabetic (Vigenère-style) substitution: per-character addition
/// of a repeating key letter's value, modulo 26 for letters and 10 for
/// digits. The key position advances only on transformed characters, so
/// punctuation does not desynchronize the two ends.
pub struct VigenereCipher {
    /// Key letter values, each in `0..26`.
    key: Vec<u32>,
}

impl VigenereCipher {
    /// Build from an explicit alphabetic key string.
    ///
    /// # Errors
    /// Returns `CoreError::Encoding` if the key is empty or contains
    /// non-ASCII-alphabetic characters.
    pub fn new(key: &str) -> Result<Self, CoreError> {
        if key.is_empty() {
            return Err(CoreError::Encoding("polyalphabetic key is empty".into()));
        }
        let values = key
            .chars()
            .map(|c| match c {
                'A'..='Z' => Ok(c as u32 - 'A' as u32),
                'a'..='z' => Ok(c as u32 - 'a' as u32),
                other => Err(CoreError::Encoding(format!(
                    "polyalphabetic key must be alphabetic, found {other:?}"
                ))),
            })
            .collect::<Result<Vec<u32>, CoreError>>()?;
        Ok(Self { key: values })
    }

    /// Derive the key stream deterministically from the conversation
    /// secrets: SHA-256 of `master_key ‖ chat_key ‖ domain tag`, each
    /// digest byte re-encoded to a letter.
    pub fn from_secrets(master_key: &[u8], chat_key: &str) -> Self {
        let digest = Sha256::new()
            .chain_update(master_key)
            .chain_update(chat_key.as_bytes())
            .chain_update(CLASSICAL_DOMAIN_TAG)
            .finalize();
        let key = digest
            .iter()
            .take(VIGENERE_KEY_LENGTH)
            .map(|&b| (b as u32) % LETTER_MODULUS)
            .collect();
        Self { key }
    }

    /// Key string as letters, for diagnostics and tests.
    pub fn key_string(&self) -> String {
        self.key
            .iter()
            .map(|&v| char::from(b'A' + v as u8))
            .collect()
    }

    fn transform(&self, input: &str, decrypt: bool) -> String {
        let mut position = 0usize;
        input
            .chars()
            .map(|c| {
                let k = self.key[position % self.key.len()];
                let shift_by = |modulus: u32| {
                    if decrypt {
                        (modulus - k % modulus) % modulus
                    } else {
                        k % modulus
                    }
                };
                match c {
                    'A'..='Z' => {
                        position += 1;
                        shift_letter(c, 'A', |x| (x + shift_by(LETTER_MODULUS)) % LETTER_MODULUS)
                    }
                    'a'..='z' => {
                        position += 1;
                        shift_letter(c, 'a', |x| (x + shift_by(LETTER_MODULUS)) % LETTER_MODULUS)
                    }
                    '0'..='9' => {
                        position += 1;
                        shift_digit(c, |x| (x + shift_by(DIGIT_MODULUS)) % DIGIT_MODULUS)
                    }
                    other => other,
                }
            })
            .collect()
    }
}

impl TextStage for VigenereCipher {
    fn apply(&self, input: &str) -> String {
        self.transform(input, false)
    }

    fn invert(&self, input: &str) -> String {
        self.transform(input, true)
    }
}

fn shift_letter(c: char, base: char, f: impl Fn(u32) -> u32) -> char {
    let x = c as u32 - base as u32;
    char::from_u32(base as u32 + f(x)).expect("letter arithmetic stays in ASCII")
}

fn shift_digit(c: char, f: impl Fn(u32) -> u32) -> char {
    let x = c as u32 - '0' as u32;
    char::from_u32('0' as u32 + f(x)).expect("digit arithmetic stays in ASCII")
}
