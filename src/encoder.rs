//! # Identifier digests
//!
//! Write a 64-bit digest as a fixed width suffix of unquoted SQL identifiers
//!

/// Digits and upper case letters, so suffixes read like the CTE prefixes they follow
pub const IDENTIFIER_ALPHABET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// The suffix appended to derived CTE and node names
pub const IDENTIFIER_SUFFIX: Encoder<'static> = Encoder::new(IDENTIFIER_ALPHABET, 6);

/// Fixed width positional notation over an ASCII alphabet
#[derive(Clone, Copy, Debug)]
pub struct Encoder<'a> {
    alphabet: &'a [u8],
    width: usize,
}

impl<'a> Encoder<'a> {
    pub const fn new(alphabet: &'a str, width: usize) -> Encoder<'a> {
        Encoder {
            alphabet: alphabet.as_bytes(),
            width,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Most significant digit first, digits beyond the width are dropped
    pub fn encode(&self, digest: u64) -> String {
        let base = self.alphabet.len() as u64;
        let mut digits = vec![self.alphabet[0]; self.width];
        let mut rest = digest;
        for digit in digits.iter_mut().rev() {
            *digit = self.alphabet[(rest % base) as usize];
            rest /= base;
        }
        digits.into_iter().map(char::from).collect()
    }
}
