//! Entropy to mnemonic encoding, and the reverse.

use std::fmt;

use sha2::{Digest, Sha256};
use tracing::debug;

use super::wordlist::normalize_word;
use super::Wordlist;
use crate::entropy::Entropy;
use crate::error::{MnemonicError, Result};

/// Bits carried by each word.
const BITS_PER_WORD: usize = 11;

/// Word counts produced by the supported entropy sizes.
pub const VALID_WORD_COUNTS: [usize; 5] = [12, 15, 18, 21, 24];

/// A BIP-39 recovery phrase.
#[derive(Clone, PartialEq, Eq)]
pub struct Mnemonic {
    words: Vec<String>,
    indices: Vec<u16>,
}

impl Mnemonic {
    /// Encodes entropy as a phrase.
    ///
    /// The checksum is the top `bits / 32` bits of SHA-256(entropy). It is
    /// appended to the entropy bits, and the result is cut into 11-bit word
    /// indices, most significant bit first.
    pub fn from_entropy(entropy: &Entropy, wordlist: &Wordlist) -> Self {
        let checksum = checksum(entropy.as_bytes(), entropy.checksum_bits());
        let word_count = (entropy.bits() + entropy.checksum_bits()) / BITS_PER_WORD;

        let mut indices = Vec::with_capacity(word_count);
        let mut acc: u32 = 0;
        let mut acc_bits = 0;

        // At most 8 checksum bits, so the checksum fits in the last byte fed in.
        let checksum_byte = checksum << (8 - entropy.checksum_bits());
        for &byte in entropy.as_bytes().iter().chain(std::iter::once(&checksum_byte)) {
            acc = (acc << 8) | byte as u32;
            acc_bits += 8;

            while acc_bits >= BITS_PER_WORD && indices.len() < word_count {
                acc_bits -= BITS_PER_WORD;
                indices.push(((acc >> acc_bits) & 0x7ff) as u16);
            }
            acc &= (1u32 << acc_bits) - 1;
        }

        let words = indices
            .iter()
            .map(|&i| wordlist.word(i).to_string())
            .collect();

        debug!(words = word_count, entropy_bits = entropy.bits(), "mnemonic encoded");
        Self { words, indices }
    }

    /// Parses a phrase and verifies its checksum.
    ///
    /// Words may be separated by any whitespace and are matched
    /// case-insensitively.
    pub fn parse(phrase: &str, wordlist: &Wordlist) -> Result<Self> {
        let mnemonic = Self::parse_unchecked(phrase, wordlist)?;

        let embedded = mnemonic.embedded_checksum();
        let computed = mnemonic.computed_checksum();
        if embedded != computed {
            return Err(MnemonicError::Checksum { embedded, computed }.into());
        }

        Ok(mnemonic)
    }

    /// Parses a phrase without checking the checksum.
    ///
    /// Word count and dictionary membership are still enforced.
    pub fn parse_unchecked(phrase: &str, wordlist: &Wordlist) -> Result<Self> {
        let words: Vec<String> = phrase
            .split_whitespace()
            .map(normalize_word)
            .collect();

        if !VALID_WORD_COUNTS.contains(&words.len()) {
            return Err(MnemonicError::WordCount(words.len()).into());
        }

        let indices = words
            .iter()
            .enumerate()
            .map(|(position, word)| {
                wordlist.index_of(word).ok_or_else(|| MnemonicError::UnknownWord {
                    position,
                    word: word.clone(),
                })
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self { words, indices })
    }

    /// Recovers the entropy bits embedded in the phrase.
    pub fn to_entropy(&self) -> Entropy {
        let (entropy, _) = self.split_bits();
        Entropy::from_validated(entropy)
    }

    /// The checksum carried by the trailing bits of the last word.
    pub fn embedded_checksum(&self) -> u8 {
        self.split_bits().1
    }

    /// The checksum recomputed from the recovered entropy.
    pub fn computed_checksum(&self) -> u8 {
        let (entropy, _) = self.split_bits();
        checksum(&entropy, self.checksum_bits())
    }

    /// True when the embedded and recomputed checksums agree.
    pub fn checksum_matches(&self) -> bool {
        self.embedded_checksum() == self.computed_checksum()
    }

    /// Number of checksum bits in this phrase.
    pub fn checksum_bits(&self) -> usize {
        self.words.len() * BITS_PER_WORD / 33
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// The 11-bit dictionary index of each word.
    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// The phrase as a single space-separated string.
    pub fn phrase(&self) -> String {
        self.words.join(" ")
    }

    /// Splits the concatenated word bits into entropy bytes and checksum.
    fn split_bits(&self) -> (Vec<u8>, u8) {
        let entropy_bits = self.words.len() * BITS_PER_WORD - self.checksum_bits();
        let mut entropy = Vec::with_capacity(entropy_bits / 8);
        let mut acc: u32 = 0;
        let mut acc_bits = 0;

        for &index in &self.indices {
            acc = (acc << BITS_PER_WORD) | index as u32;
            acc_bits += BITS_PER_WORD;

            while acc_bits >= 8 && entropy.len() < entropy_bits / 8 {
                acc_bits -= 8;
                entropy.push((acc >> acc_bits) as u8);
            }
            acc &= (1u32 << acc_bits) - 1;
        }

        // Whatever is left after the entropy bytes is exactly the checksum.
        (entropy, acc as u8)
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.phrase())
    }
}

impl fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mnemonic({} words, redacted)", self.words.len())
    }
}

/// Top `bits` bits of SHA-256(data), right-aligned.
fn checksum(data: &[u8], bits: usize) -> u8 {
    let hash = Sha256::digest(data);
    hash[0] >> (8 - bits)
}
