//! BIP-39 wordlist loading.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use unicode_normalization::UnicodeNormalization;

use crate::error::{Result, WalletError};

/// Number of words a BIP-39 wordlist must contain (one per 11-bit index).
pub const WORDLIST_SIZE: usize = 2048;

const ENGLISH: &str = include_str!("../../wordlist/english.txt");

/// An immutable, validated 2048-word dictionary.
///
/// Load it once at startup and share it (e.g. behind an `Arc`) with every
/// encoder; nothing mutates it afterwards.
#[derive(Debug, Clone)]
pub struct Wordlist {
    words: Vec<String>,
    index: HashMap<String, u16>,
}

impl Wordlist {
    /// The canonical English list bundled with the crate.
    pub fn english() -> Result<Self> {
        Self::from_text(ENGLISH)
    }

    /// Reads a newline-delimited wordlist from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            WalletError::InvalidWordlist(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_text(&text)
    }

    /// Parses a newline-delimited wordlist.
    ///
    /// Blank lines at either end are ignored; anything else must be exactly
    /// 2048 distinct, non-empty words.
    pub fn from_text(text: &str) -> Result<Self> {
        let words: Vec<String> = text
            .trim()
            .lines()
            .map(|line| line.trim().to_string())
            .collect();

        Self::from_words(words)
    }

    /// Builds a wordlist from an ordered sequence of words.
    pub fn from_words(words: Vec<String>) -> Result<Self> {
        if words.len() != WORDLIST_SIZE {
            return Err(WalletError::InvalidWordlist(format!(
                "expected {} words, found {}",
                WORDLIST_SIZE,
                words.len()
            )));
        }

        let mut index = HashMap::with_capacity(WORDLIST_SIZE);
        for (i, word) in words.iter().enumerate() {
            if word.is_empty() {
                return Err(WalletError::InvalidWordlist(format!(
                    "empty entry at line {}",
                    i + 1
                )));
            }
            if word.chars().any(char::is_whitespace) {
                return Err(WalletError::InvalidWordlist(format!(
                    "word {:?} at line {} contains whitespace",
                    word,
                    i + 1
                )));
            }
            if *word != normalize_word(word) {
                return Err(WalletError::InvalidWordlist(format!(
                    "word {:?} at line {} is not lowercase NFKD",
                    word,
                    i + 1
                )));
            }
            if index.insert(word.clone(), i as u16).is_some() {
                return Err(WalletError::InvalidWordlist(format!(
                    "duplicate word {:?} at line {}",
                    word,
                    i + 1
                )));
            }
        }

        Ok(Self { words, index })
    }

    /// Returns the word for an 11-bit index.
    ///
    /// # Panics
    /// Panics if `index >= 2048`.
    #[inline]
    pub fn word(&self, index: u16) -> &str {
        &self.words[index as usize]
    }

    /// Looks up the index of a word.
    #[inline]
    pub fn index_of(&self, word: &str) -> Option<u16> {
        self.index.get(word).copied()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}

/// Canonical lookup form of a word: NFKD, then lowercase.
///
/// Every stored entry is already in this form, so phrases typed in any case
/// or composition map back to the same index.
pub(crate) fn normalize_word(word: &str) -> String {
    word.nfkd().collect::<String>().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("w{i}")).collect()
    }

    #[test]
    fn test_english_wordlist() {
        let wordlist = Wordlist::english().unwrap();
        assert_eq!(wordlist.len(), 2048);
        assert_eq!(wordlist.word(0), "abandon");
        assert_eq!(wordlist.word(3), "about");
        assert_eq!(wordlist.word(2047), "zoo");
        assert_eq!(wordlist.index_of("zoo"), Some(2047));
        assert_eq!(wordlist.index_of("notaword"), None);
    }

    #[test]
    fn test_wrong_count_rejected() {
        let err = Wordlist::from_words(numbered(2047)).unwrap_err();
        assert!(matches!(err, WalletError::InvalidWordlist(_)));
        assert!(Wordlist::from_words(numbered(2049)).is_err());
        assert!(Wordlist::from_text("").is_err());
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut words = numbered(2048);
        words[100] = "w5".into();
        let err = Wordlist::from_words(words).unwrap_err();
        assert!(err.to_string().contains("duplicate word"));
    }

    #[test]
    fn test_uppercase_entry_rejected() {
        let words: Vec<String> = (0..2048).map(|i| format!("W{i}")).collect();
        let err = Wordlist::from_words(words).unwrap_err();
        assert!(matches!(err, WalletError::InvalidWordlist(_)));
        assert!(err.to_string().contains("not lowercase NFKD"));
    }

    #[test]
    fn test_composed_entry_rejected() {
        let mut words = numbered(2048);
        words[7] = "caf\u{e9}".into();
        assert!(Wordlist::from_words(words.clone()).is_err());

        words[7] = "cafe\u{301}".into();
        let wordlist = Wordlist::from_words(words).unwrap();
        assert_eq!(wordlist.index_of(&normalize_word("caf\u{e9}")), Some(7));
    }

    #[test]
    fn test_whitespace_entry_rejected() {
        let mut words = numbered(2048);
        words[0] = "two words".into();
        let err = Wordlist::from_words(words).unwrap_err();
        assert!(err.to_string().contains("contains whitespace"));

        let mut words = numbered(2048);
        words[5] = "tab\tword".into();
        assert!(Wordlist::from_words(words).is_err());
    }

    #[test]
    fn test_crlf_and_padding() {
        let text = format!("\n{}\r\n\n", numbered(2048).join("\r\n"));
        let wordlist = Wordlist::from_text(&text).unwrap();
        assert_eq!(wordlist.word(2047), "w2047");
    }

    #[test]
    fn test_missing_file() {
        let err = Wordlist::from_file("/nonexistent/english.txt").unwrap_err();
        assert!(err.is_configuration());
    }
}
