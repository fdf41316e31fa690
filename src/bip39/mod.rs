//! BIP-39 mnemonic encoding and seed derivation.
//!
//! - `wordlist`: the 2048-word dictionary, loaded once and shared read-only
//! - `mnemonic`: entropy + checksum to words, and words back to entropy
//! - `seed`: PBKDF2-HMAC-SHA512 stretching of the phrase

mod mnemonic;
mod seed;
mod wordlist;

pub use mnemonic::{Mnemonic, VALID_WORD_COUNTS};
pub use seed::{Seed, PBKDF2_ROUNDS, SEED_LEN};
pub use wordlist::{Wordlist, WORDLIST_SIZE};
