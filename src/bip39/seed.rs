//! Mnemonic to seed stretching (PBKDF2-HMAC-SHA512).

use std::fmt;

use pbkdf2::pbkdf2_hmac;
use sha2::Sha512;
use tracing::debug;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use super::Mnemonic;

/// PBKDF2 iteration count for BIP-39 seed derivation.
pub const PBKDF2_ROUNDS: u32 = 2048;

/// Salt prefix prepended to the passphrase.
const SALT_PREFIX: &str = "mnemonic";

/// Seed length in bytes.
pub const SEED_LEN: usize = 64;

/// A 64-byte BIP-39 seed.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Seed([u8; SEED_LEN]);

impl Seed {
    /// Derives the seed for a mnemonic and optional passphrase.
    pub fn derive(mnemonic: &Mnemonic, passphrase: &str) -> Self {
        Self::from_phrase(&mnemonic.phrase(), passphrase)
    }

    /// Derives the seed for raw phrase text.
    ///
    /// Both the phrase and the passphrase are NFKD-normalized before use, so
    /// composed and decomposed spellings of the same text give the same seed.
    pub fn from_phrase(phrase: &str, passphrase: &str) -> Self {
        let password = Zeroizing::new(phrase.nfkd().collect::<String>());
        let salt = Zeroizing::new(SALT_PREFIX.chars().chain(passphrase.nfkd()).collect::<String>());

        let mut seed = Self([0u8; SEED_LEN]);
        pbkdf2_hmac::<Sha512>(password.as_bytes(), salt.as_bytes(), PBKDF2_ROUNDS, &mut seed.0);

        debug!(rounds = PBKDF2_ROUNDS, "seed derived");
        seed
    }

    pub fn as_bytes(&self) -> &[u8; SEED_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl AsRef<[u8]> for Seed {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed(redacted)")
    }
}
