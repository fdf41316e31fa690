//! Wallet assembly: entropy → mnemonic → seed → keypair → address.

use std::sync::{Arc, OnceLock};

use tracing::{debug, warn};

use crate::bip39::{Mnemonic, Seed, Wordlist};
use crate::crypto::{Address, Keypair, PrivateKey, PublicKey};
use crate::entropy::{Entropy, DEFAULT_BITS};
use crate::error::{Result, WalletError};

/// Fresh-entropy attempts before giving up on an out-of-range private key.
///
/// A rejection has probability below 2⁻¹²⁷ per attempt, so reaching this
/// limit means the entropy source is broken.
pub const MAX_KEY_ATTEMPTS: usize = 8;

/// The output of one pipeline run.
#[derive(Debug, Clone)]
pub struct Wallet {
    mnemonic: Mnemonic,
    keypair: Keypair,
}

impl Wallet {
    pub fn mnemonic(&self) -> &Mnemonic {
        &self.mnemonic
    }

    pub fn private_key(&self) -> &PrivateKey {
        self.keypair.private_key()
    }

    pub fn public_key(&self) -> &PublicKey {
        self.keypair.public_key()
    }

    pub fn address(&self) -> &Address {
        self.keypair.address()
    }

    /// Flattens the wallet into display strings.
    pub fn to_record(&self) -> WalletRecord {
        WalletRecord {
            mnemonic: self.mnemonic.phrase(),
            private_key: self.private_key().to_hex(),
            public_key: self.public_key().to_hex(),
            address: self.address().to_hex_prefixed(),
        }
    }
}

/// String form of a [`Wallet`], as handed to presentation layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletRecord {
    /// Space-separated recovery phrase.
    pub mnemonic: String,
    /// 64 hex characters, no prefix.
    pub private_key: String,
    /// 128 hex characters (`x || y`), no prefix.
    pub public_key: String,
    /// `0x` followed by 40 lowercase hex characters.
    pub address: String,
}

/// Runs the derivation pipeline against a fixed wordlist and passphrase.
///
/// Holds no per-call state. Clones share the same wordlist.
#[derive(Debug, Clone)]
pub struct WalletGenerator {
    wordlist: Arc<Wordlist>,
    passphrase: String,
}

impl WalletGenerator {
    pub fn new(wordlist: Arc<Wordlist>) -> Self {
        Self {
            wordlist,
            passphrase: String::new(),
        }
    }

    /// A generator over the bundled English wordlist.
    pub fn english() -> Result<Self> {
        Ok(Self::new(shared_english()?))
    }

    /// Sets the BIP-39 passphrase mixed into the seed salt.
    pub fn with_passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.passphrase = passphrase.into();
        self
    }

    pub fn wordlist(&self) -> &Arc<Wordlist> {
        &self.wordlist
    }

    /// Generates a wallet from fresh system entropy.
    ///
    /// If the seed yields an invalid private key, new entropy is drawn and the
    /// pipeline restarts. Other errors are returned immediately.
    pub fn generate(&self, bits: usize) -> Result<Wallet> {
        self.generate_with(bits, |entropy| self.from_entropy(entropy))
    }

    /// The retry loop of [`generate`](Self::generate), over any derivation.
    pub(crate) fn generate_with<F>(&self, bits: usize, mut derive: F) -> Result<Wallet>
    where
        F: FnMut(&Entropy) -> Result<Wallet>,
    {
        let mut last_err = None;

        for attempt in 1..=MAX_KEY_ATTEMPTS {
            let entropy = Entropy::generate(bits)?;
            debug!(bits, attempt, "entropy drawn");

            match derive(&entropy) {
                Err(e) if e.is_retryable() => {
                    warn!(attempt, error = %e, "private key rejected, regenerating entropy");
                    last_err = Some(e);
                }
                result => return result,
            }
        }

        Err(last_err.unwrap_or_else(|| {
            WalletError::InvalidPrivateKey("no attempts were made".into())
        }))
    }

    /// Derives the wallet for a given entropy value. Deterministic.
    pub fn from_entropy(&self, entropy: &Entropy) -> Result<Wallet> {
        let mnemonic = Mnemonic::from_entropy(entropy, &self.wordlist);
        self.from_mnemonic(mnemonic)
    }

    /// Re-derives a wallet from an existing phrase after checking its checksum.
    pub fn recover(&self, phrase: &str) -> Result<Wallet> {
        let mnemonic = Mnemonic::parse(phrase, &self.wordlist)?;
        self.from_mnemonic(mnemonic)
    }

    fn from_mnemonic(&self, mnemonic: Mnemonic) -> Result<Wallet> {
        let seed = Seed::derive(&mnemonic, &self.passphrase);
        let keypair = Keypair::from_seed(&seed)?;
        Ok(Wallet { mnemonic, keypair })
    }
}

/// Generates a wallet with the bundled English wordlist and no passphrase.
///
/// `bits` must be one of 128, 160, 192, 224 or 256.
pub fn generate_wallet(bits: usize) -> Result<WalletRecord> {
    WalletGenerator::english()?
        .generate(bits)
        .map(|wallet| wallet.to_record())
}

/// [`generate_wallet`] with 128 bits of entropy.
pub fn generate_default_wallet() -> Result<WalletRecord> {
    generate_wallet(DEFAULT_BITS)
}

/// The bundled English list, parsed on first use and shared afterwards.
fn shared_english() -> Result<Arc<Wordlist>> {
    static ENGLISH: OnceLock<Arc<Wordlist>> = OnceLock::new();

    if let Some(wordlist) = ENGLISH.get() {
        return Ok(wordlist.clone());
    }
    let wordlist = Arc::new(Wordlist::english()?);
    Ok(ENGLISH.get_or_init(|| wordlist).clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_entropy_regression_vector() {
        let generator = WalletGenerator::english().unwrap();
        let entropy = Entropy::from_bytes(vec![0u8; 16]).unwrap();
        let record = generator.from_entropy(&entropy).unwrap().to_record();

        assert_eq!(
            record,
            WalletRecord {
                mnemonic: "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about".into(),
                private_key: "5eb00bbddcf069084889a8ab9155568165f5c453ccb85e70811aaed6f6da5fc1".into(),
                public_key: "9058af2e7b6f0dc54d96925b80868515bf87f3158e95afce81927b3b772d5b24\
                             286b9f1688c25f1b68174e79f8ac8beb2704b6ca06217f7ef1e8cdc623b70656"
                    .into(),
                address: "0xea6e8f7525e8af0669546ac6c5b8318fd2c6d7b6".into(),
            }
        );
    }

    #[test]
    fn test_passphrase_changes_keys() {
        let generator = WalletGenerator::english().unwrap().with_passphrase("TREZOR");
        let entropy = Entropy::from_bytes(vec![0u8; 16]).unwrap();
        let record = generator.from_entropy(&entropy).unwrap().to_record();

        assert_eq!(
            record.private_key,
            "c55257c360c07c72029aebc1b53c05ed0362ada38ead3e3e9efa3708e5349553"
        );
        assert_eq!(record.address, "0xacaec9b3680ab9bfb5738967581f1d33890866cb");
    }

    #[test]
    fn test_recover_matches_generation() {
        let generator = WalletGenerator::english().unwrap();
        let wallet = generator.generate(160).unwrap();
        let recovered = generator.recover(&wallet.mnemonic().phrase()).unwrap();

        assert_eq!(recovered.to_record(), wallet.to_record());
        assert_eq!(wallet.mnemonic().word_count(), 15);
    }

    #[test]
    fn test_recover_rejects_bad_checksum() {
        let generator = WalletGenerator::english().unwrap();
        let err = generator
            .recover("zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo")
            .unwrap_err();
        assert!(matches!(err, WalletError::InvalidMnemonic(_)));
    }

    #[test]
    fn test_generate_wallet_entry_point() {
        let record = generate_default_wallet().unwrap();
        assert_eq!(record.mnemonic.split(' ').count(), 12);
        assert_eq!(record.private_key.len(), 64);
        assert_eq!(record.public_key.len(), 128);
        assert_eq!(record.address.len(), 42);

        let err = generate_wallet(100).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_rejected_key_draws_fresh_entropy() {
        let generator = WalletGenerator::english().unwrap();
        let mut seen = Vec::new();

        let wallet = generator
            .generate_with(128, |entropy| {
                seen.push(entropy.to_hex());
                if seen.len() == 1 {
                    Err(WalletError::InvalidPrivateKey("zero".into()))
                } else {
                    generator.from_entropy(entropy)
                }
            })
            .unwrap();

        assert_eq!(seen.len(), 2);
        assert_ne!(seen[0], seen[1]);
        assert_eq!(wallet.mnemonic().to_entropy().to_hex(), seen[1]);
    }

    #[test]
    fn test_retries_stop_after_max_attempts() {
        let generator = WalletGenerator::english().unwrap();
        let mut calls = 0;

        let err = generator
            .generate_with(128, |_| {
                calls += 1;
                Err(WalletError::InvalidPrivateKey("out of range".into()))
            })
            .unwrap_err();

        assert_eq!(calls, MAX_KEY_ATTEMPTS);
        assert!(matches!(err, WalletError::InvalidPrivateKey(_)));
    }

    #[test]
    fn test_other_errors_are_not_retried() {
        let generator = WalletGenerator::english().unwrap();
        let mut calls = 0;

        let err = generator
            .generate_with(128, |_| {
                calls += 1;
                Err(WalletError::CurveArithmetic("off curve".into()))
            })
            .unwrap_err();

        assert_eq!(calls, 1);
        assert!(matches!(err, WalletError::CurveArithmetic(_)));
    }

    #[test]
    fn test_shared_wordlist_reused() {
        let a = WalletGenerator::english().unwrap();
        let b = WalletGenerator::english().unwrap();
        assert!(Arc::ptr_eq(a.wordlist(), b.wordlist()));
    }
}
