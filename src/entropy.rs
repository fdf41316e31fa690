//! Entropy source.

use std::fmt;

use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Result, WalletError};

/// Entropy sizes accepted by BIP-39, in bits.
pub const SUPPORTED_BITS: [usize; 5] = [128, 160, 192, 224, 256];

/// Default entropy size (12-word mnemonic).
pub const DEFAULT_BITS: usize = 128;

/// Random input to the pipeline: 16, 20, 24, 28 or 32 bytes.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Entropy(Vec<u8>);

impl Entropy {
    /// Draws `bits / 8` bytes from the operating system CSPRNG.
    pub fn generate(bits: usize) -> Result<Self> {
        check_bits(bits)?;

        let mut bytes = vec![0u8; bits / 8];
        OsRng.try_fill_bytes(&mut bytes)?;
        Ok(Self(bytes))
    }

    /// Wraps caller-supplied entropy after checking its length.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let bytes = bytes.into();
        check_bits(bytes.len() * 8)?;
        Ok(Self(bytes))
    }

    /// Parses hex-encoded entropy, with or without a `0x` prefix.
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let trimmed = hex_str.trim();
        let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = hex::decode(digits)
            .map_err(|e| WalletError::InvalidParameter(format!("entropy is not valid hex: {e}")))?;
        Self::from_bytes(bytes)
    }

    /// Wraps bytes whose length the caller has already established.
    pub(crate) fn from_validated(bytes: Vec<u8>) -> Self {
        debug_assert!(SUPPORTED_BITS.contains(&(bytes.len() * 8)));
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Entropy length in bits.
    pub fn bits(&self) -> usize {
        self.0.len() * 8
    }

    /// Number of checksum bits BIP-39 appends for this entropy.
    pub fn checksum_bits(&self) -> usize {
        self.bits() / 32
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl fmt::Debug for Entropy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entropy({} bits, redacted)", self.bits())
    }
}

fn check_bits(bits: usize) -> Result<()> {
    if SUPPORTED_BITS.contains(&bits) {
        Ok(())
    } else {
        Err(WalletError::InvalidParameter(format!(
            "entropy must be one of 128, 160, 192, 224 or 256 bits, got {bits}"
        )))
    }
}
