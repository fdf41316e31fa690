//! Error types for the wallet derivation pipeline.

use thiserror::Error;

/// Errors produced by the derivation pipeline.
#[derive(Debug, Error)]
pub enum WalletError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid wordlist: {0}")]
    InvalidWordlist(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Curve arithmetic error: {0}")]
    CurveArithmetic(String),

    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(#[from] MnemonicError),

    #[error("Entropy source failure: {0}")]
    Entropy(#[from] rand::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WalletError {
    /// True when the caller should retry with fresh entropy.
    ///
    /// Only an out-of-range private key qualifies. Every other error either
    /// points at the environment or at a bug, and retrying will not help.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WalletError::InvalidPrivateKey(_))
    }

    /// True for errors the operator fixes by changing the setup
    /// (bad bit length, bad wordlist file).
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            WalletError::InvalidParameter(_) | WalletError::InvalidWordlist(_)
        )
    }
}

/// Reasons a phrase fails to decode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MnemonicError {
    #[error("invalid word count {0}, expected 12, 15, 18, 21 or 24")]
    WordCount(usize),

    #[error("word {word:?} at position {position} is not in the wordlist")]
    UnknownWord { position: usize, word: String },

    #[error("checksum mismatch (embedded {embedded:#x}, computed {computed:#x})")]
    Checksum { embedded: u8, computed: u8 },
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, WalletError>;
