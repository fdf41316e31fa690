//! Runtime configuration for the wallet generator.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::entropy::{DEFAULT_BITS, SUPPORTED_BITS};

/// Ethereum Wallet Generator (BIP-39 mnemonic → secp256k1 key → address)
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Entropy size in bits: 128, 160, 192, 224 or 256
    #[arg(short, long, default_value_t = DEFAULT_BITS)]
    pub bits: usize,

    /// Number of wallets to generate
    #[arg(short = 'n', long, default_value = "1")]
    pub count: u64,

    /// Number of worker threads (default: number of CPU cores)
    #[arg(short = 'w', long)]
    pub workers: Option<usize>,

    /// BIP-39 passphrase mixed into the seed
    #[arg(long, default_value = "")]
    pub passphrase: String,

    /// Newline-delimited wordlist of 2048 words (default: bundled English)
    #[arg(long, value_name = "PATH")]
    pub wordlist: Option<PathBuf>,

    /// Derive a single wallet from this entropy instead of fresh randomness
    #[arg(long, value_name = "HEX", conflicts_with = "mnemonic")]
    pub entropy: Option<String>,

    /// Recover a wallet from an existing mnemonic phrase
    #[arg(long, value_name = "PHRASE")]
    pub mnemonic: Option<String>,

    /// Also print the EIP-55 mixed-case address
    #[arg(long, default_value = "false")]
    pub checksum: bool,

    /// Progress report interval in seconds
    #[arg(short = 'r', long, default_value = "5")]
    pub report_interval: u64,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Config {
    /// Returns the number of workers, defaulting to CPU count
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get)
    }

    /// True when a single wallet is derived from caller input.
    pub fn is_deterministic(&self) -> bool {
        self.entropy.is_some() || self.mnemonic.is_some()
    }

    /// Default log filter when `RUST_LOG` is unset.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.entropy.is_some() && self.mnemonic.is_some() {
            return Err(ConfigError::Conflict(
                "--entropy and --mnemonic cannot be used together".into(),
            ));
        }

        if self.is_deterministic() {
            if self.count != 1 {
                return Err(ConfigError::Conflict(
                    "--entropy and --mnemonic derive exactly one wallet; drop --count".into(),
                ));
            }
        } else if !SUPPORTED_BITS.contains(&self.bits) {
            return Err(ConfigError::InvalidBits(self.bits));
        }

        if self.count == 0 {
            return Err(ConfigError::InvalidCount(
                "Count must be at least 1".into(),
            ));
        }

        if self.workers == Some(0) {
            return Err(ConfigError::InvalidCount(
                "Worker count must be at least 1".into(),
            ));
        }

        if self.report_interval == 0 {
            return Err(ConfigError::InvalidCount(
                "Report interval must be at least 1 second".into(),
            ));
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid entropy size {0}, expected one of 128, 160, 192, 224, 256")]
    InvalidBits(usize),

    #[error("Invalid count: {0}")]
    InvalidCount(String),

    #[error("Conflicting options: {0}")]
    Conflict(String),
}
