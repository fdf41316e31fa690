//! # eth_wallet
//!
//! Deterministic derivation of Ethereum wallets from BIP-39 mnemonics.
//!
//! ## Architecture
//!
//! - `entropy`: Cryptographically secure entropy of 128..=256 bits
//! - `bip39`: Wordlist, mnemonic encoding/decoding, PBKDF2 seed derivation
//! - `crypto`: secp256k1 arithmetic, key derivation, Keccak-256 addresses
//! - `wallet`: The end-to-end pipeline and `generate_wallet` entry point
//! - `worker`: Parallel batch generation and worker pool management
//! - `config`: Runtime configuration for the CLI

pub mod bip39;
pub mod config;
pub mod crypto;
pub mod entropy;
pub mod error;
pub mod wallet;
pub mod worker;

pub use bip39::{Mnemonic, Seed, Wordlist};
pub use config::Config;
pub use crypto::{Address, Keypair, PrivateKey, PublicKey};
pub use entropy::Entropy;
pub use error::{MnemonicError, Result, WalletError};
pub use wallet::{generate_default_wallet, generate_wallet, Wallet, WalletGenerator, WalletRecord};
pub use worker::{GeneratedWallet, PoolEvent, WalletPool};
