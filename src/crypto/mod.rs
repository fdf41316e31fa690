//! Cryptographic operations for key and address derivation.
//!
//! This module provides:
//! - Prime-field arithmetic and the modular inverse
//! - Affine point arithmetic on short Weierstrass curves (secp256k1)
//! - Private/public key derivation from a BIP-39 seed
//! - Ethereum address derivation using Keccak-256

mod address;
pub mod curve;
pub mod field;
mod keypair;

pub use address::Address;
pub use curve::{Curve, Point};
pub use keypair::{Keypair, PrivateKey, PublicKey};

use tiny_keccak::{Hasher, Keccak};

/// Keccak-256 of arbitrary bytes (output 32 bytes).
pub fn keccak256(input: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(input);
    let mut out = [0u8; 32];
    hasher.finalize(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak256_empty() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }
}
