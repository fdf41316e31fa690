//! Private key extraction and public key derivation.

use std::fmt;

use num_bigint::BigUint;
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::curve::{Curve, Point};
use super::Address;
use crate::bip39::Seed;
use crate::error::{Result, WalletError};

/// A secp256k1 private scalar, `0 < k < n`, stored big-endian.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey([u8; 32]);

impl PrivateKey {
    /// Validates 32 big-endian bytes as a private scalar.
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self> {
        let scalar = BigUint::from_bytes_be(&bytes);
        if !Curve::secp256k1().is_valid_scalar(&scalar) {
            return Err(WalletError::InvalidPrivateKey(
                "scalar must be nonzero and below the curve order".into(),
            ));
        }
        Ok(Self(bytes))
    }

    /// Takes the first 32 bytes of the seed as the private key.
    ///
    /// This is not BIP-32: no HMAC-SHA512 master-key step is applied, so keys
    /// will not match wallets that derive along `m/44'/60'/…`.
    pub fn from_seed(seed: &Seed) -> Result<Self> {
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&seed.as_bytes()[..32]);
        let key = Self::from_bytes(bytes);
        bytes.zeroize();
        key
    }

    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let trimmed = hex_str.trim();
        let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(digits, &mut bytes).map_err(|e| {
            WalletError::InvalidPrivateKey(format!("expected 64 hex characters: {e}"))
        })?;
        Self::from_bytes(bytes)
    }

    /// The scalar as an integer.
    pub fn scalar(&self) -> BigUint {
        BigUint::from_bytes_be(&self.0)
    }

    /// Computes `kG` on secp256k1.
    pub fn public_key(&self) -> Result<PublicKey> {
        let curve = Curve::secp256k1();
        let point = curve.multiply_generator(&self.scalar())?;
        if !curve.is_on_curve(&point) {
            return Err(WalletError::CurveArithmetic(
                "derived public point is not on the curve".into(),
            ));
        }
        PublicKey::from_point(&point)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Returns the private key as a hex string (without 0x prefix).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(redacted)")
    }
}

/// An uncompressed public key: 32-byte big-endian x followed by y, no prefix.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; 64]);

impl PublicKey {
    /// Encodes an affine point. The identity has no encoding.
    pub fn from_point(point: &Point) -> Result<Self> {
        let (x, y) = point.coordinates().ok_or_else(|| {
            WalletError::CurveArithmetic("the point at infinity has no public key encoding".into())
        })?;

        let mut bytes = [0u8; 64];
        write_be_32(x, &mut bytes[..32])?;
        write_be_32(y, &mut bytes[32..])?;
        Ok(Self(bytes))
    }

    /// Wraps raw `x || y` bytes after checking they form a curve point.
    pub fn from_bytes(bytes: [u8; 64]) -> Result<Self> {
        let key = Self(bytes);
        if !Curve::secp256k1().is_on_curve(&key.to_point()) {
            return Err(WalletError::CurveArithmetic(
                "public key bytes do not describe a secp256k1 point".into(),
            ));
        }
        Ok(key)
    }

    pub fn to_point(&self) -> Point {
        Point::affine(
            BigUint::from_bytes_be(&self.0[..32]),
            BigUint::from_bytes_be(&self.0[32..]),
        )
    }

    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Derives the account address for this key.
    pub fn address(&self) -> Address {
        Address::from_public_key(self)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

/// A private key together with its public key and address.
#[derive(Debug, Clone)]
pub struct Keypair {
    private_key: PrivateKey,
    public_key: PublicKey,
    address: Address,
}

impl Keypair {
    /// Derives the public key and address for a private key.
    pub fn from_private_key(private_key: PrivateKey) -> Result<Self> {
        let public_key = private_key.public_key()?;
        let address = public_key.address();
        debug!(%address, "keypair derived");

        Ok(Self {
            private_key,
            public_key,
            address,
        })
    }

    /// Seed → private key → public key → address.
    pub fn from_seed(seed: &Seed) -> Result<Self> {
        Self::from_private_key(PrivateKey::from_seed(seed)?)
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    #[inline]
    pub fn address(&self) -> &Address {
        &self.address
    }
}

fn write_be_32(v: &BigUint, out: &mut [u8]) -> Result<()> {
    let bytes = v.to_bytes_be();
    if bytes.len() > out.len() {
        return Err(WalletError::CurveArithmetic(
            "coordinate does not fit in 32 bytes".into(),
        ));
    }
    let offset = out.len() - bytes.len();
    out[..offset].fill(0);
    out[offset..].copy_from_slice(&bytes);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_from_u64(v: u64) -> PrivateKey {
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&v.to_be_bytes());
        PrivateKey::from_bytes(bytes).unwrap()
    }

    #[test]
    fn test_zero_and_order_rejected() {
        let err = PrivateKey::from_bytes([0u8; 32]).unwrap_err();
        assert!(err.is_retryable());

        let order = PrivateKey::from_hex(
            "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141",
        )
        .unwrap_err();
        assert!(matches!(order, WalletError::InvalidPrivateKey(_)));

        assert!(PrivateKey::from_bytes([0xff; 32]).is_err());
        assert!(PrivateKey::from_hex(
            "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364140"
        )
        .is_ok());
    }

    #[test]
    fn test_private_key_one() {
        let keypair = Keypair::from_private_key(key_from_u64(1)).unwrap();
        assert_eq!(
            keypair.public_key().to_hex(),
            "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798\
             483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8"
        );
        // Address for private key = 1 is well-known
        assert_eq!(
            keypair.address().to_hex(),
            "7e5f4552091a69125d5dfcb7b8c2659029395bdf"
        );
    }

    #[test]
    fn test_from_seed_takes_first_half() {
        let seed = crate::bip39::Seed::from_phrase(
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about",
            "",
        );
        let key = PrivateKey::from_seed(&seed).unwrap();
        assert_eq!(
            key.to_hex(),
            "5eb00bbddcf069084889a8ab9155568165f5c453ccb85e70811aaed6f6da5fc1"
        );
        assert_eq!(key.as_bytes()[..], seed.as_bytes()[..32]);
    }

    #[test]
    fn test_public_key_bytes_validated() {
        let keypair = Keypair::from_private_key(key_from_u64(2)).unwrap();
        let bytes = *keypair.public_key().as_bytes();
        assert_eq!(PublicKey::from_bytes(bytes).unwrap(), *keypair.public_key());

        let mut tampered = bytes;
        tampered[63] ^= 1;
        assert!(PublicKey::from_bytes(tampered).is_err());
    }

    #[test]
    fn test_infinity_has_no_encoding() {
        assert!(PublicKey::from_point(&Point::Infinity).is_err());
    }

    #[test]
    fn test_debug_redacts_private_key() {
        let key = key_from_u64(0xdead);
        assert_eq!(format!("{:?}", key), "PrivateKey(redacted)");
    }
}
