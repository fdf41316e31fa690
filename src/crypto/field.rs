//! Modular arithmetic over a prime field.

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Signed, Zero};

use crate::error::{Result, WalletError};

/// Reduces `a` into `[0, m)`, also for negative `a`.
#[inline]
pub fn modulo(a: &BigInt, m: &BigInt) -> BigInt {
    let r = a % m;
    if r.is_negative() {
        r + m
    } else {
        r
    }
}

/// Modular inverse via the extended Euclidean algorithm.
///
/// Returns `None` when `gcd(a, m) != 1` (including `a ≡ 0`) or when `m < 2`.
/// The result is always normalized into `[0, m)`.
pub fn mod_inverse(a: &BigInt, m: &BigInt) -> Option<BigInt> {
    if *m <= BigInt::one() {
        return None;
    }

    let mut low = modulo(a, m);
    let mut high = m.clone();
    let mut lm = BigInt::one();
    let mut hm = BigInt::zero();

    // Invariant: low ≡ lm·a and high ≡ hm·a (mod m).
    while low > BigInt::one() {
        let ratio = &high / &low;
        let next_lm = &hm - &lm * &ratio;
        let next_low = &high - &low * &ratio;

        hm = lm;
        lm = next_lm;
        high = low;
        low = next_low;
    }

    if low.is_zero() {
        None
    } else {
        Some(modulo(&lm, m))
    }
}

/// Arithmetic in GF(p). Every method returns a fully reduced value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimeField {
    prime: BigUint,
    signed_prime: BigInt,
}

impl PrimeField {
    pub fn new(prime: BigUint) -> Self {
        let signed_prime = BigInt::from_biguint(Sign::Plus, prime.clone());
        Self {
            prime,
            signed_prime,
        }
    }

    pub fn prime(&self) -> &BigUint {
        &self.prime
    }

    /// True if `v` is a canonical field element (`v < p`).
    #[inline]
    pub fn contains(&self, v: &BigUint) -> bool {
        v < &self.prime
    }

    #[inline]
    pub fn reduce(&self, v: &BigUint) -> BigUint {
        v % &self.prime
    }

    #[inline]
    pub fn add(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a + b) % &self.prime
    }

    #[inline]
    pub fn sub(&self, a: &BigUint, b: &BigUint) -> BigUint {
        let b = self.reduce(b);
        (a + &self.prime - b) % &self.prime
    }

    #[inline]
    pub fn mul(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a * b) % &self.prime
    }

    #[inline]
    pub fn neg(&self, a: &BigUint) -> BigUint {
        self.sub(&BigUint::zero(), a)
    }

    /// Multiplicative inverse. Zero has none.
    pub fn inv(&self, a: &BigUint) -> Result<BigUint> {
        let signed = BigInt::from_biguint(Sign::Plus, a.clone());
        mod_inverse(&signed, &self.signed_prime)
            .and_then(|v| v.to_biguint())
            .ok_or_else(|| {
                WalletError::CurveArithmetic(format!("{a:#x} has no inverse modulo the field prime"))
            })
    }

    /// `a / b`.
    pub fn div(&self, a: &BigUint, b: &BigUint) -> Result<BigUint> {
        Ok(self.mul(a, &self.inv(b)?))
    }
}
