//! Short Weierstrass curve arithmetic: `y² = x³ + ax + b (mod p)`.
//!
//! Affine coordinates throughout. The point at infinity is a distinct enum
//! variant, never a sentinel coordinate pair, so it cannot leak into field
//! arithmetic by accident.

use std::sync::OnceLock;

use num_bigint::BigUint;
use num_traits::Zero;

use super::field::PrimeField;
use crate::error::{Result, WalletError};

/// A curve point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Point {
    /// The group identity.
    Infinity,
    Affine { x: BigUint, y: BigUint },
}

impl Point {
    pub fn affine(x: BigUint, y: BigUint) -> Self {
        Point::Affine { x, y }
    }

    #[inline]
    pub fn is_infinity(&self) -> bool {
        matches!(self, Point::Infinity)
    }

    /// The `(x, y)` pair, or `None` for the identity.
    pub fn coordinates(&self) -> Option<(&BigUint, &BigUint)> {
        match self {
            Point::Infinity => None,
            Point::Affine { x, y } => Some((x, y)),
        }
    }
}

/// Domain parameters of a prime-field curve.
#[derive(Debug, Clone)]
pub struct Curve {
    field: PrimeField,
    a: BigUint,
    b: BigUint,
    order: BigUint,
    generator: Point,
}

impl Curve {
    /// Builds a curve and checks that the generator lies on it.
    ///
    /// This catches parameter sets that pair one curve's constants with
    /// another curve's base point.
    pub fn new(
        prime: BigUint,
        a: BigUint,
        b: BigUint,
        order: BigUint,
        generator: Point,
    ) -> Result<Self> {
        let field = PrimeField::new(prime);
        if !field.contains(&a) || !field.contains(&b) {
            return Err(WalletError::CurveArithmetic(
                "curve coefficients must be reduced modulo the prime".into(),
            ));
        }

        let curve = Self {
            field,
            a,
            b,
            order,
            generator,
        };

        if curve.generator.is_infinity() || !curve.is_on_curve(&curve.generator) {
            return Err(WalletError::CurveArithmetic(
                "generator is not a point on the curve".into(),
            ));
        }

        Ok(curve)
    }

    /// secp256k1: `y² = x³ + 7` over the 256-bit prime `2²⁵⁶ − 2³² − 977`.
    pub fn secp256k1() -> &'static Curve {
        static SECP256K1: OnceLock<Curve> = OnceLock::new();
        SECP256K1.get_or_init(|| Curve {
            field: PrimeField::new(hex_const(
                "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F",
            )),
            a: BigUint::zero(),
            b: BigUint::from(7u32),
            order: hex_const("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141"),
            generator: Point::affine(
                hex_const("79BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798"),
                hex_const("483ADA7726A3C4655DA4FBFC0E1108A8FD17B448A68554199C47D08FFB10D4B8"),
            ),
        })
    }

    pub fn prime(&self) -> &BigUint {
        self.field.prime()
    }

    /// Order of the generator's subgroup.
    pub fn order(&self) -> &BigUint {
        &self.order
    }

    pub fn generator(&self) -> &Point {
        &self.generator
    }

    /// True if `point` satisfies the curve equation with canonical coordinates.
    pub fn is_on_curve(&self, point: &Point) -> bool {
        let Some((x, y)) = point.coordinates() else {
            return true;
        };
        if !self.field.contains(x) || !self.field.contains(y) {
            return false;
        }

        let f = &self.field;
        let lhs = f.mul(y, y);
        let rhs = f.add(&f.add(&f.mul(&f.mul(x, x), x), &f.mul(&self.a, x)), &self.b);
        lhs == rhs
    }

    /// `-P`.
    pub fn negate(&self, point: &Point) -> Point {
        match point {
            Point::Infinity => Point::Infinity,
            Point::Affine { x, y } => Point::affine(x.clone(), self.field.neg(y)),
        }
    }

    /// `P + Q` in affine coordinates.
    pub fn add(&self, p: &Point, q: &Point) -> Result<Point> {
        let (x1, y1) = match p.coordinates() {
            Some(c) => c,
            None => return Ok(q.clone()),
        };
        let (x2, y2) = match q.coordinates() {
            Some(c) => c,
            None => return Ok(p.clone()),
        };
        self.check_shape(x1, y1)?;
        self.check_shape(x2, y2)?;

        let f = &self.field;
        let slope = if x1 == x2 {
            // Same x and different y means Q = -P. A point with y = 0 is its
            // own negation, so doubling it also lands on the identity.
            if y1 != y2 || y1.is_zero() {
                return Ok(Point::Infinity);
            }
            // Tangent: (3x² + a) / 2y
            let numerator = f.add(&f.mul(&BigUint::from(3u32), &f.mul(x1, x1)), &self.a);
            f.div(&numerator, &f.add(y1, y1))?
        } else {
            // Chord: (y2 - y1) / (x2 - x1)
            f.div(&f.sub(y2, y1), &f.sub(x2, x1))?
        };

        let x3 = f.sub(&f.sub(&f.mul(&slope, &slope), x1), x2);
        let y3 = f.sub(&f.mul(&slope, &f.sub(x1, &x3)), y1);
        Ok(Point::affine(x3, y3))
    }

    /// `2P`.
    #[inline]
    pub fn double(&self, p: &Point) -> Result<Point> {
        self.add(p, p)
    }

    /// `kP` by double-and-add, scanning `k` from the least significant bit.
    ///
    /// `k = 0` yields the identity. Stops early once the running double
    /// reaches the identity, since every later addend would be the identity too.
    pub fn scalar_multiply(&self, k: &BigUint, point: &Point) -> Result<Point> {
        if !self.is_on_curve(point) {
            return Err(WalletError::CurveArithmetic(
                "scalar multiplication of a point that is not on the curve".into(),
            ));
        }

        let mut result = Point::Infinity;
        let mut addend = point.clone();

        for bit in 0..k.bits() {
            if k.bit(bit) {
                result = self.add(&result, &addend)?;
            }
            addend = self.double(&addend)?;
            if addend.is_infinity() {
                break;
            }
        }

        Ok(result)
    }

    /// `kG`.
    pub fn multiply_generator(&self, k: &BigUint) -> Result<Point> {
        self.scalar_multiply(k, &self.generator)
    }

    /// True if `k` is a usable private scalar: `0 < k < n`.
    pub fn is_valid_scalar(&self, k: &BigUint) -> bool {
        !k.is_zero() && k < &self.order
    }

    fn check_shape(&self, x: &BigUint, y: &BigUint) -> Result<()> {
        if self.field.contains(x) && self.field.contains(y) {
            Ok(())
        } else {
            Err(WalletError::CurveArithmetic(
                "point coordinate is not reduced modulo the field prime".into(),
            ))
        }
    }
}

fn hex_const(digits: &str) -> BigUint {
    BigUint::parse_bytes(digits.as_bytes(), 16).expect("curve constant is valid hex")
}

#[cfg(test)]
mod tests {
    use num_traits::One;

    use super::*;

    /// y² = x³ + 7 over F₁₇. Order of (15, 13) is 18.
    fn toy_curve() -> Curve {
        Curve::new(
            BigUint::from(17u32),
            BigUint::zero(),
            BigUint::from(7u32),
            BigUint::from(18u32),
            pt(15, 13),
        )
        .unwrap()
    }

    fn pt(x: u32, y: u32) -> Point {
        Point::affine(BigUint::from(x), BigUint::from(y))
    }

    fn hex_point(x: &str, y: &str) -> Point {
        Point::affine(hex_const(x), hex_const(y))
    }

    #[test]
    fn test_identity_rules() {
        let curve = Curve::secp256k1();
        let g = curve.generator().clone();

        assert_eq!(curve.add(&g, &Point::Infinity).unwrap(), g);
        assert_eq!(curve.add(&Point::Infinity, &g).unwrap(), g);
        assert_eq!(curve.add(&g, &curve.negate(&g)).unwrap(), Point::Infinity);
        assert_eq!(curve.negate(&Point::Infinity), Point::Infinity);
    }

    #[test]
    fn test_scalar_edge_cases() {
        let curve = Curve::secp256k1();
        let g = curve.generator();

        assert_eq!(curve.scalar_multiply(&BigUint::zero(), g).unwrap(), Point::Infinity);
        assert_eq!(curve.scalar_multiply(&BigUint::one(), g).unwrap(), *g);
        assert_eq!(
            curve.scalar_multiply(curve.order(), g).unwrap(),
            Point::Infinity
        );
    }

    #[test]
    fn test_small_multiples_of_g() {
        let curve = Curve::secp256k1();
        let two_g = hex_point(
            "C6047F9441ED7D6D3045406E95C07CD85C778E4B8CEF3CA7ABAC09B95C709EE5",
            "1AE168FEA63DC339A3C58419466CEAEEF7F632653266D0E1236431A950CFE52A",
        );
        let three_g = hex_point(
            "F9308A019258C31049344F85F89D5229B531C845836F99B08601F113BCE036F9",
            "388F7B0F632DE8140FE337E62A37F3566500A99934C2231B6CB9FD7584B8E672",
        );

        assert_eq!(curve.double(curve.generator()).unwrap(), two_g);
        assert_eq!(curve.multiply_generator(&BigUint::from(2u32)).unwrap(), two_g);
        assert_eq!(curve.add(&two_g, curve.generator()).unwrap(), three_g);
        assert_eq!(curve.multiply_generator(&BigUint::from(3u32)).unwrap(), three_g);
        assert!(curve.is_on_curve(&three_g));
    }

    #[test]
    fn test_order_minus_one_is_negated_generator() {
        let curve = Curve::secp256k1();
        let k = curve.order() - 1u32;
        let p = curve.multiply_generator(&k).unwrap();
        assert_eq!(p, curve.negate(curve.generator()));
    }

    #[test]
    fn test_toy_curve_group_law() {
        let curve = toy_curve();
        let g = curve.generator().clone();

        // Walk the whole cyclic group and check closure.
        let mut acc = Point::Infinity;
        for k in 1..18u32 {
            acc = curve.add(&acc, &g).unwrap();
            assert!(!acc.is_infinity(), "identity reached early at {}", k);
            assert!(curve.is_on_curve(&acc));
            assert_eq!(curve.scalar_multiply(&BigUint::from(k), &g).unwrap(), acc);
        }
        assert_eq!(curve.add(&acc, &g).unwrap(), Point::Infinity);
        assert_eq!(curve.scalar_multiply(&BigUint::from(18u32), &g).unwrap(), Point::Infinity);
    }

    #[test]
    fn test_doubling_two_torsion_point() {
        // y² = x³ + 7 over F₁₇ has no y = 0 points, so use y² = x³ + 1 where (16, 0) is one.
        let curve = Curve::new(
            BigUint::from(17u32),
            BigUint::zero(),
            BigUint::one(),
            BigUint::from(2u32),
            pt(16, 0),
        )
        .unwrap();
        assert_eq!(curve.double(&pt(16, 0)).unwrap(), Point::Infinity);
    }

    #[test]
    fn test_mismatched_generator_rejected() {
        let secp = Curve::secp256k1();
        let err = Curve::new(
            secp.prime().clone(),
            BigUint::zero(),
            BigUint::from(7u32),
            secp.order().clone(),
            pt(1, 3),
        )
        .unwrap_err();
        assert!(matches!(err, WalletError::CurveArithmetic(_)));
    }

    #[test]
    fn test_off_curve_point_rejected() {
        let curve = Curve::secp256k1();
        let err = curve.scalar_multiply(&BigUint::from(5u32), &pt(1, 3)).unwrap_err();
        assert!(matches!(err, WalletError::CurveArithmetic(_)));

        let oversized = Point::affine(curve.prime().clone(), BigUint::one());
        assert!(curve.add(&oversized, curve.generator()).is_err());
    }

    #[test]
    fn test_scalar_validity() {
        let curve = Curve::secp256k1();
        assert!(!curve.is_valid_scalar(&BigUint::zero()));
        assert!(curve.is_valid_scalar(&BigUint::one()));
        assert!(curve.is_valid_scalar(&(curve.order() - 1u32)));
        assert!(!curve.is_valid_scalar(curve.order()));
    }
}
