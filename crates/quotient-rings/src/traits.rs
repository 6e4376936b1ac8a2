//! Algebraic structure traits.
//!
//! The elimination engine is generic over these traits and never inspects a
//! scalar beyond what they expose.

use std::cmp::Ordering;
use std::fmt::Debug;
use std::ops::{Add, Mul, Neg, Sub};

/// A commutative ring with identity.
///
/// # Laws
///
/// - Addition is associative and commutative with identity `zero()`
/// - Multiplication is associative and commutative with identity `one()`
/// - Multiplication distributes over addition
/// - Every element has an additive inverse (`neg`)
pub trait Ring:
    Clone
    + Eq
    + Debug
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
{
    /// The additive identity.
    fn zero() -> Self;

    /// The multiplicative identity.
    fn one() -> Self;

    /// Returns true if this is the additive identity.
    fn is_zero(&self) -> bool;

    /// Returns true if this is the multiplicative identity.
    fn is_one(&self) -> bool;

    /// Display name of the ring, e.g. `Z` or `F2[x]`.
    fn symbol() -> String;
}

/// A Euclidean domain supports division with remainder.
///
/// For any a, b with b ≠ 0, there exist q, r such that:
/// - a = b*q + r
/// - Either r = 0 or `degree(r) < degree(b)`
///
/// Elimination terminates because every restart of a pivot search strictly
/// decreases the pivot degree under `cmp_degree`.
pub trait EuclideanDomain: Ring {
    /// Computes the quotient and remainder of division.
    ///
    /// # Panics
    ///
    /// Panics if `other` is zero.
    fn div_rem(&self, other: &Self) -> (Self, Self);

    /// Computes the quotient of division.
    fn div(&self, other: &Self) -> Self {
        self.div_rem(other).0
    }

    /// Computes the remainder of division.
    fn rem(&self, other: &Self) -> Self {
        self.div_rem(other).1
    }

    /// The Euclidean function of a non-zero element.
    fn degree(&self) -> usize;

    /// Compares Euclidean degrees exactly.
    ///
    /// Rings whose degree may saturate `usize` override this.
    fn cmp_degree(&self, other: &Self) -> Ordering {
        self.degree().cmp(&other.degree())
    }

    /// Returns true if this element has a multiplicative inverse.
    fn is_unit(&self) -> bool;

    /// The multiplicative inverse of a unit, `None` otherwise.
    fn unit_inverse(&self) -> Option<Self>;

    /// A unit `u` such that `u * self` is the canonical associate of `self`
    /// (non-negative for Z, monic for polynomials).
    fn normalizing_unit(&self) -> Self {
        Self::one()
    }

    /// The canonical associate of `self`.
    fn normalized(&self) -> Self {
        self.normalizing_unit() * self.clone()
    }

    /// Returns true if `self` divides `other`.
    fn divides(&self, other: &Self) -> bool {
        if self.is_zero() {
            other.is_zero()
        } else {
            other.rem(self).is_zero()
        }
    }

    /// Computes the normalized greatest common divisor.
    fn gcd(&self, other: &Self) -> Self {
        let mut a = self.clone();
        let mut b = other.clone();

        while !b.is_zero() {
            let r = a.rem(&b);
            a = b;
            b = r;
        }

        a.normalized()
    }

    /// Computes the least common multiple.
    fn lcm(&self, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::zero();
        }
        let g = self.gcd(other);
        (self.div(&g) * other.clone()).normalized()
    }

    /// Extended Euclidean algorithm.
    ///
    /// Returns (gcd, x, y) such that gcd = self*x + other*y, with the gcd
    /// normalized.
    fn extended_gcd(&self, other: &Self) -> (Self, Self, Self) {
        let mut old_r = self.clone();
        let mut r = other.clone();
        let mut old_s = Self::one();
        let mut s = Self::zero();
        let mut old_t = Self::zero();
        let mut t = Self::one();

        while !r.is_zero() {
            let (q, rem) = old_r.div_rem(&r);
            old_r = r;
            r = rem;

            let new_s = old_s.clone() - q.clone() * s.clone();
            old_s = s;
            s = new_s;

            let new_t = old_t.clone() - q * t.clone();
            old_t = t;
            t = new_t;
        }

        let u = old_r.normalizing_unit();
        (u.clone() * old_r, u.clone() * old_s, u * old_t)
    }
}

/// A field is a ring where every non-zero element has a multiplicative inverse.
pub trait Field: EuclideanDomain {
    /// Computes the multiplicative inverse.
    ///
    /// Returns `None` if the element is zero.
    fn inv(&self) -> Option<Self>;

    /// Divides by another element.
    ///
    /// # Panics
    ///
    /// Panics if `other` is zero.
    fn field_div(&self, other: &Self) -> Self {
        match other.inv() {
            Some(inv) => self.clone() * inv,
            None => panic!("division by zero"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Z;

    #[test]
    fn test_default_gcd_is_normalized() {
        assert_eq!(Z::new(-12).gcd(&Z::new(18)), Z::new(6));
        assert_eq!(Z::new(0).gcd(&Z::new(-5)), Z::new(5));
        assert_eq!(Z::new(-4).lcm(&Z::new(6)), Z::new(12));
    }

    #[test]
    fn test_divides() {
        assert!(Z::new(3).divides(&Z::new(-12)));
        assert!(!Z::new(5).divides(&Z::new(12)));
        assert!(Z::new(0).divides(&Z::new(0)));
        assert!(!Z::new(0).divides(&Z::new(1)));
    }

    #[test]
    fn test_extended_gcd_bezout() {
        let a = Z::new(-30);
        let b = Z::new(42);
        let (g, x, y) = a.extended_gcd(&b);
        assert_eq!(g, Z::new(6));
        assert_eq!(a * x + b * y, g);
    }
}
