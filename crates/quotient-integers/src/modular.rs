//! Integers modulo a compile-time prime.
//!
//! Backs the prime fields used for homology with field coefficients
//! (most commonly GF(2)).

use num_traits::{One, Zero};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A modular integer with a compile-time prime modulus.
///
/// All operations are performed modulo P; the stored value is always
/// reduced into `0..P`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ModInt<const P: u64>(u64);

impl<const P: u64> ModInt<P> {
    /// Creates a new modular integer.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value % P)
    }

    /// Creates a modular integer from a signed value.
    #[must_use]
    pub fn from_signed(value: i64) -> Self {
        let r = value.unsigned_abs() % P;
        if value >= 0 || r == 0 {
            Self(r)
        } else {
            Self(P - r)
        }
    }

    /// Returns the value as a u64.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Returns the modulus.
    #[must_use]
    pub const fn modulus() -> u64 {
        P
    }

    /// Computes the modular inverse using the extended Euclidean algorithm.
    ///
    /// Returns `None` if the inverse doesn't exist (when gcd(self, P) != 1).
    #[must_use]
    pub fn inv(self) -> Option<Self> {
        if self.0 == 0 {
            return None;
        }

        let mut t = 0i128;
        let mut new_t = 1i128;
        let mut r = i128::from(P);
        let mut new_r = i128::from(self.0);

        while new_r != 0 {
            let quotient = r / new_r;
            (t, new_t) = (new_t, t - quotient * new_t);
            (r, new_r) = (new_r, r - quotient * new_r);
        }

        if r > 1 {
            return None;
        }

        let p = i128::from(P);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Some(Self((((t % p) + p) % p) as u64))
    }

    /// Computes self^exp using binary exponentiation.
    #[must_use]
    pub fn pow(self, mut exp: u64) -> Self {
        let mut base = self;
        let mut result = Self::one();

        while exp > 0 {
            if exp & 1 == 1 {
                result = result * base;
            }
            base = base * base;
            exp >>= 1;
        }

        result
    }
}

impl<const P: u64> Zero for ModInt<P> {
    fn zero() -> Self {
        Self(0)
    }

    fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl<const P: u64> One for ModInt<P> {
    fn one() -> Self {
        Self(1 % P)
    }

    fn is_one(&self) -> bool {
        self.0 == 1
    }
}

impl<const P: u64> fmt::Debug for ModInt<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (mod {})", self.0, P)
    }
}

impl<const P: u64> fmt::Display for ModInt<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<const P: u64> Add for ModInt<P> {
    type Output = Self;

    #[allow(clippy::cast_possible_truncation)]
    fn add(self, rhs: Self) -> Self::Output {
        Self(((u128::from(self.0) + u128::from(rhs.0)) % u128::from(P)) as u64)
    }
}

impl<const P: u64> Sub for ModInt<P> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self + (-rhs)
    }
}

impl<const P: u64> Mul for ModInt<P> {
    type Output = Self;

    #[allow(clippy::cast_possible_truncation)]
    fn mul(self, rhs: Self) -> Self::Output {
        Self(((u128::from(self.0) * u128::from(rhs.0)) % u128::from(P)) as u64)
    }
}

impl<const P: u64> Div for ModInt<P> {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        match rhs.inv() {
            Some(inv) => self * inv,
            None => panic!("division by non-invertible element {rhs:?}"),
        }
    }
}

impl<const P: u64> Neg for ModInt<P> {
    type Output = Self;

    fn neg(self) -> Self::Output {
        if self.0 == 0 {
            Self(0)
        } else {
            Self(P - self.0)
        }
    }
}

impl<const P: u64> From<u64> for ModInt<P> {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl<const P: u64> From<i64> for ModInt<P> {
    fn from(value: i64) -> Self {
        Self::from_signed(value)
    }
}

impl<const P: u64> Serialize for ModInt<P> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.0)
    }
}

impl<'de, const P: u64> Deserialize<'de> for ModInt<P> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u64::deserialize(deserializer).map(Self::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Mod7 = ModInt<7>;

    #[test]
    fn test_basic_ops() {
        let a = Mod7::new(5);
        let b = Mod7::new(4);

        assert_eq!((a + b).value(), 2); // 9 ≡ 2 (mod 7)
        assert_eq!((a - b).value(), 1);
        assert_eq!((b - a).value(), 6);
        assert_eq!((a * b).value(), 6); // 20 ≡ 6 (mod 7)
    }

    #[test]
    fn test_inverse() {
        // 3 * 5 = 15 ≡ 1 (mod 7)
        assert_eq!(Mod7::new(3).inv(), Some(Mod7::new(5)));
        assert_eq!(Mod7::new(0).inv(), None);
        assert_eq!(ModInt::<2>::new(1).inv(), Some(ModInt::<2>::new(1)));
    }

    #[test]
    fn test_pow() {
        let a = Mod7::new(3);
        assert_eq!(a.pow(0).value(), 1);
        assert_eq!(a.pow(2).value(), 2);
        assert_eq!(a.pow(6).value(), 1);
    }

    #[test]
    fn test_negative() {
        assert_eq!(Mod7::from_signed(-3).value(), 4);
        assert_eq!(Mod7::from_signed(-14).value(), 0);
    }

    #[test]
    fn test_serde_reduces_on_input() {
        let a: Mod7 = serde_json::from_str("10").unwrap();
        assert_eq!(a.value(), 3);
        assert_eq!(serde_json::to_string(&a).unwrap(), "3");
    }
}
