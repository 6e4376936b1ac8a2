//! Prime fields Z_p.

use quotient_integers::ModInt;
use serde::{Deserialize, Serialize};

use crate::traits::{EuclideanDomain, Field, Ring};

/// A finite field Z_p for prime p.
///
/// This wraps `ModInt<P>` and implements the algebraic traits.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FiniteField<const P: u64>(pub ModInt<P>);

impl<const P: u64> FiniteField<P> {
    /// Creates a new field element.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(ModInt::new(value))
    }

    /// Creates a field element from a signed value.
    #[must_use]
    pub fn from_signed(value: i64) -> Self {
        Self(ModInt::from_signed(value))
    }

    /// Returns the value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0.value()
    }

    /// Returns the characteristic (the prime p).
    #[must_use]
    pub const fn characteristic() -> u64 {
        P
    }
}

impl<const P: u64> Ring for FiniteField<P> {
    fn zero() -> Self {
        Self(ModInt::new(0))
    }

    fn one() -> Self {
        Self(ModInt::new(1))
    }

    fn is_zero(&self) -> bool {
        self.0.value() == 0
    }

    fn is_one(&self) -> bool {
        self.0.value() == 1
    }

    fn symbol() -> String {
        format!("F{P}")
    }
}

impl<const P: u64> EuclideanDomain for FiniteField<P> {
    fn div_rem(&self, other: &Self) -> (Self, Self) {
        (Self(self.0 / other.0), Self::zero())
    }

    fn degree(&self) -> usize {
        0
    }

    fn is_unit(&self) -> bool {
        !self.is_zero()
    }

    fn unit_inverse(&self) -> Option<Self> {
        self.inv()
    }

    fn normalizing_unit(&self) -> Self {
        self.inv().unwrap_or_else(Self::one)
    }
}

impl<const P: u64> Field for FiniteField<P> {
    fn inv(&self) -> Option<Self> {
        self.0.inv().map(Self)
    }
}

impl<const P: u64> std::ops::Add for FiniteField<P> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl<const P: u64> std::ops::Sub for FiniteField<P> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl<const P: u64> std::ops::Mul for FiniteField<P> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self(self.0 * rhs.0)
    }
}

impl<const P: u64> std::ops::Neg for FiniteField<P> {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl<const P: u64> From<u64> for FiniteField<P> {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl<const P: u64> From<i64> for FiniteField<P> {
    fn from(value: i64) -> Self {
        Self::from_signed(value)
    }
}

impl<const P: u64> std::fmt::Display for FiniteField<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Type alias for GF(2), the field with two elements.
pub type GF2 = FiniteField<2>;
