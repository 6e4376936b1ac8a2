//! Polynomial rings R[x].
//!
//! Over a field, `Polynomial<F>` is a Euclidean domain under the usual degree
//! and can be fed to the elimination engine directly, e.g. to compute the
//! invariant factors of `xI - A`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::traits::{EuclideanDomain, Field, Ring};

/// A polynomial over a ring R.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Polynomial<R: Ring> {
    /// Coefficients in ascending degree order: [a_0, a_1, a_2, ...]
    /// Invariant: trailing zeros are removed (except for the zero polynomial).
    coeffs: Vec<R>,
}

impl<R: Ring> Polynomial<R> {
    /// Creates a new polynomial from coefficients.
    ///
    /// Coefficients are given in ascending degree order.
    #[must_use]
    pub fn new(mut coeffs: Vec<R>) -> Self {
        while coeffs.len() > 1 && coeffs.last().is_some_and(Ring::is_zero) {
            coeffs.pop();
        }

        if coeffs.is_empty() {
            coeffs.push(R::zero());
        }

        Self { coeffs }
    }

    /// Creates a constant polynomial.
    #[must_use]
    pub fn constant(c: R) -> Self {
        Self::new(vec![c])
    }

    /// Creates the polynomial x.
    #[must_use]
    pub fn x() -> Self {
        Self::new(vec![R::zero(), R::one()])
    }

    /// Creates the monomial c * x^n.
    #[must_use]
    pub fn monomial(c: R, n: usize) -> Self {
        let mut coeffs = vec![R::zero(); n + 1];
        coeffs[n] = c;
        Self::new(coeffs)
    }

    /// Returns the degree of the polynomial.
    ///
    /// The zero polynomial has degree 0 by convention.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    /// Returns the leading coefficient.
    #[must_use]
    pub fn leading_coeff(&self) -> &R {
        &self.coeffs[self.coeffs.len() - 1]
    }

    /// Returns the coefficient of x^i.
    #[must_use]
    pub fn coeff(&self, i: usize) -> R {
        self.coeffs.get(i).cloned().unwrap_or_else(R::zero)
    }

    /// Returns all coefficients.
    #[must_use]
    pub fn coeffs(&self) -> &[R] {
        &self.coeffs
    }

    /// Evaluates the polynomial at a point.
    #[must_use]
    pub fn eval(&self, x: &R) -> R {
        // Horner's method
        let mut result = R::zero();
        for c in self.coeffs.iter().rev() {
            result = result * x.clone() + c.clone();
        }
        result
    }

    /// Multiplies by a scalar.
    #[must_use]
    pub fn scale(&self, c: &R) -> Self {
        Self::new(self.coeffs.iter().map(|x| x.clone() * c.clone()).collect())
    }

    fn zip_with(&self, other: &Self, f: impl Fn(R, R) -> R) -> Self {
        let len = self.coeffs.len().max(other.coeffs.len());
        Self::new((0..len).map(|i| f(self.coeff(i), other.coeff(i))).collect())
    }
}

impl<R: Ring + std::fmt::Display> std::fmt::Display for Polynomial<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if Ring::is_zero(self) {
            return write!(f, "0");
        }

        let mut terms = Vec::new();
        for (i, c) in self.coeffs.iter().enumerate().rev() {
            if c.is_zero() {
                continue;
            }

            let term = match (i, c.is_one()) {
                (0, _) => format!("{c}"),
                (1, true) => "x".to_owned(),
                (1, false) => format!("{c}*x"),
                (_, true) => format!("x^{i}"),
                (_, false) => format!("{c}*x^{i}"),
            };
            terms.push(term);
        }

        write!(f, "{}", terms.join(" + "))
    }
}

impl<R: Ring> Ring for Polynomial<R> {
    fn zero() -> Self {
        Self {
            coeffs: vec![R::zero()],
        }
    }

    fn one() -> Self {
        Self {
            coeffs: vec![R::one()],
        }
    }

    fn is_zero(&self) -> bool {
        self.coeffs.len() == 1 && self.coeffs[0].is_zero()
    }

    fn is_one(&self) -> bool {
        self.coeffs.len() == 1 && self.coeffs[0].is_one()
    }

    fn symbol() -> String {
        format!("{}[x]", R::symbol())
    }
}

impl<F: Field> EuclideanDomain for Polynomial<F> {
    /// Polynomial long division.
    fn div_rem(&self, other: &Self) -> (Self, Self) {
        assert!(!Ring::is_zero(other), "division by zero polynomial");

        let d = other.degree();
        if Ring::is_zero(self) || self.degree() < d {
            return (<Self as Ring>::zero(), self.clone());
        }

        let lead_inv = other.leading_coeff().inv().unwrap_or_else(F::one);
        let mut rem = self.coeffs.clone();
        let mut quot = vec![F::zero(); self.degree() - d + 1];

        for i in (0..quot.len()).rev() {
            let c = rem[i + d].clone() * lead_inv.clone();
            if !c.is_zero() {
                for (j, b) in other.coeffs.iter().enumerate() {
                    rem[i + j] = rem[i + j].clone() - c.clone() * b.clone();
                }
            }
            quot[i] = c;
        }

        (Self::new(quot), Self::new(rem))
    }

    fn degree(&self) -> usize {
        Polynomial::degree(self)
    }

    fn is_unit(&self) -> bool {
        self.coeffs.len() == 1 && !self.coeffs[0].is_zero()
    }

    fn unit_inverse(&self) -> Option<Self> {
        if self.coeffs.len() == 1 {
            self.coeffs[0].inv().map(Self::constant)
        } else {
            None
        }
    }

    fn normalizing_unit(&self) -> Self {
        self.leading_coeff()
            .inv()
            .map_or_else(<Self as Ring>::one, Self::constant)
    }
}

impl<R: Ring> std::ops::Add for Polynomial<R> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        self.zip_with(&rhs, |a, b| a + b)
    }
}

impl<R: Ring> std::ops::Sub for Polynomial<R> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self.zip_with(&rhs, |a, b| a - b)
    }
}

impl<R: Ring> std::ops::Mul for Polynomial<R> {
    type Output = Self;

    /// Schoolbook multiplication.
    fn mul(self, rhs: Self) -> Self::Output {
        if Ring::is_zero(&self) || Ring::is_zero(&rhs) {
            return <Self as Ring>::zero();
        }

        let n = self.coeffs.len();
        let m = rhs.coeffs.len();
        let mut result = vec![R::zero(); n + m - 1];

        for (i, a) in self.coeffs.iter().enumerate() {
            for (j, b) in rhs.coeffs.iter().enumerate() {
                result[i + j] = result[i + j].clone() + a.clone() * b.clone();
            }
        }

        Self::new(result)
    }
}

impl<R: Ring> std::ops::Neg for Polynomial<R> {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::new(self.coeffs.into_iter().map(|c| -c).collect())
    }
}

impl<R: Ring> From<R> for Polynomial<R> {
    fn from(c: R) -> Self {
        Self::constant(c)
    }
}

// Encoded as the ascending coefficient list.
impl<R: Ring + Serialize> Serialize for Polynomial<R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.coeffs.serialize(serializer)
    }
}

impl<'de, R: Ring + DeserializeOwned> Deserialize<'de> for Polynomial<R> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<R>::deserialize(deserializer).map(Self::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finite_field::FiniteField;
    use crate::rationals::Q;

    fn qpoly(coeffs: &[i64]) -> Polynomial<Q> {
        Polynomial::new(coeffs.iter().map(|&c| Q::from_integer(c)).collect())
    }

    #[test]
    fn test_polynomial_basic() {
        // p(x) = 1 + 2x + 3x^2
        let p = qpoly(&[1, 2, 3, 0, 0]);
        assert_eq!(p.degree(), 2);
        assert_eq!(p.coeff(0), Q::from_integer(1));
        assert_eq!(p.coeff(2), Q::from_integer(3));
        assert_eq!(p.coeff(7), Q::zero());
        assert_eq!(p.eval(&Q::from_integer(2)), Q::from_integer(17));
    }

    #[test]
    fn test_polynomial_arithmetic() {
        let p = qpoly(&[1, 2]); // 1 + 2x
        let q = qpoly(&[3, 4]); // 3 + 4x

        assert_eq!(p.clone() + q.clone(), qpoly(&[4, 6]));
        assert_eq!(p.clone() - p.clone(), Polynomial::zero());
        assert_eq!(p * q, qpoly(&[3, 10, 8]));
    }

    #[test]
    fn test_long_division() {
        // x^3 - 2x^2 - 4 = (x - 3)(x^2 + x + 3) + 5
        let a = qpoly(&[-4, 0, -2, 1]);
        let b = qpoly(&[-3, 1]);
        let (q, r) = a.div_rem(&b);
        assert_eq!(q, qpoly(&[3, 1, 1]));
        assert_eq!(r, qpoly(&[5]));
        assert_eq!(q * b + r, a);
    }

    #[test]
    fn test_gcd_is_monic() {
        // gcd((x-1)(x+2), 3(x-1)(x-5)) = x - 1
        let a = qpoly(&[-1, 1]) * qpoly(&[2, 1]);
        let b = qpoly(&[-3, 3]) * qpoly(&[-5, 1]);
        assert_eq!(a.gcd(&b), qpoly(&[-1, 1]));
    }

    #[test]
    fn test_units() {
        assert!(qpoly(&[4]).is_unit());
        assert!(!qpoly(&[0, 1]).is_unit());
        assert_eq!(qpoly(&[4]).unit_inverse(), Some(Polynomial::constant(Q::new(1, 4))));
        assert_eq!(qpoly(&[2, 4]).normalized(), Polynomial::new(vec![Q::new(1, 2), Q::one()]));
    }

    #[test]
    fn test_over_prime_field() {
        type F2 = FiniteField<2>;
        // (x + 1)^2 = x^2 + 1 over F2
        let p = Polynomial::new(vec![F2::one(), F2::one()]);
        assert_eq!(p.clone() * p, Polynomial::new(vec![F2::one(), F2::zero(), F2::one()]));
        assert_eq!(Polynomial::<F2>::symbol(), "F2[x]");
    }

    #[test]
    fn test_display_and_serde() {
        assert_eq!(qpoly(&[1, 0, 3]).to_string(), "3*x^2 + 1");
        assert_eq!(qpoly(&[0, 1]).to_string(), "x");

        let p = qpoly(&[1, -2]);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "[\"1\",\"-2\"]");
        assert_eq!(serde_json::from_str::<Polynomial<Q>>(&json).unwrap(), p);
    }
}
