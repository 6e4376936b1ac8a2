//! Finite linear combinations of basis elements.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hash;
use std::ops::{Add, Neg, Sub};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use quotient_linalg::SparseMatrix;
use quotient_rings::traits::Ring;

/// Anything usable as a basis element of a free module.
pub trait BasisElement: Clone + Ord + Hash + fmt::Debug {}

impl<T: Clone + Ord + Hash + fmt::Debug> BasisElement for T {}

/// The i-th element of an unnamed basis, displayed as `e{i}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AbstractBasisElement(pub usize);

impl AbstractBasisElement {
    /// The first `n` abstract basis elements.
    #[must_use]
    pub fn basis(n: usize) -> Vec<Self> {
        (0..n).map(Self).collect()
    }
}

impl fmt::Display for AbstractBasisElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// An element of the free module over `R` with basis `A`.
///
/// Stored as a sorted map from basis elements to non-zero coefficients.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FreeModule<A, R> {
    elements: BTreeMap<A, R>,
}

impl<A: BasisElement, R: Ring> FreeModule<A, R> {
    /// The zero element.
    #[must_use]
    pub fn zero() -> Self {
        Self {
            elements: BTreeMap::new(),
        }
    }

    /// The basis element `a` with coefficient one.
    #[must_use]
    pub fn from_basis(a: A) -> Self {
        Self::from_pairs([(a, R::one())])
    }

    /// Sums `r·a` over the pairs; repeated basis elements are combined.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (A, R)>) -> Self {
        let mut elements: BTreeMap<A, R> = BTreeMap::new();
        for (a, r) in pairs {
            let sum = match elements.remove(&a) {
                Some(prev) => prev + r,
                None => r,
            };
            if !sum.is_zero() {
                elements.insert(a, sum);
            }
        }
        Self { elements }
    }

    /// The element with the given coordinates in `basis`.
    ///
    /// # Panics
    ///
    /// Panics if the lengths differ.
    #[must_use]
    pub fn from_components(basis: &[A], components: &[R]) -> Self {
        assert_eq!(
            basis.len(),
            components.len(),
            "basis and components differ in length"
        );
        Self::from_pairs(basis.iter().cloned().zip(components.iter().cloned()))
    }

    /// The coefficient of `a`, zero if absent.
    #[must_use]
    pub fn coefficient(&self, a: &A) -> R {
        self.elements.get(a).cloned().unwrap_or_else(R::zero)
    }

    /// Coefficients with respect to `basis`, in its order.
    ///
    /// Basis elements outside `basis` are ignored.
    #[must_use]
    pub fn coordinates(&self, basis: &[A]) -> Vec<R> {
        basis.iter().map(|a| self.coefficient(a)).collect()
    }

    /// Non-zero terms in basis order.
    pub fn iter(&self) -> impl Iterator<Item = (&A, &R)> {
        self.elements.iter()
    }

    /// Number of non-zero terms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true for the zero element.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.elements.is_empty()
    }

    /// Multiplies every coefficient by `r`.
    #[must_use]
    pub fn scale(&self, r: &R) -> Self {
        Self::from_pairs(
            self.elements
                .iter()
                .map(|(a, c)| (a.clone(), r.clone() * c.clone())),
        )
    }
}

impl<A: BasisElement, R: Ring> Default for FreeModule<A, R> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<A: BasisElement, R: Ring> Add for FreeModule<A, R> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::from_pairs(self.elements.into_iter().chain(rhs.elements))
    }
}

impl<A: BasisElement, R: Ring> Add for &FreeModule<A, R> {
    type Output = FreeModule<A, R>;

    fn add(self, rhs: Self) -> Self::Output {
        self.clone() + rhs.clone()
    }
}

impl<A: BasisElement, R: Ring> Neg for FreeModule<A, R> {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self {
            elements: self.elements.into_iter().map(|(a, r)| (a, -r)).collect(),
        }
    }
}

impl<A: BasisElement, R: Ring> Sub for FreeModule<A, R> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self + (-rhs)
    }
}

impl<A: BasisElement, R: Ring> Sub for &FreeModule<A, R> {
    type Output = FreeModule<A, R>;

    fn sub(self, rhs: Self) -> Self::Output {
        self.clone() - rhs.clone()
    }
}

impl<A: BasisElement, R: Ring> std::iter::Sum for FreeModule<A, R> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self::from_pairs(iter.flat_map(|z| z.elements))
    }
}

impl<A, R> fmt::Display for FreeModule<A, R>
where
    A: BasisElement + fmt::Display,
    R: Ring + fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        for (k, (a, r)) in self.elements.iter().enumerate() {
            if k > 0 {
                write!(f, " + ")?;
            }
            if r.is_one() {
                write!(f, "{a}")?;
            } else if (-r.clone()).is_one() {
                write!(f, "-{a}")?;
            } else {
                write!(f, "{r}{a}")?;
            }
        }
        Ok(())
    }
}

/// Reads each column of an n×k matrix as an element over an n-element basis.
///
/// # Panics
///
/// Panics if `matrix.num_rows() != basis.len()`.
#[must_use]
pub fn columns_as_elements<A: BasisElement, R: Ring>(
    matrix: &SparseMatrix<R>,
    basis: &[A],
) -> Vec<FreeModule<A, R>> {
    assert_eq!(
        matrix.num_rows(),
        basis.len(),
        "matrix rows must match the basis"
    );
    (0..matrix.num_cols())
        .map(|j| {
            FreeModule::from_pairs(
                matrix
                    .col_iter(j)
                    .map(|(i, r)| (basis[i].clone(), r.clone())),
            )
        })
        .collect()
}

impl<A: Serialize, R: Serialize> Serialize for FreeModule<A, R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.elements.iter())
    }
}

impl<'de, A, R> Deserialize<'de> for FreeModule<A, R>
where
    A: BasisElement + DeserializeOwned,
    R: Ring + DeserializeOwned,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pairs = Vec::<(A, R)>::deserialize(deserializer)?;
        Ok(Self::from_pairs(pairs))
    }
}
