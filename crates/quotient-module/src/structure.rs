//! Invariant factor decomposition of finitely presented modules.
//!
//! Given a module `M` presented as
//!
//! ```text
//!          B        A
//! R^l  ------> R^k ----> M -> 0
//! ```
//!
//! inside a free module with basis of size `n`, the Smith form of the
//! relations gives `M ≅ R^r ⊕ R/d_1 ⊕ … ⊕ R/d_t` with `d_1 | d_2 | … | d_t`.

use std::collections::BTreeSet;
use std::fmt;

use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use quotient_linalg::{EliminationConfig, MatrixForm, ParallelConfig, SparseMatrix};
use quotient_rings::traits::EuclideanDomain;

use crate::error::{ModuleError, Result};
use crate::free_module::{columns_as_elements, AbstractBasisElement, BasisElement, FreeModule};

/// A cyclic summand `R/d` generated by `generator`; `d = 0` means `R`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "A: Serialize, R: Serialize",
    deserialize = "A: BasisElement + DeserializeOwned, R: EuclideanDomain + DeserializeOwned"
))]
pub struct Summand<A, R> {
    generator: FreeModule<A, R>,
    divisor: R,
}

impl<A: BasisElement, R: EuclideanDomain> Summand<A, R> {
    /// A summand with the given generator and divisor.
    #[must_use]
    pub fn new(generator: FreeModule<A, R>, divisor: R) -> Self {
        Self { generator, divisor }
    }

    /// The generating element.
    #[must_use]
    pub fn generator(&self) -> &FreeModule<A, R> {
        &self.generator
    }

    /// The divisor; zero for a free summand.
    #[must_use]
    pub fn divisor(&self) -> &R {
        &self.divisor
    }

    /// Returns true if the summand is free.
    #[must_use]
    pub fn is_free(&self) -> bool {
        self.divisor.is_zero()
    }
}

impl<A, R: EuclideanDomain + fmt::Display> fmt::Display for Summand<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.divisor.is_zero() {
            write!(f, "{}", R::symbol())
        } else {
            write!(f, "{}/{}", R::symbol(), self.divisor)
        }
    }
}

/// A decomposed finitely presented module.
///
/// Summands are ordered torsion first, by divisibility, then free.
/// `transform` maps coordinates in `basis` to coordinates in the summand
/// generators.
#[derive(Clone, Debug)]
pub struct ModuleStructure<A, R> {
    summands: Vec<Summand<A, R>>,
    basis: Vec<A>,
    transform: SparseMatrix<R>,
}

impl<A: BasisElement, R: EuclideanDomain> ModuleStructure<A, R> {
    /// Decomposes the module generated by the columns of `generating` (n×k)
    /// modulo the relations in the columns of `relations` (n×l), both in
    /// coordinates of `basis`. `transition` (k×n) must satisfy
    /// `transition · generating = I_k`.
    ///
    /// # Panics
    ///
    /// Panics if the shapes disagree, if `k < l` or `n < k`, or if
    /// `transition` is not a left inverse of `generating`.
    #[must_use]
    pub fn decompose(
        basis: Vec<A>,
        generating: &SparseMatrix<R>,
        relations: &SparseMatrix<R>,
        transition: &SparseMatrix<R>,
    ) -> Self {
        Self::decompose_with(basis, generating, relations, transition, &ParallelConfig::default())
    }

    /// [`decompose`](Self::decompose) with explicit product parallelism.
    ///
    /// # Panics
    ///
    /// As for [`decompose`](Self::decompose).
    #[must_use]
    pub fn decompose_with(
        basis: Vec<A>,
        generating: &SparseMatrix<R>,
        relations: &SparseMatrix<R>,
        transition: &SparseMatrix<R>,
        parallel: &ParallelConfig,
    ) -> Self {
        let (n, k, l) = (generating.num_rows(), generating.num_cols(), relations.num_cols());
        assert_eq!(n, basis.len(), "generating matrix rows must match the basis");
        assert_eq!(relations.num_rows(), n, "relation matrix rows must match the basis");
        assert!(n >= k, "more generators ({k}) than basis elements ({n})");
        assert!(k >= l, "more relations ({l}) than generators ({k})");
        assert!(
            transition.num_rows() == k && transition.num_cols() == n,
            "transition matrix must be {k}×{n}"
        );
        assert!(
            transition.mul_with(generating, parallel) == SparseMatrix::identity(k),
            "transition matrix is not a left inverse of the generating matrix"
        );

        // Relations expressed in the generators.
        let r = transition.mul_with(relations, parallel);
        let e = r.eliminate_with(&EliminationConfig {
            form: MatrixForm::Smith,
            parallel: parallel.clone(),
        });

        let mut divisors = e.result().diagonal();
        divisors.resize(k, R::zero());
        divisors.retain(|d| !d.is_unit());
        let s = divisors.len();

        let new_generating = generating.mul_with(&e.log().left_inverse(k, Some(k - s..k)), parallel);
        let transform = e.left().submatrix_rows(k - s..k).mul_with(transition, parallel);

        let summands: Vec<_> = columns_as_elements(&new_generating, &basis)
            .into_iter()
            .zip(divisors)
            .map(|(z, d)| Summand::new(z, d))
            .collect();

        let structure = Self {
            summands,
            basis,
            transform,
        };
        debug!(
            generators = k,
            relations = l,
            rank = structure.rank(),
            torsion = s - structure.rank(),
            "module decomposed"
        );
        structure
    }

    /// Decomposes the module freely generated by `generators` modulo the
    /// columns of `relations`.
    ///
    /// # Panics
    ///
    /// Panics if `relations` has more columns than rows or its rows do not
    /// match `generators`.
    #[must_use]
    pub fn from_relations(generators: Vec<A>, relations: &SparseMatrix<R>) -> Self {
        let identity = SparseMatrix::identity(generators.len());
        Self::decompose(generators, &identity, relations, &identity)
    }

    /// [`from_relations`](Self::from_relations) with the relations given as a
    /// row-major grid with one row per generator.
    ///
    /// # Errors
    ///
    /// [`ModuleError::Linalg`] if the grid length is not a multiple of the
    /// number of generators matching `cols`.
    pub fn from_relation_grid(generators: Vec<A>, cols: usize, grid: Vec<R>) -> Result<Self> {
        let relations = SparseMatrix::try_from_grid(generators.len(), cols, grid)?;
        Ok(Self::from_relations(generators, &relations))
    }

    /// The trivial module.
    #[must_use]
    pub fn zero_module() -> Self {
        Self {
            summands: Vec::new(),
            basis: Vec::new(),
            transform: SparseMatrix::zero(0, 0),
        }
    }

    /// All summands, torsion first.
    #[must_use]
    pub fn summands(&self) -> &[Summand<A, R>] {
        &self.summands
    }

    /// The i-th summand.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range.
    #[must_use]
    pub fn summand(&self, i: usize) -> &Summand<A, R> {
        &self.summands[i]
    }

    /// Generator of the i-th summand.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range.
    #[must_use]
    pub fn generator(&self, i: usize) -> &FreeModule<A, R> {
        &self.summands[i].generator
    }

    /// Generators of all summands.
    #[must_use]
    pub fn generators(&self) -> Vec<FreeModule<A, R>> {
        self.summands.iter().map(|s| s.generator.clone()).collect()
    }

    /// The ambient basis.
    #[must_use]
    pub fn basis(&self) -> &[A] {
        &self.basis
    }

    /// The transition from ambient coordinates to summand coordinates.
    #[must_use]
    pub fn transform(&self) -> &SparseMatrix<R> {
        &self.transform
    }

    /// Number of free summands.
    #[must_use]
    pub fn rank(&self) -> usize {
        self.summands.iter().filter(|s| s.is_free()).count()
    }

    /// Divisors of the torsion summands.
    #[must_use]
    pub fn torsion_coefficients(&self) -> Vec<R> {
        self.summands
            .iter()
            .filter(|s| !s.is_free())
            .map(|s| s.divisor.clone())
            .collect()
    }

    /// Returns true for the zero module.
    #[must_use]
    pub fn is_trivial(&self) -> bool {
        self.summands.is_empty()
    }

    /// Returns true if there is no torsion.
    #[must_use]
    pub fn is_free(&self) -> bool {
        self.summands.iter().all(Summand::is_free)
    }

    /// The free summands.
    #[must_use]
    pub fn free_part(&self) -> Self {
        let indices: Vec<usize> = (0..self.summands.len())
            .filter(|&i| self.summands[i].is_free())
            .collect();
        self.sub_summands(&indices)
    }

    /// The torsion summands.
    #[must_use]
    pub fn torsion_part(&self) -> Self {
        let indices: Vec<usize> = (0..self.summands.len())
            .filter(|&i| !self.summands[i].is_free())
            .collect();
        self.sub_summands(&indices)
    }

    /// The summands of the form `R/n`. Passing zero selects the free part.
    #[must_use]
    pub fn order_n_torsion_part(&self, n: &R) -> Self {
        let indices: Vec<usize> = (0..self.summands.len())
            .filter(|&i| self.summands[i].divisor == *n)
            .collect();
        self.sub_summands(&indices)
    }

    /// The same invariants on an abstract basis `e0, e1, …`, one element per
    /// summand.
    #[must_use]
    pub fn as_abstract(&self) -> ModuleStructure<AbstractBasisElement, R> {
        ModuleStructure::from_invariants(self.rank(), self.torsion_coefficients())
    }

    /// The summands at `indices`, kept in their original order.
    ///
    /// # Panics
    ///
    /// Panics if an index is out of range.
    #[must_use]
    pub fn sub_summands(&self, indices: &[usize]) -> Self {
        let indices: BTreeSet<usize> = indices.iter().copied().collect();
        let summands = indices.iter().map(|&i| self.summands[i].clone()).collect();
        let transform = self
            .transform
            .submatrix_by(|i| indices.contains(&i), |_| true);
        Self {
            summands,
            basis: self.basis.clone(),
            transform,
        }
    }

    /// Coordinates of `z` in the summand generators. Torsion coordinates are
    /// reduced modulo their divisor; free coordinates are not.
    #[must_use]
    pub fn factorize(&self, z: &FreeModule<A, R>) -> Vec<R> {
        let v = self.transform.mul_vec(&z.coordinates(&self.basis));
        v.into_iter()
            .zip(&self.summands)
            .map(|(x, s)| if s.is_free() { x } else { x.rem(&s.divisor) })
            .collect()
    }

    /// Returns true if `z` vanishes in the module.
    #[must_use]
    pub fn element_is_zero(&self, z: &FreeModule<A, R>) -> bool {
        self.factorize(z).iter().all(|x| x.is_zero())
    }

    /// Returns true if `z1` and `z2` agree in the module.
    #[must_use]
    pub fn elements_are_equal(&self, z1: &FreeModule<A, R>, z2: &FreeModule<A, R>) -> bool {
        self.element_is_zero(&(z1 - z2))
    }

    fn to_record(&self) -> ModuleRecord<A, R> {
        ModuleRecord {
            summands: self.summands.clone(),
            basis: self.basis.clone(),
            transform: self.transform.clone(),
        }
    }

    fn from_record(record: ModuleRecord<A, R>) -> Result<Self> {
        let ModuleRecord {
            summands,
            basis,
            transform,
        } = record;

        if transform.num_rows() != summands.len() || transform.num_cols() != basis.len() {
            return Err(ModuleError::InconsistentRecord(format!(
                "transform is {}×{} but there are {} summands over {} basis elements",
                transform.num_rows(),
                transform.num_cols(),
                summands.len(),
                basis.len()
            )));
        }
        let known: BTreeSet<&A> = basis.iter().collect();
        if let Some(a) = summands
            .iter()
            .flat_map(|s| s.generator.iter().map(|(a, _)| a))
            .find(|a| !known.contains(a))
        {
            return Err(ModuleError::InconsistentRecord(format!(
                "generator uses {a:?}, which is not in the basis"
            )));
        }

        Ok(Self {
            summands,
            basis,
            transform,
        })
    }
}

impl<A, R> ModuleStructure<A, R>
where
    A: BasisElement + Serialize + DeserializeOwned,
    R: EuclideanDomain + Serialize + DeserializeOwned,
{
    /// Encodes the decomposition as JSON.
    ///
    /// # Errors
    ///
    /// [`ModuleError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_record())?)
    }

    /// Decodes a decomposition written by [`to_json`](Self::to_json).
    ///
    /// # Errors
    ///
    /// [`ModuleError::Json`] on malformed input and
    /// [`ModuleError::InconsistentRecord`] if the parts do not fit together.
    pub fn from_json(json: &str) -> Result<Self> {
        let record: ModuleRecord<A, R> = serde_json::from_str(json)?;
        Self::from_record(record)
    }
}

impl<R: EuclideanDomain> ModuleStructure<AbstractBasisElement, R> {
    /// The module `R^rank ⊕ R/t_1 ⊕ …` on an abstract basis, torsion first.
    ///
    /// # Panics
    ///
    /// Panics if a torsion coefficient is zero.
    #[must_use]
    pub fn from_invariants(rank: usize, torsions: Vec<R>) -> Self {
        assert!(
            torsions.iter().all(|t| !t.is_zero()),
            "torsion coefficients must be non-zero"
        );
        let n = torsions.len() + rank;
        let basis = AbstractBasisElement::basis(n);
        let summands = torsions
            .into_iter()
            .chain(std::iter::repeat_with(R::zero).take(rank))
            .zip(&basis)
            .map(|(d, &a)| Summand::new(FreeModule::from_basis(a), d))
            .collect();
        Self {
            summands,
            basis,
            transform: SparseMatrix::identity(n),
        }
    }

    /// The direct sum of two abstract modules.
    #[must_use]
    pub fn direct_sum(&self, other: &Self) -> Self {
        let mut torsions = self.torsion_coefficients();
        torsions.extend(other.torsion_coefficients());
        Self::from_invariants(self.rank() + other.rank(), torsions)
    }
}

impl<A: BasisElement, R: EuclideanDomain> PartialEq for ModuleStructure<A, R> {
    fn eq(&self, other: &Self) -> bool {
        self.summands == other.summands
    }
}

impl<A: BasisElement, R: EuclideanDomain> Eq for ModuleStructure<A, R> {}

impl<A: BasisElement, R: EuclideanDomain + fmt::Display> fmt::Display for ModuleStructure<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.summands.is_empty() {
            return write!(f, "0");
        }

        let mut parts: Vec<String> = Vec::new();
        let mut torsion: Vec<(R, usize)> = Vec::new();
        for d in self.torsion_coefficients() {
            match torsion.iter_mut().find(|(e, _)| *e == d) {
                Some((_, count)) => *count += 1,
                None => torsion.push((d, 1)),
            }
        }
        for (d, count) in torsion {
            parts.push(format!("{}/{}{}", R::symbol(), d, superscript(count)));
        }
        let rank = self.rank();
        if rank > 0 {
            parts.push(format!("{}{}", R::symbol(), superscript(rank)));
        }
        write!(f, "{}", parts.join("⊕"))
    }
}

/// Exponent suffix, empty for 1.
fn superscript(n: usize) -> String {
    const DIGITS: [char; 10] = ['⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];
    if n == 1 {
        return String::new();
    }
    n.to_string()
        .bytes()
        .map(|b| DIGITS[usize::from(b - b'0')])
        .collect()
}

/// Persisted form: `{summands, basis, transform}`.
#[derive(Serialize, Deserialize)]
#[serde(bound(
    serialize = "A: Serialize, R: EuclideanDomain + Serialize",
    deserialize = "A: BasisElement + DeserializeOwned, R: EuclideanDomain + DeserializeOwned"
))]
struct ModuleRecord<A, R> {
    summands: Vec<Summand<A, R>>,
    basis: Vec<A>,
    transform: SparseMatrix<R>,
}

impl<A, R> Serialize for ModuleStructure<A, R>
where
    A: BasisElement + Serialize,
    R: EuclideanDomain + Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_record().serialize(serializer)
    }
}

impl<'de, A, R> Deserialize<'de> for ModuleStructure<A, R>
where
    A: BasisElement + DeserializeOwned,
    R: EuclideanDomain + DeserializeOwned,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let record = ModuleRecord::deserialize(deserializer)?;
        Self::from_record(record).map_err(de::Error::custom)
    }
}
