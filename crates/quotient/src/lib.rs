//! # Quotient
//!
//! Exact matrix elimination and module structure computations over
//! Euclidean domains.
//!
//! A matrix over `Z`, `Q`, a prime field or `F[x]` is reduced to echelon,
//! Hermite, diagonal or Smith normal form while every elementary operation
//! is recorded, so the unimodular transforms `L`, `R` with `L·A·R = B` and
//! their inverses are available exactly. The Smith form in turn yields the
//! invariant factor decomposition of a finitely presented module.
//!
//! ## Quick Start
//!
//! ```rust
//! use quotient::prelude::*;
//!
//! let a = SparseMatrix::from_rows(vec![
//!     vec![Z::new(2), Z::new(4), Z::new(4)],
//!     vec![Z::new(-6), Z::new(6), Z::new(12)],
//!     vec![Z::new(10), Z::new(-4), Z::new(-16)],
//! ]);
//! let smith = a.eliminate(MatrixForm::Smith);
//! assert_eq!(smith.diagonal().unwrap(), &[Z::new(2), Z::new(6), Z::new(12)]);
//!
//! let m = ModuleStructure::from_relations(AbstractBasisElement::basis(3), &a);
//! assert_eq!(m.to_string(), "Z/2⊕Z/6⊕Z/12");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub use quotient_integers as integers;
pub use quotient_linalg as linalg;
pub use quotient_module as module;
pub use quotient_rings as rings;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use quotient_integers::{Integer, ModInt, Rational};
    pub use quotient_linalg::{
        EliminationConfig, EliminationResult, ElementaryOperation, MatrixForm, ParallelConfig,
        SparseMatrix,
    };
    pub use quotient_module::{AbstractBasisElement, FreeModule, ModuleStructure, Summand};
    pub use quotient_rings::{EuclideanDomain, Field, FiniteField, Polynomial, Ring, Q, Z, GF2};
}
