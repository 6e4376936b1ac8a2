//! # quotient-linalg
//!
//! Sparse matrix elimination over Euclidean domains.
//!
//! This crate provides:
//! - Sparse matrices with row or column alignment and O(1) transposition
//! - Row/column echelon, Hermite, diagonal and Smith normal forms
//! - A log of unimodular elementary operations from which the transforms
//!   `L`, `R` and their inverses are rebuilt on demand
//! - Kernel, image, determinant and inverse views of an elimination
//!
//! ## Example
//!
//! ```
//! use quotient_linalg::{MatrixForm, SparseMatrix};
//! use quotient_rings::Z;
//!
//! let a = SparseMatrix::from_rows(vec![
//!     vec![Z::new(2), Z::new(4)],
//!     vec![Z::new(6), Z::new(8)],
//! ]);
//! let smith = a.eliminate(MatrixForm::Smith);
//!
//! assert_eq!(smith.diagonal().unwrap(), &[Z::new(2), Z::new(4)]);
//! assert_eq!(&(smith.left() * &a) * smith.right(), *smith.result());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod eliminator;
pub mod error;
pub mod ops;
pub mod result;
pub mod sparse_matrix;

pub use eliminator::{EliminationConfig, MatrixForm};
pub use error::{LinalgError, Result};
pub use ops::{ElementaryOperation, OperationLog, Unit};
pub use result::EliminationResult;
pub use sparse_matrix::{Alignment, ParallelConfig, SparseMatrix};

#[cfg(test)]
mod tests;
