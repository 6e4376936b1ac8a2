//! # quotient-module
//!
//! Structure of finitely presented modules over Euclidean domains.
//!
//! This crate provides:
//! - Free modules over arbitrary basis elements (`FreeModule`)
//! - The invariant factor decomposition of a presented module
//!   (`ModuleStructure`) computed from the Smith form of its relations
//! - Coordinates of elements in the decomposed module (`factorize`)
//! - A JSON record of a decomposition that can be stored and reloaded
//!
//! ## Example
//!
//! ```
//! use quotient_linalg::SparseMatrix;
//! use quotient_module::{AbstractBasisElement, ModuleStructure};
//! use quotient_rings::Z;
//!
//! // Z³ modulo the relations e0 = 0 and 2·e1 = 0.
//! let relations = SparseMatrix::from_grid(3, 2, [1, 0, 0, 2, 0, 0].map(Z::new).to_vec());
//! let m = ModuleStructure::from_relations(AbstractBasisElement::basis(3), &relations);
//!
//! assert_eq!(m.to_string(), "Z/2⊕Z");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod free_module;
pub mod structure;

#[cfg(test)]
mod proptests;

pub use error::{ModuleError, Result};
pub use free_module::{columns_as_elements, AbstractBasisElement, BasisElement, FreeModule};
pub use structure::{ModuleStructure, Summand};
