//! # quotient-rings
//!
//! The scalar rings the elimination engine runs over.
//!
//! This crate provides:
//! - Abstract traits: `Ring`, `EuclideanDomain`, `Field`
//! - Concrete implementations: Z, Q, Z_p
//! - Polynomial rings F[x] over a field
//!
//! ## Trait Hierarchy
//!
//! ```text
//! Ring
//!  └── EuclideanDomain
//!       └── Field
//! ```
//!
//! The elimination engine only ever asks a scalar for its Euclidean degree,
//! division with remainder and whether it is a unit, so any type satisfying
//! `EuclideanDomain` can be reduced to Smith normal form.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod finite_field;
pub mod integers;
pub mod poly_ring;
pub mod rationals;
pub mod traits;

pub use finite_field::{FiniteField, GF2};
pub use integers::Z;
pub use poly_ring::Polynomial;
pub use rationals::Q;
pub use traits::{EuclideanDomain, Field, Ring};
