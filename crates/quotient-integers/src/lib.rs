//! # quotient-integers
//!
//! Exact scalar arithmetic backing the rings of `quotient`.
//!
//! This crate wraps `dashu` to provide:
//! - Arbitrary precision integers (`Integer`)
//! - Arbitrary precision rationals (`Rational`)
//! - Integers modulo a compile-time prime (`ModInt`)
//!
//! Every type has a lossless serde encoding, which the persisted module
//! decompositions rely on.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod integer;
pub mod modular;
pub mod rational;

#[cfg(test)]
mod proptests;

pub use integer::Integer;
pub use modular::ModInt;
pub use rational::Rational;
