//! # fmat-poly
//!
//! Sparse multivariate polynomials over an exact coefficient ring.
//!
//! This crate provides:
//! - [`Var`] and sparse [`Monomial`]s that only store occurring variables
//! - [`MonomialOrder`] comparisons (lex, grlex, grevlex)
//! - Canonical [`SparsePoly`]s usable as set keys
//!
//! Pentagon and hexagon equations touch a few of many declared variables,
//! so nothing here is sized by the total variable count.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod monomial;
pub mod ordering;
pub mod sparse;

#[cfg(test)]
mod proptests;

pub use monomial::{Monomial, Var};
pub use ordering::{MonomialOrder, ParseOrderError};
pub use sparse::SparsePoly;
