//! Gröbner bases for F-symbol systems.
//!
//! This crate provides:
//! - Buchberger's algorithm with product and chain criteria
//! - Sugar-degree batch selection
//! - Parallel S-polynomial reduction via rayon
//! - A [`GroebnerSolver`] trait so callers can swap back ends

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod buchberger;
pub mod criteria;
pub mod monomial;
pub mod pair;
pub mod poly;
pub mod solver;

#[cfg(test)]
mod proptests;

pub use buchberger::{groebner_basis, Buchberger, GroebnerConfig};
pub use monomial::PackedMonomial;
pub use poly::GroebnerPoly;
pub use solver::{BuchbergerSolver, GroebnerSolver};
