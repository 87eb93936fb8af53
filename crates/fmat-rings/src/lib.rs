//! # fmat-rings
//!
//! Coefficient arithmetic for the fmat workspace.
//!
//! This crate provides:
//! - Abstract traits: `Ring`, `Field`
//! - The field of rational numbers `Q`, backed by `dashu` big rationals
//!
//! F-symbol equations are generated and reduced over `Q`; the numeric
//! verification pass converts coefficients to `f64` through [`Q::to_f64`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod rational;
pub mod traits;

#[cfg(test)]
mod proptests;

pub use rational::Q;
pub use traits::{Field, Ring};
