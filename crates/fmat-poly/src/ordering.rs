//! Monomial orderings for polynomial operations.
//!
//! The choice of monomial ordering affects Gröbner basis computation.
//! Variables are ranked by index: `x0 > x1 > x2 > ...`.

use std::cmp::Ordering;
use std::str::FromStr;

use crate::monomial::{cmp_grevlex, cmp_grlex, cmp_lex, Monomial};

/// A monomial ordering.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum MonomialOrder {
    /// Lexicographic order.
    ///
    /// `x^a y^b > x^d y^e` iff the first nonzero difference
    /// `(a-d, b-e)` is positive.
    Lex,

    /// Graded lexicographic order.
    ///
    /// First compares total degree, then uses lex as tiebreaker.
    Grlex,

    /// Graded reverse lexicographic order.
    ///
    /// First compares total degree, then uses reverse lex (last variable
    /// first) with the comparison reversed.
    #[default]
    Grevlex,
}

impl MonomialOrder {
    /// Compares two monomials according to this ordering.
    #[must_use]
    pub fn compare(&self, a: &Monomial, b: &Monomial) -> Ordering {
        match self {
            MonomialOrder::Lex => cmp_lex(a, b),
            MonomialOrder::Grlex => cmp_grlex(a, b),
            MonomialOrder::Grevlex => cmp_grevlex(a, b),
        }
    }

    /// Returns a short name for the ordering.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            MonomialOrder::Lex => "lex",
            MonomialOrder::Grlex => "grlex",
            MonomialOrder::Grevlex => "grevlex",
        }
    }
}

impl std::fmt::Display for MonomialOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Error returned when parsing an unknown ordering name.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown monomial order: {0:?}")]
pub struct ParseOrderError(pub String);

impl FromStr for MonomialOrder {
    type Err = ParseOrderError;

    /// Accepts the short names plus the `deglex`/`degrevlex` spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lex" => Ok(MonomialOrder::Lex),
            "grlex" | "deglex" => Ok(MonomialOrder::Grlex),
            "grevlex" | "degrevlex" => Ok(MonomialOrder::Grevlex),
            other => Err(ParseOrderError(other.to_string())),
        }
    }
}
