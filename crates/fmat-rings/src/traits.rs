//! Algebraic structure traits.
//!
//! Polynomials in this workspace are generic over a coefficient ring; the
//! Gröbner machinery additionally needs multiplicative inverses.

use std::fmt::Debug;
use std::hash::Hash;
use std::ops::{Add, Mul, Neg, Sub};

/// A commutative ring with identity.
///
/// # Laws
///
/// - Addition is associative and commutative with identity `zero()`
/// - Multiplication is associative and commutative with identity `one()`
/// - Multiplication distributes over addition
/// - Every element has an additive inverse (`neg`)
///
/// Coefficients take part in canonical equation keys, so the ring must be
/// totally ordered and hashable (the order need not be compatible with the
/// arithmetic).
pub trait Ring:
    Clone
    + Eq
    + Ord
    + Hash
    + Debug
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
{
    /// The additive identity.
    fn zero() -> Self;

    /// The multiplicative identity.
    fn one() -> Self;

    /// Returns true if this is the additive identity.
    fn is_zero(&self) -> bool;

    /// Returns true if this is the multiplicative identity.
    fn is_one(&self) -> bool;

    /// Computes self^n by repeated squaring.
    fn pow(&self, n: u32) -> Self {
        if n == 0 {
            return Self::one();
        }

        let mut result = Self::one();
        let mut base = self.clone();
        let mut exp = n;

        while exp > 0 {
            if exp & 1 == 1 {
                result = result * base.clone();
            }
            exp >>= 1;
            if exp > 0 {
                base = base.clone() * base;
            }
        }

        result
    }
}

/// A field is a ring where every non-zero element has a multiplicative inverse.
pub trait Field: Ring {
    /// Computes the multiplicative inverse.
    ///
    /// Returns `None` if the element is zero.
    fn inv(&self) -> Option<Self>;

    /// Divides by another element.
    ///
    /// # Panics
    ///
    /// Panics if `other` is zero.
    fn field_div(&self, other: &Self) -> Self {
        self.clone() * other.inv().expect("division by zero")
    }
}
