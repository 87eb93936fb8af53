//! The field of rational numbers Q.

use dashu::base::{Abs, Inverse, Signed as DashuSigned};
use dashu::integer::{IBig, UBig};
use dashu::rational::RBig;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::traits::{Field, Ring};

/// An arbitrary precision rational number.
///
/// Rationals are always stored in lowest terms with a positive denominator,
/// so structural equality is numeric equality.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Q(RBig);

impl Q {
    /// Creates a new rational from numerator and denominator.
    ///
    /// # Panics
    ///
    /// Panics if the denominator is zero.
    #[must_use]
    pub fn new(num: i64, den: i64) -> Self {
        assert!(den != 0, "denominator cannot be zero");
        let sign = if den < 0 { -1 } else { 1 };
        Self(RBig::from_parts(
            IBig::from(num) * IBig::from(sign),
            UBig::from(den.unsigned_abs()),
        ))
    }

    /// Creates a rational from an integer.
    #[must_use]
    pub fn from_integer(n: i64) -> Self {
        Self(RBig::from(IBig::from(n)))
    }

    /// Returns true if the denominator is 1.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        self.0.denominator().is_one()
    }

    /// Returns the reciprocal (1/x).
    ///
    /// # Panics
    ///
    /// Panics if the rational is zero.
    #[must_use]
    pub fn recip(&self) -> Self {
        assert!(!self.0.is_zero(), "cannot take reciprocal of zero");
        Self(self.0.clone().inv())
    }

    /// Returns the absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self(self.0.clone().abs())
    }

    /// Returns the sign: -1, 0, or 1.
    #[must_use]
    pub fn signum(&self) -> i8 {
        if self.0.is_zero() {
            0
        } else if DashuSigned::is_positive(&self.0) {
            1
        } else {
            -1
        }
    }

    /// Returns the nearest `f64`.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().value()
    }

    /// Returns a reference to the inner `dashu::RBig`.
    #[must_use]
    pub fn as_inner(&self) -> &RBig {
        &self.0
    }
}

impl Ring for Q {
    fn zero() -> Self {
        Self(RBig::ZERO)
    }

    fn one() -> Self {
        Self(RBig::ONE)
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    fn is_one(&self) -> bool {
        self.0 == RBig::ONE
    }

    fn pow(&self, n: u32) -> Self {
        Self(self.0.pow(n as usize))
    }
}

impl Field for Q {
    fn inv(&self) -> Option<Self> {
        if self.0.is_zero() {
            None
        } else {
            Some(Self(self.0.clone().inv()))
        }
    }
}

impl num_traits::Zero for Q {
    fn zero() -> Self {
        <Self as Ring>::zero()
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl num_traits::One for Q {
    fn one() -> Self {
        <Self as Ring>::one()
    }
}

impl Add for Q {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Add for &Q {
    type Output = Q;

    fn add(self, rhs: Self) -> Self::Output {
        Q(&self.0 + &rhs.0)
    }
}

impl Sub for Q {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Sub for &Q {
    type Output = Q;

    fn sub(self, rhs: Self) -> Self::Output {
        Q(&self.0 - &rhs.0)
    }
}

impl Mul for Q {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self(self.0 * rhs.0)
    }
}

impl Mul for &Q {
    type Output = Q;

    fn mul(self, rhs: Self) -> Self::Output {
        Q(&self.0 * &rhs.0)
    }
}

impl Div for Q {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Self(self.0 / rhs.0)
    }
}

impl Div for &Q {
    type Output = Q;

    fn div(self, rhs: Self) -> Self::Output {
        Q(&self.0 / &rhs.0)
    }
}

impl Neg for Q {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Neg for &Q {
    type Output = Q;

    fn neg(self) -> Self::Output {
        Q(-&self.0)
    }
}

impl From<i64> for Q {
    fn from(value: i64) -> Self {
        Self::from_integer(value)
    }
}

impl From<RBig> for Q {
    fn from(value: RBig) -> Self {
        Self(value)
    }
}

impl fmt::Debug for Q {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q({})", self.0)
    }
}

impl fmt::Display for Q {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.0.numerator())
        } else {
            write!(f, "{}/{}", self.0.numerator(), self.0.denominator())
        }
    }
}
