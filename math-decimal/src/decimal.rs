//! Base-10 scalar carrying its own working precision
//!
//! [`Decimal`] wraps a `dashu` decimal float. Every value remembers the number of
//! significant digits it was created with, and the result of `+`, `-` and `*`
//! is rounded (half away from zero) to the larger precision of the operands.
//! Values are only created through a [`Precision`](crate::Precision) context, so
//! a whole computation runs at one precision without any process-wide state.

use crate::error::{NumericError, Result};
use dashu::base::SquareRoot;
use dashu::float::DBig;
use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// Magnitude below which a value is treated as zero for pivots and divisors.
pub const NEAR_ZERO: f64 = 1e-12;

/// Exact decimal scalar with a fixed number of significant digits.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Decimal(pub(crate) DBig);

impl Decimal {
    /// Number of significant digits this value is rounded to.
    pub fn precision(&self) -> usize {
        self.0.precision()
    }

    /// Exactly zero
    pub fn is_zero(&self) -> bool {
        self.0 == DBig::ZERO
    }

    /// Strictly negative
    pub fn is_negative(&self) -> bool {
        self.0 < DBig::ZERO
    }

    /// Strictly positive
    pub fn is_positive(&self) -> bool {
        self.0 > DBig::ZERO
    }

    /// Magnitude |x|
    pub fn abs(&self) -> Decimal {
        if self.is_negative() {
            -self
        } else {
            self.clone()
        }
    }

    /// Check whether |x| is below [`NEAR_ZERO`].
    pub fn is_near_zero(&self) -> bool {
        self.to_f64().abs() < NEAR_ZERO
    }

    /// Nearest binary float. Used for logging, thresholds and plotting only.
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().value()
    }

    /// Division that only refuses an exactly zero divisor.
    ///
    /// For divisors already screened elsewhere, such as diagonals that are
    /// allowed to be tiny as long as they are not zero.
    ///
    /// # Errors
    /// `ZeroDivisor` when `rhs == 0`.
    pub fn div_exact_nonzero(&self, rhs: &Decimal) -> Result<Decimal> {
        if rhs.is_zero() {
            return Err(NumericError::ZeroDivisor);
        }
        Ok(rounded(&self.0 / &rhs.0, self, rhs))
    }

    /// Division that refuses near-zero divisors.
    ///
    /// # Errors
    /// `DivisionByZero` when `|rhs| < 1e-12`.
    pub fn checked_div(&self, rhs: &Decimal) -> Result<Decimal> {
        if rhs.is_near_zero() {
            return Err(NumericError::DivisionByZero {
                divisor: rhs.to_string(),
                threshold: NEAR_ZERO,
            });
        }
        Ok(rounded(&self.0 / &rhs.0, self, rhs))
    }

    /// Square root, rounded to this value's precision.
    ///
    /// # Errors
    /// `NegativeSqrt` when the value is below zero.
    pub fn sqrt(&self) -> Result<Decimal> {
        if self.is_negative() {
            return Err(NumericError::NegativeSqrt {
                value: self.to_string(),
            });
        }
        if self.is_zero() {
            return Ok(self.clone());
        }
        Ok(Decimal(self.0.sqrt().with_precision(self.precision()).value()))
    }

    /// Larger of two values
    pub fn max_of(&self, other: &Decimal) -> Decimal {
        if self >= other {
            self.clone()
        } else {
            other.clone()
        }
    }

    /// Plain positional rendering, without trailing zeros after the point.
    fn positional(&self) -> String {
        let repr = self.0.repr();
        let exponent = repr.exponent();
        let significand = repr.significand().to_string();
        let (sign, digits) = match significand.strip_prefix('-') {
            Some(rest) => ("-", rest.to_string()),
            None => ("", significand),
        };
        if digits == "0" {
            return "0".to_string();
        }

        let body = if exponent >= 0 {
            format!("{digits}{}", "0".repeat(exponent as usize))
        } else {
            let shift = exponent.unsigned_abs();
            if digits.len() > shift {
                let (int_part, frac_part) = digits.split_at(digits.len() - shift);
                format!("{int_part}.{frac_part}")
            } else {
                format!("0.{}{digits}", "0".repeat(shift - digits.len()))
            }
        };

        let body = if body.contains('.') {
            body.trim_end_matches('0').trim_end_matches('.').to_string()
        } else {
            body
        };
        format!("{sign}{body}")
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.positional())
    }
}

impl Serialize for Decimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl Neg for Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        Decimal(-self.0)
    }
}

impl Neg for &Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        Decimal(-self.0.clone())
    }
}

/// Round a raw dashu result to the larger precision of its operands.
fn rounded(raw: DBig, lhs: &Decimal, rhs: &Decimal) -> Decimal {
    let digits = lhs.precision().max(rhs.precision());
    Decimal(raw.with_precision(digits).value())
}

macro_rules! forward_binop {
    ($trait:ident, $method:ident, $op:tt) => {
        impl $trait<&Decimal> for &Decimal {
            type Output = Decimal;

            #[inline]
            fn $method(self, rhs: &Decimal) -> Decimal {
                rounded(&self.0 $op &rhs.0, &self, &rhs)
            }
        }

        impl $trait<Decimal> for Decimal {
            type Output = Decimal;

            #[inline]
            fn $method(self, rhs: Decimal) -> Decimal {
                rounded(&self.0 $op &rhs.0, &self, &rhs)
            }
        }

        impl $trait<&Decimal> for Decimal {
            type Output = Decimal;

            #[inline]
            fn $method(self, rhs: &Decimal) -> Decimal {
                rounded(&self.0 $op &rhs.0, &self, &rhs)
            }
        }

        impl $trait<Decimal> for &Decimal {
            type Output = Decimal;

            #[inline]
            fn $method(self, rhs: Decimal) -> Decimal {
                rounded(&self.0 $op &rhs.0, &self, &rhs)
            }
        }
    };
}

forward_binop!(Add, add, +);
forward_binop!(Sub, sub, -);
forward_binop!(Mul, mul, *);

impl AddAssign<&Decimal> for Decimal {
    fn add_assign(&mut self, rhs: &Decimal) {
        *self = rounded(&self.0 + &rhs.0, self, rhs);
    }
}

impl SubAssign<&Decimal> for Decimal {
    fn sub_assign(&mut self, rhs: &Decimal) {
        *self = rounded(&self.0 - &rhs.0, self, rhs);
    }
}
