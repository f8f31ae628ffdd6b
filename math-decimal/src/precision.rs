//! Precision context
//!
//! A [`Precision`] is the only way to create [`Decimal`] values. It is a small
//! `Copy` value passed explicitly into every solver and finder, so independent
//! computations at different precisions can run side by side on any thread.

use crate::decimal::Decimal;
use crate::error::{NumericError, Result};
use dashu::float::DBig;
use dashu::integer::IBig;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Default number of significant digits.
pub const DEFAULT_DIGITS: usize = 10;

/// Largest accepted number of significant digits.
pub const MAX_DIGITS: usize = 1000;

/// Number of significant digits used for a computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct Precision {
    digits: usize,
}

impl Default for Precision {
    fn default() -> Self {
        Self {
            digits: DEFAULT_DIGITS,
        }
    }
}

impl TryFrom<usize> for Precision {
    type Error = NumericError;

    fn try_from(digits: usize) -> Result<Self> {
        Self::new(digits)
    }
}

impl From<Precision> for usize {
    fn from(p: Precision) -> usize {
        p.digits
    }
}

impl Precision {
    /// Create a context with `digits` significant digits.
    ///
    /// # Errors
    /// `InvalidPrecision` unless `1 <= digits <= MAX_DIGITS`.
    pub fn new(digits: usize) -> Result<Self> {
        if digits == 0 || digits > MAX_DIGITS {
            return Err(NumericError::InvalidPrecision {
                digits,
                max: MAX_DIGITS,
            });
        }
        Ok(Self { digits })
    }

    /// Number of significant digits
    pub fn digits(&self) -> usize {
        self.digits
    }

    pub fn zero(&self) -> Decimal {
        self.round_raw(DBig::ZERO)
    }

    pub fn one(&self) -> Decimal {
        self.round_raw(DBig::ONE)
    }

    pub fn from_i64(&self, value: i64) -> Decimal {
        self.round_raw(DBig::from(IBig::from(value)))
    }

    /// Convert a binary float through its shortest round-trip decimal form,
    /// so `2.099_f64` becomes exactly `2.099`.
    ///
    /// # Errors
    /// `NonFinite` for NaN and infinities.
    pub fn from_f64(&self, value: f64) -> Result<Decimal> {
        if !value.is_finite() {
            return Err(NumericError::NonFinite { value });
        }
        // f64's Display never switches to exponent notation
        self.parse(&value.to_string())
    }

    /// Parse a decimal literal such as `"-2.099"` and round it.
    ///
    /// # Errors
    /// `Parse` if the string is not a number.
    pub fn parse(&self, text: &str) -> Result<Decimal> {
        let trimmed = text.trim();
        let raw = DBig::from_str(trimmed).map_err(|e| NumericError::Parse {
            input: trimmed.to_string(),
            reason: e.to_string(),
        })?;
        Ok(self.round_raw(raw))
    }

    /// Re-round an existing value to this context.
    pub fn round(&self, value: &Decimal) -> Decimal {
        self.round_raw(value.0.clone())
    }

    fn round_raw(&self, raw: DBig) -> Decimal {
        Decimal(raw.with_precision(self.digits).value())
    }

    /// Relative change below which an iteration is stable at this precision:
    /// `0.5 * 10^(-digits)`.
    pub fn convergence_threshold(&self) -> Decimal {
        let literal = format!("0.{}5", "0".repeat(self.digits));
        let raw = DBig::from_str(&literal).unwrap_or(DBig::ZERO);
        self.round_raw(raw)
    }

    /// Estimate of correct significant figures for a relative error `ε`
    /// (a fraction, not a percentage): `floor(2 - log10(200 ε))`, clamped to
    /// `0..=digits`.
    pub fn significant_figures(&self, relative_error: &Decimal) -> usize {
        let eps = relative_error.abs().to_f64();
        if eps == 0.0 {
            return self.digits;
        }
        if !eps.is_finite() {
            return 0;
        }
        let m = 2.0 - (200.0 * eps).log10();
        if m <= 0.0 {
            0
        } else {
            (m.floor() as usize).min(self.digits)
        }
    }
}
