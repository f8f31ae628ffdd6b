//! Error types for decimal arithmetic.
//!
//! Arithmetic on [`Decimal`](crate::Decimal) never produces infinities or NaNs:
//! every operation that could is checked and reports one of these variants.

use thiserror::Error;

/// Errors that can occur while building or operating on decimal values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NumericError {
    /// Divisor magnitude is below the near-zero threshold.
    #[error("division by zero: divisor {divisor} is below {threshold:e} in magnitude")]
    DivisionByZero {
        /// The offending divisor, rendered as a decimal string
        divisor: String,
        /// The absolute threshold that was applied
        threshold: f64,
    },

    /// Divisor is exactly zero.
    #[error("division by exact zero")]
    ZeroDivisor,

    /// Square root of a negative value.
    #[error("square root of negative value {value}")]
    NegativeSqrt {
        /// The negative radicand
        value: String,
    },

    /// A binary float that cannot be represented (NaN or infinite).
    #[error("non-finite value: {value}")]
    NonFinite {
        /// The rejected float
        value: f64,
    },

    /// A string that does not parse as a decimal number.
    #[error("cannot parse '{input}' as a decimal: {reason}")]
    Parse {
        /// The rejected input
        input: String,
        /// Parser diagnostic
        reason: String,
    },

    /// Requested number of significant digits is out of range.
    #[error("invalid precision: {digits} (must be in 1..={max})")]
    InvalidPrecision {
        /// The rejected digit count
        digits: usize,
        /// The largest accepted digit count
        max: usize,
    },
}

/// A specialized `Result` type for decimal operations.
pub type Result<T> = std::result::Result<T, NumericError>;

impl NumericError {
    /// Returns `true` if this error comes from a zero or near-zero divisor.
    pub fn is_division_by_zero(&self) -> bool {
        matches!(
            self,
            NumericError::DivisionByZero { .. } | NumericError::ZeroDivisor
        )
    }

    /// Returns `true` if this error comes from converting external input.
    ///
    /// This includes `NonFinite` and `Parse`.
    pub fn is_conversion_error(&self) -> bool {
        matches!(
            self,
            NumericError::NonFinite { .. } | NumericError::Parse { .. }
        )
    }
}
