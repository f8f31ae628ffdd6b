//! Error types for root finders.
//!
//! - [`RootError`]: invalid finder inputs, raised at construction.
//! - [`EvalError`]: a user function could not be evaluated at some point.
//! - [`RootFailureReason`]: the method could not continue; reported through
//!   the [`RootFailure`](crate::result::RootFailure) of a run, never raised.

use math_trace_decimal::NumericError;
use thiserror::Error;

/// Errors raised while validating finder inputs and options.
#[derive(Debug, Error)]
pub enum RootError {
    /// Bracket bounds are not ordered.
    #[error("lower bound ({lower}) must be less than upper bound ({upper})")]
    InvalidInterval {
        /// Lower bound as given
        lower: String,
        /// Upper bound as given
        upper: String,
    },

    /// Tolerance must be strictly positive.
    #[error("absolute relative error must be positive, got {value}")]
    InvalidTolerance {
        /// The rejected tolerance
        value: String,
    },

    /// Iteration cap must be at least one.
    #[error("maximum number of iterations must be at least 1")]
    InvalidIterationCount,

    /// Newton-Raphson multiplicity must be at least one.
    #[error("multiplicity must be at least 1, got {0}")]
    InvalidMultiplicity(u32),

    /// Function name not found in the registry.
    #[error("unknown function: {0}")]
    UnknownFunction(String),

    /// Method name not recognised by the factory.
    #[error("unknown method: {0}")]
    UnknownMethod(String),

    /// Problem file or parameters are unusable.
    #[error("configuration error: {0}")]
    Config(String),

    /// Converting an input value failed.
    #[error(transparent)]
    Numeric(#[from] NumericError),
}

/// A specialized `Result` type for finder construction.
pub type Result<T> = std::result::Result<T, RootError>;

impl RootError {
    /// Returns `true` if a numeric option (bounds, tolerance, iteration cap,
    /// multiplicity) was rejected.
    pub fn is_parameter_error(&self) -> bool {
        matches!(
            self,
            RootError::InvalidInterval { .. }
                | RootError::InvalidTolerance { .. }
                | RootError::InvalidIterationCount
                | RootError::InvalidMultiplicity(_)
        )
    }

    /// Returns `true` if a name or problem file could not be resolved.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            RootError::UnknownFunction(_) | RootError::UnknownMethod(_) | RootError::Config(_)
        )
    }
}

/// A user function could not produce a value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// The function is undefined or infinite at `x`.
    #[error("function is not finite at x = {x}")]
    NonFinite {
        /// The evaluation point
        x: String,
    },

    /// Decimal arithmetic inside the function failed.
    #[error(transparent)]
    Numeric(#[from] NumericError),
}

/// Why a finder stopped without an estimate it can vouch for.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RootFailureReason {
    /// `f(xl)` and `f(xu)` have the same sign.
    #[error("f(xl) and f(xu) must have different signs")]
    InvalidBracket,

    /// False-position chord is horizontal.
    #[error("f(xl) and f(xu) cannot be equal")]
    EqualFunctionValues,

    /// Newton-Raphson derivative vanished.
    #[error("Derivative too close to zero")]
    ZeroDerivative,

    /// Secant denominator `f(x_i) - f(x_{i-1})` vanished.
    #[error("Division by zero encountered, f(x_i) is too close to f(x_(i-1))")]
    VanishingSecantDenominator,

    /// Estimate grew past the divergence limit.
    #[error("Divergence detected, values are growing too large")]
    Diverged,

    /// The user function failed.
    #[error("Error evaluating function: {0}")]
    Evaluation(#[from] EvalError),
}

impl From<NumericError> for RootFailureReason {
    fn from(err: NumericError) -> Self {
        RootFailureReason::Evaluation(EvalError::Numeric(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RootError::InvalidInterval {
            lower: "2".to_string(),
            upper: "1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "lower bound (2) must be less than upper bound (1)"
        );
        assert_eq!(
            RootFailureReason::ZeroDerivative.to_string(),
            "Derivative too close to zero"
        );
    }

    #[test]
    fn test_error_categories() {
        assert!(RootError::InvalidMultiplicity(0).is_parameter_error());
        assert!(!RootError::InvalidMultiplicity(0).is_config_error());
        assert!(RootError::UnknownFunction("foo".to_string()).is_config_error());
    }

    #[test]
    fn test_numeric_error_becomes_evaluation_failure() {
        let reason: RootFailureReason = NumericError::NonFinite { value: f64::NAN }.into();
        assert!(matches!(
            reason,
            RootFailureReason::Evaluation(EvalError::Numeric(_))
        ));
    }
}
