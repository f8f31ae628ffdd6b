//! Error types for linear system solvers.
//!
//! Two families are kept apart:
//! - [`SolverError`]: the caller handed over something malformed (wrong shape,
//!   conflicting options). These are raised when a solver is constructed.
//! - [`FailureReason`]: the system itself cannot be solved by the chosen method
//!   (singular pivot, not positive definite, ...). These are never raised; they
//!   come back inside the [`Failure`](crate::result::Failure) of a solve.

use math_trace_decimal::NumericError;
use thiserror::Error;

/// Errors raised while validating solver inputs and options.
#[derive(Debug, Error)]
pub enum SolverError {
    /// Coefficient matrix is not square.
    #[error("number of equations ({rows}) must equal number of variables ({cols})")]
    NotSquare {
        /// Row count
        rows: usize,
        /// Column count
        cols: usize,
    },

    /// Right-hand side length does not match the matrix.
    #[error("dimension mismatch: expected {expected} constants, got {got}")]
    DimensionMismatch {
        /// Matrix dimension
        expected: usize,
        /// Length of the right-hand side
        got: usize,
    },

    /// A system with no equations.
    #[error("system must contain at least one equation")]
    Empty,

    /// Initial guess length does not match the number of variables.
    #[error("initial guess length must match number of variables ({expected}), got {got}")]
    InitialGuessMismatch {
        /// Number of variables
        expected: usize,
        /// Length of the supplied guess
        got: usize,
    },

    /// Both stopping criteria were supplied to an iterative method.
    #[error("can't specify both number_of_iterations and absolute_relative_error")]
    ConflictingStoppingCriteria,

    /// Tolerance must be strictly positive.
    #[error("absolute relative error must be positive, got {value}")]
    InvalidTolerance {
        /// The rejected tolerance
        value: String,
    },

    /// Iteration counts must be at least one.
    #[error("number of iterations must be at least 1")]
    InvalidIterationCount,

    /// LU format string not recognised.
    #[error("unknown LU decomposition format: {0}")]
    UnknownLuFormat(String),

    /// Method name not recognised by the factory.
    #[error("unknown method: {0}")]
    UnknownMethod(String),

    /// Problem file could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// Converting an input value failed.
    #[error(transparent)]
    Numeric(#[from] NumericError),
}

/// A specialized `Result` type for solver construction.
pub type Result<T> = std::result::Result<T, SolverError>;

impl SolverError {
    /// Returns `true` if this is a shape-related error.
    ///
    /// This includes `NotSquare`, `DimensionMismatch`, `Empty` and
    /// `InitialGuessMismatch`.
    pub fn is_dimension_error(&self) -> bool {
        matches!(
            self,
            SolverError::NotSquare { .. }
                | SolverError::DimensionMismatch { .. }
                | SolverError::Empty
                | SolverError::InitialGuessMismatch { .. }
        )
    }

    /// Returns `true` if this is an option/configuration error.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            SolverError::ConflictingStoppingCriteria
                | SolverError::InvalidTolerance { .. }
                | SolverError::InvalidIterationCount
                | SolverError::UnknownLuFormat(_)
                | SolverError::UnknownMethod(_)
                | SolverError::Config(_)
        )
    }
}

/// Why a well-formed system could not be solved by the chosen method.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FailureReason {
    /// A pivot (or U/L diagonal) vanished.
    #[error("System doesn't have a unique solution.")]
    NoUniqueSolution {
        /// Zero-based row where the pivot vanished
        row: usize,
    },

    /// Cholesky requires a symmetric matrix.
    #[error("Coefficients matrix is not symmetric.")]
    NotSymmetric,

    /// Cholesky radicand was not positive, or below the near-zero threshold.
    #[error("Coefficients matrix is not positive definite.")]
    NotPositiveDefinite {
        /// Zero-based row of the failing diagonal
        row: usize,
    },

    /// Iterative methods divide by every diagonal entry.
    #[error(
        "Can't use iterative methods: zero diagonal elements found in equations {equations:?}. Reorder your equations to avoid zero diagonal elements."
    )]
    ZeroDiagonal {
        /// One-based equation numbers with a zero diagonal
        equations: Vec<usize>,
    },

    /// Arithmetic failed mid-solve (near-zero divisor, negative root).
    #[error("Arithmetic failure: {0}")]
    Arithmetic(#[from] NumericError),
}
