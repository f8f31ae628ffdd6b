//! Root finders over exact decimals
//!
//! Bracketing methods ([`Bisection`], [`FalsePosition`]) and open methods
//! ([`Secant`], [`NewtonRaphson`], [`FixedPoint`]) behind one [`Finder`]
//! trait. Every run records its iterates and relative errors, and reports the
//! number of correct significant figures the last error implies.
//!
//! # Example
//!
//! ```
//! use math_trace_decimal::Precision;
//! use math_trace_roots::{Bisection, Finder, FinderConfig, Polynomial};
//!
//! let f = Polynomial::new(vec![-2.0, 0.0, 1.0]).shared();
//! let config = FinderConfig::default()
//!     .with_precision(Precision::new(12).unwrap())
//!     .with_tolerance(1e-6);
//! let estimate = Bisection::new(f, 0.0, 2.0, config).unwrap().find().unwrap();
//! assert!((estimate.root.to_f64() - 2f64.sqrt()).abs() < 1e-5);
//! ```

pub mod bracketing;
pub mod config;
pub mod error;
pub mod finder;
pub mod function;
pub mod open;
pub mod registry;
pub mod result;

pub use bracketing::{Bisection, FalsePosition};
pub use config::{RootMethod, RootParameters, RootProblem, create_finder};
pub use error::{EvalError, Result, RootError, RootFailureReason};
pub use finder::{
    DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE, DIVERGENCE_LIMIT, Finder, FinderConfig,
};
pub use function::{Polynomial, RealFunction, SharedFunction, decimal_fn, from_f64_fn};
pub use open::{FixedPoint, NewtonRaphson, Secant};
pub use registry::{FunctionRegistry, RegisteredFunction};
pub use result::{IterationRecord, RootEstimate, RootFailure, RootOutcome, RootReport};
