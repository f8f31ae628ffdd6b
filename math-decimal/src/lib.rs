//! Exact base-10 scalars for step-by-step numerical methods
//!
//! Solvers in this workspace show every intermediate matrix to the user, so the
//! numbers they display must be what a hand calculation at the chosen number of
//! significant digits would give, not binary floating-point artifacts.
//!
//! # Example
//!
//! ```
//! use math_trace_decimal::Precision;
//!
//! let ctx = Precision::new(4).unwrap();
//! let third = ctx.one().checked_div(&ctx.from_i64(3)).unwrap();
//! assert_eq!(third.to_string(), "0.3333");
//! ```

pub mod decimal;
pub mod error;
pub mod precision;

pub use decimal::{Decimal, NEAR_ZERO};
pub use error::{NumericError, Result};
pub use precision::{DEFAULT_DIGITS, MAX_DIGITS, Precision};
