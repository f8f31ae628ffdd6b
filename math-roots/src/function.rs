//! Real functions evaluated in decimal arithmetic
//!
//! Finders only see [`RealFunction`]. Any `Fn(&Decimal) -> Result<Decimal, EvalError>`
//! closure qualifies; [`from_f64_fn`] lifts ordinary float functions such as
//! `f64::cos`, and [`Polynomial`] evaluates exactly with Horner's scheme.

use crate::error::EvalError;
use math_trace_decimal::{Decimal, Precision};
use std::sync::Arc;

/// A real-to-real function a finder can evaluate.
pub trait RealFunction: Send + Sync {
    /// Value at `x`, at the precision of `x`.
    fn eval(&self, x: &Decimal) -> Result<Decimal, EvalError>;
}

impl<F> RealFunction for F
where
    F: Fn(&Decimal) -> Result<Decimal, EvalError> + Send + Sync,
{
    fn eval(&self, x: &Decimal) -> Result<Decimal, EvalError> {
        self(x)
    }
}

/// Shared handle to a function; finders clone it freely.
pub type SharedFunction = Arc<dyn RealFunction>;

/// Context matching the precision `x` was rounded to.
pub(crate) fn precision_of(x: &Decimal) -> Precision {
    Precision::new(x.precision()).unwrap_or_default()
}

/// Wrap a decimal closure.
pub fn decimal_fn<F>(f: F) -> SharedFunction
where
    F: Fn(&Decimal) -> Result<Decimal, EvalError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Lift a binary-float function.
///
/// The argument goes through `f64` and the result is rounded back to the
/// argument's precision; NaN or infinite results become
/// [`EvalError::NonFinite`].
pub fn from_f64_fn<F>(f: F) -> SharedFunction
where
    F: Fn(f64) -> f64 + Send + Sync + 'static,
{
    decimal_fn(move |x: &Decimal| {
        let y = f(x.to_f64());
        if !y.is_finite() {
            return Err(EvalError::NonFinite { x: x.to_string() });
        }
        Ok(precision_of(x).from_f64(y)?)
    })
}

/// Polynomial `c0 + c1 x + c2 x^2 + ...`, evaluated without leaving decimals.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    coefficients: Vec<f64>,
}

impl Polynomial {
    /// Coefficients in ascending order of degree.
    pub fn new(coefficients: Vec<f64>) -> Self {
        Self { coefficients }
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    pub fn derivative(&self) -> Polynomial {
        let coefficients = self
            .coefficients
            .iter()
            .enumerate()
            .skip(1)
            .map(|(k, c)| c * k as f64)
            .collect();
        Polynomial { coefficients }
    }

    pub fn shared(self) -> SharedFunction {
        Arc::new(self)
    }
}

impl RealFunction for Polynomial {
    fn eval(&self, x: &Decimal) -> Result<Decimal, EvalError> {
        let ctx = precision_of(x);
        let mut acc = ctx.zero();
        for c in self.coefficients.iter().rev() {
            acc = &acc * x + ctx.from_f64(*c)?;
        }
        Ok(acc)
    }
}
