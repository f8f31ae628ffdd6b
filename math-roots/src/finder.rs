//! Finder trait, shared options and the bookkeeping common to every method

use crate::error::{Result, RootError, RootFailureReason};
use crate::result::{IterationRecord, RootEstimate, RootFailure, RootOutcome};
use math_trace_decimal::{Decimal, Precision};
use std::time::Instant;

/// Default tolerance on the absolute relative error.
pub const DEFAULT_TOLERANCE: f64 = 1e-5;

/// Default iteration cap.
pub const DEFAULT_MAX_ITERATIONS: usize = 50;

/// Open-method estimates beyond this magnitude count as diverged.
pub const DIVERGENCE_LIMIT: f64 = 1e100;

/// A configured root finder for one function.
///
/// Construction validates the options; [`find`](Finder::find) never panics.
/// Methods that cannot continue return the `Err` side of the outcome.
pub trait Finder: Send + Sync {
    /// Human-readable method name
    fn name(&self) -> &'static str;

    /// Run the method to completion.
    fn find(&self) -> RootOutcome;
}

impl<F: Finder + ?Sized> Finder for Box<F> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn find(&self) -> RootOutcome {
        (**self).find()
    }
}

/// Options shared by every finder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinderConfig {
    pub precision: Precision,
    /// Stop once the absolute relative error falls below this
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            precision: Precision::default(),
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl FinderConfig {
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Check the options and return the tolerance as a decimal.
    pub(crate) fn validate(&self) -> Result<Decimal> {
        if self.tolerance.is_nan() || self.tolerance <= 0.0 {
            return Err(RootError::InvalidTolerance {
                value: self.tolerance.to_string(),
            });
        }
        if self.max_iterations == 0 {
            return Err(RootError::InvalidIterationCount);
        }
        Ok(self.precision.from_f64(self.tolerance)?)
    }
}

/// `|new - old| / |new|`, or `|new - old|` when `new` is (near) zero.
pub(crate) fn relative_change(new: &Decimal, old: &Decimal) -> Decimal {
    let diff = new - old;
    match diff.checked_div(new) {
        Ok(ratio) => ratio.abs(),
        Err(_) => diff.abs(),
    }
}

pub(crate) fn is_diverged(x: &Decimal) -> bool {
    x.abs().to_f64() > DIVERGENCE_LIMIT
}

/// Trace and timing of one run, turned into the final outcome.
pub(crate) struct Run<'a> {
    method: &'static str,
    ctx: Precision,
    tolerance: &'a Decimal,
    started: Instant,
    trace: Vec<IterationRecord>,
}

impl<'a> Run<'a> {
    pub(crate) fn start(method: &'static str, ctx: Precision, tolerance: &'a Decimal) -> Self {
        log::debug!("{method}: tolerance {tolerance}, {} digits", ctx.digits());
        Self {
            method,
            ctx,
            tolerance,
            started: Instant::now(),
            trace: Vec::new(),
        }
    }

    pub(crate) fn tolerance(&self) -> &'a Decimal {
        self.tolerance
    }

    pub(crate) fn record(&mut self, iteration: usize, estimate: &Decimal, error: Option<&Decimal>) {
        match error {
            Some(e) => log::debug!("{} iteration {iteration}: x = {estimate}, error {e}", self.method),
            None => log::debug!("{} iteration {iteration}: x = {estimate}", self.method),
        }
        self.trace.push(IterationRecord {
            iteration,
            estimate: estimate.clone(),
            relative_error: error.cloned(),
        });
    }

    pub(crate) fn converged(
        self,
        root: Decimal,
        relative_error: Option<Decimal>,
        iterations: usize,
    ) -> RootOutcome {
        let message = format!(
            "{} method converged after {iterations} iterations (Absolute Relative Error: {})",
            self.method, self.tolerance
        );
        log::info!("{message}, root {root}");
        Ok(self.estimate(root, relative_error, iterations, true, message))
    }

    pub(crate) fn exhausted(
        self,
        root: Decimal,
        relative_error: Option<Decimal>,
        iterations: usize,
    ) -> RootOutcome {
        let message = format!(
            "{} method did not converge within {iterations} iterations (Absolute Relative Error: {})",
            self.method, self.tolerance
        );
        log::warn!("{message}, best estimate {root}");
        Ok(self.estimate(root, relative_error, iterations, false, message))
    }

    pub(crate) fn fail(
        self,
        reason: RootFailureReason,
        iterations: usize,
        last_estimate: Option<Decimal>,
    ) -> RootOutcome {
        Err(RootFailure::new(
            self.method,
            reason,
            iterations,
            last_estimate,
            self.started,
        ))
    }

    fn estimate(
        self,
        root: Decimal,
        relative_error: Option<Decimal>,
        iterations: usize,
        converged: bool,
        message: String,
    ) -> RootEstimate {
        let significant_figures = relative_error
            .as_ref()
            .map(|e| self.ctx.significant_figures(e));
        RootEstimate {
            root,
            relative_error,
            significant_figures,
            iterations,
            converged,
            message,
            execution_time: self.started.elapsed(),
            trace: self.trace,
        }
    }
}
