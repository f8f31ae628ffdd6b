//! Iterative solvers for linear systems
//!
//! This module provides stationary methods for diagonally dominant systems:
//! - [`Jacobi`]: every component updated from the previous sweep
//! - [`GaussSeidel`]: components updated in place within a sweep
//!
//! Both share the diagonal checks, the stopping policy and the sweep loop
//! implemented here; a method only supplies its sweep.

mod gauss_seidel;
mod jacobi;

pub use gauss_seidel::GaussSeidel;
pub use jacobi::Jacobi;

use crate::error::{FailureReason, Result, SolverError};
use crate::matrix::{Matrix, Vector, augment, validate_system};
use crate::result::{Failure, IterationReport, SolveOutcome, Solution};
use crate::step::{IterationMethod, Step, Trace};
use math_trace_decimal::{Decimal, NumericError, Precision};
use ndarray::Array1;
use std::time::Instant;

/// Sweeps performed when neither stopping criterion is given
pub const DEFAULT_ITERATIONS: usize = 50;

/// Safety cap on sweeps in tolerance mode
pub const MAX_TOLERANCE_ITERATIONS: usize = 1000;

/// Floor on `|x_new[i]|` in the relative error denominator
const RELATIVE_ERROR_FLOOR: f64 = 1e-10;

const DOMINANCE_WARNING: &str =
    "Warning: Matrix is not diagonally dominant. Thus, convergence is not really guaranteed.";

/// When an iterative method stops
#[derive(Debug, Clone, PartialEq)]
pub enum StoppingCriterion {
    /// Run exactly this many sweeps
    Iterations(usize),
    /// Stop once the relative error drops below `tolerance`, or after
    /// `max_iterations` sweeps
    Tolerance {
        tolerance: Decimal,
        max_iterations: usize,
    },
}

/// Configuration for Jacobi and Gauss-Seidel
#[derive(Debug, Clone, PartialEq)]
pub struct IterativeConfig {
    /// Working precision
    pub precision: Precision,
    /// Starting vector; zeros when absent
    pub initial_guess: Option<Vector>,
    /// Stopping policy
    pub stopping: StoppingCriterion,
    /// Log progress every N sweeps (0 = no output)
    pub print_interval: usize,
}

impl Default for IterativeConfig {
    fn default() -> Self {
        Self {
            precision: Precision::default(),
            initial_guess: None,
            stopping: StoppingCriterion::Iterations(DEFAULT_ITERATIONS),
            print_interval: 0,
        }
    }
}

impl IterativeConfig {
    /// Creates a builder with default configuration.
    pub fn builder() -> IterativeConfigBuilder {
        IterativeConfigBuilder::new()
    }
}

/// Fluent builder for [`IterativeConfig`].
///
/// At most one of [`number_of_iterations`](Self::number_of_iterations) and
/// [`absolute_relative_error`](Self::absolute_relative_error) may be set.
#[derive(Debug, Clone, Default)]
pub struct IterativeConfigBuilder {
    precision: Precision,
    initial_guess: Option<Vec<f64>>,
    number_of_iterations: Option<usize>,
    absolute_relative_error: Option<f64>,
    max_iterations: Option<usize>,
    print_interval: usize,
}

impl IterativeConfigBuilder {
    /// Creates a new builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }
    /// Sets the working precision.
    pub fn precision(mut self, v: Precision) -> Self {
        self.precision = v;
        self
    }
    /// Sets the starting vector.
    pub fn initial_guess(mut self, v: Vec<f64>) -> Self {
        self.initial_guess = Some(v);
        self
    }
    /// Runs a fixed number of sweeps.
    pub fn number_of_iterations(mut self, v: usize) -> Self {
        self.number_of_iterations = Some(v);
        self
    }
    /// Iterates until the relative error drops below `v`.
    pub fn absolute_relative_error(mut self, v: f64) -> Self {
        self.absolute_relative_error = Some(v);
        self
    }
    /// Sets the sweep cap used in tolerance mode.
    pub fn max_iterations(mut self, v: usize) -> Self {
        self.max_iterations = Some(v);
        self
    }
    /// Sets the progress logging interval.
    pub fn print_interval(mut self, v: usize) -> Self {
        self.print_interval = v;
        self
    }

    /// Validates and builds the configuration.
    ///
    /// # Errors
    /// `ConflictingStoppingCriteria` when both criteria are set,
    /// `InvalidIterationCount` / `InvalidTolerance` for out-of-range values.
    pub fn build(self) -> Result<IterativeConfig> {
        let ctx = self.precision;
        let stopping = match (self.number_of_iterations, self.absolute_relative_error) {
            (Some(_), Some(_)) => return Err(SolverError::ConflictingStoppingCriteria),
            (Some(0), None) => return Err(SolverError::InvalidIterationCount),
            (Some(n), None) => StoppingCriterion::Iterations(n),
            (None, Some(tol)) => {
                if tol.is_nan() || tol <= 0.0 {
                    return Err(SolverError::InvalidTolerance {
                        value: tol.to_string(),
                    });
                }
                let max_iterations = self.max_iterations.unwrap_or(MAX_TOLERANCE_ITERATIONS);
                if max_iterations == 0 {
                    return Err(SolverError::InvalidIterationCount);
                }
                StoppingCriterion::Tolerance {
                    tolerance: ctx.from_f64(tol)?,
                    max_iterations,
                }
            }
            (None, None) => StoppingCriterion::Iterations(DEFAULT_ITERATIONS),
        };

        let initial_guess = match self.initial_guess {
            Some(values) => Some(
                values
                    .iter()
                    .map(|&v| ctx.from_f64(v))
                    .collect::<std::result::Result<Vector, NumericError>>()?,
            ),
            None => None,
        };

        Ok(IterativeConfig {
            precision: ctx,
            initial_guess,
            stopping,
            print_interval: self.print_interval,
        })
    }
}

/// Shared validation for iterative solver constructors.
pub(crate) fn validate_iterative(a: &Matrix, b: &Vector, config: &IterativeConfig) -> Result<()> {
    validate_system(a, b)?;
    if let Some(guess) = &config.initial_guess {
        if guess.len() != a.nrows() {
            return Err(SolverError::InitialGuessMismatch {
                expected: a.nrows(),
                got: guess.len(),
            });
        }
    }
    Ok(())
}

/// One-based equation numbers whose diagonal entry is exactly zero.
pub fn zero_diagonal_equations(a: &Matrix) -> Vec<usize> {
    (0..a.nrows())
        .filter(|&i| a[[i, i]].is_zero())
        .map(|i| i + 1)
        .collect()
}

/// One-based equation numbers whose diagonal is nonzero but below `1e-12`.
pub fn near_zero_diagonal_equations(a: &Matrix) -> Vec<usize> {
    (0..a.nrows())
        .filter(|&i| !a[[i, i]].is_zero() && a[[i, i]].is_near_zero())
        .map(|i| i + 1)
        .collect()
}

/// Diagonal dominance: every row has `|a_ii| >= Σ_{j≠i} |a_ij|` and at least
/// one row satisfies it strictly.
pub fn is_diagonally_dominant(ctx: Precision, a: &Matrix) -> bool {
    let mut strict = false;
    for (i, row) in a.rows().into_iter().enumerate() {
        let diag = row[i].abs();
        let off = row
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .fold(ctx.zero(), |acc, (_, v)| acc + v.abs());
        if diag < off {
            return false;
        }
        if diag > off {
            strict = true;
        }
    }
    strict
}

/// `max_i |new_i - old_i| / max(|new_i|, 1e-10)`
pub fn relative_error(
    ctx: Precision,
    new: &Vector,
    old: &Vector,
) -> std::result::Result<Decimal, NumericError> {
    let floor = ctx.from_f64(RELATIVE_ERROR_FLOOR)?;
    let mut worst = ctx.zero();
    for (n, o) in new.iter().zip(old.iter()) {
        let err = (n - o).abs().checked_div(&n.abs().max_of(&floor))?;
        worst = worst.max_of(&err);
    }
    Ok(worst)
}

/// Run `sweep` until the stopping criterion is met, recording one step per
/// sweep. `sweep` maps the previous iterate to the next one.
pub(crate) fn run_iterations<F>(
    name: &'static str,
    method: IterationMethod,
    a: &Matrix,
    b: &Vector,
    config: &IterativeConfig,
    sweep: F,
) -> SolveOutcome
where
    F: Fn(&Vector) -> std::result::Result<Vector, NumericError>,
{
    let started = Instant::now();
    let ctx = config.precision;

    let zero_diagonals = zero_diagonal_equations(a);
    if !zero_diagonals.is_empty() {
        return Err(Failure::new(
            FailureReason::ZeroDiagonal {
                equations: zero_diagonals,
            },
            started,
        ));
    }

    let mut warning = String::new();
    if !is_diagonally_dominant(ctx, a) {
        log::warn!("{name}: matrix is not diagonally dominant");
        warning.push_str(DOMINANCE_WARNING);
        warning.push(' ');
    }
    let near_zero = near_zero_diagonal_equations(a);
    if !near_zero.is_empty() {
        log::warn!("{name}: near-zero diagonal elements in equations {near_zero:?}");
        warning.push_str(&format!(
            "Warning: near-zero diagonal elements found in equations {near_zero:?}. "
        ));
    }

    let (limit, tolerance) = match &config.stopping {
        StoppingCriterion::Iterations(n) => (*n, None),
        StoppingCriterion::Tolerance {
            tolerance,
            max_iterations,
        } => (*max_iterations, Some(tolerance)),
    };

    let matrix = augment(a, b);
    let mut trace = Trace::new();
    let mut x = config
        .initial_guess
        .clone()
        .unwrap_or_else(|| Array1::from_elem(a.nrows(), ctx.zero()));
    let mut count = 0;
    let mut last_error = None;
    let mut converged = false;

    while count < limit {
        let step = sweep(&x).and_then(|x_new| {
            let err = relative_error(ctx, &x_new, &x)?;
            Ok((x_new, err))
        });
        let (x_new, err) = match step {
            Ok(v) => v,
            Err(e) => {
                return Err(Failure::new(FailureReason::from(e), started).after_iterations(count));
            }
        };
        count += 1;

        if config.print_interval > 0 && count % config.print_interval == 0 {
            log::info!("{name} iteration {count}: relative error = {err}");
        } else {
            log::debug!("{name} iteration {count}: relative error = {err}");
        }

        trace.record(Step::Iteration {
            method,
            index: count,
            matrix: matrix.clone(),
            old_solution: x.clone(),
            new_solution: x_new.clone(),
            relative_error: err.clone(),
        });
        x = x_new;

        let met = tolerance.is_some_and(|tol| err < *tol);
        last_error = Some(err);
        if met {
            converged = true;
            break;
        }
    }

    let reported_error = match tolerance {
        Some(tol) => tol.clone(),
        None => {
            let threshold = ctx.convergence_threshold();
            converged = last_error.as_ref().is_some_and(|e| *e <= threshold);
            last_error.clone().unwrap_or_else(|| ctx.zero())
        }
    };

    let message = if converged {
        log::info!("{name} converged after {count} iterations");
        format!(
            "{warning}{name} method converged after {count} iterations (Absolute Relative Error: {reported_error})"
        )
    } else {
        log::warn!("{name} did not converge within {limit} iterations");
        format!(
            "{warning}{name} method did not converge within {limit} iterations (Absolute Relative Error: {reported_error})"
        )
    };

    let significant_digits = last_error
        .as_ref()
        .map_or(0, |e| ctx.significant_figures(e));
    Ok(
        Solution::new(x, trace.into_steps(), message, started).with_iterations(IterationReport {
            count,
            converged,
            relative_error: last_error,
            significant_digits,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{matrix_from_rows, vector_from_slice};

    fn ctx() -> Precision {
        Precision::new(10).unwrap()
    }

    #[test]
    fn test_builder_defaults_to_fixed_iterations() {
        let config = IterativeConfig::builder().build().unwrap();
        assert_eq!(
            config.stopping,
            StoppingCriterion::Iterations(DEFAULT_ITERATIONS)
        );
        assert!(config.initial_guess.is_none());
    }

    #[test]
    fn test_builder_rejects_both_criteria() {
        let err = IterativeConfig::builder()
            .number_of_iterations(10)
            .absolute_relative_error(1e-6)
            .build()
            .unwrap_err();
        assert!(matches!(err, SolverError::ConflictingStoppingCriteria));
        assert!(err.is_config_error());
    }

    #[test]
    fn test_builder_validates_values() {
        assert!(matches!(
            IterativeConfig::builder().number_of_iterations(0).build(),
            Err(SolverError::InvalidIterationCount)
        ));
        assert!(matches!(
            IterativeConfig::builder().absolute_relative_error(-1.0).build(),
            Err(SolverError::InvalidTolerance { .. })
        ));
        let config = IterativeConfig::builder()
            .absolute_relative_error(1e-4)
            .build()
            .unwrap();
        match config.stopping {
            StoppingCriterion::Tolerance { max_iterations, .. } => {
                assert_eq!(max_iterations, MAX_TOLERANCE_ITERATIONS)
            }
            other => panic!("unexpected criterion {other:?}"),
        }
    }

    #[test]
    fn test_diagonal_dominance() {
        let strict = matrix_from_rows(ctx(), &[vec![4.0, 1.0], vec![1.0, 3.0]]).unwrap();
        let weak_only = matrix_from_rows(ctx(), &[vec![1.0, 1.0], vec![1.0, 1.0]]).unwrap();
        let mixed = matrix_from_rows(ctx(), &[vec![2.0, 2.0], vec![1.0, 3.0]]).unwrap();
        let not = matrix_from_rows(ctx(), &[vec![1.0, 2.0], vec![3.0, 1.0]]).unwrap();
        assert!(is_diagonally_dominant(ctx(), &strict));
        assert!(!is_diagonally_dominant(ctx(), &weak_only));
        assert!(is_diagonally_dominant(ctx(), &mixed));
        assert!(!is_diagonally_dominant(ctx(), &not));
    }

    #[test]
    fn test_zero_diagonal_detection() {
        let a = matrix_from_rows(
            ctx(),
            &[vec![1.0, 2.0, 0.0], vec![3.0, 0.0, 1.0], vec![1.0, 1.0, 0.0]],
        )
        .unwrap();
        assert_eq!(zero_diagonal_equations(&a), vec![2, 3]);

        let tiny = matrix_from_rows(ctx(), &[vec![1e-14, 0.0], vec![0.0, 1.0]]).unwrap();
        assert!(zero_diagonal_equations(&tiny).is_empty());
        assert_eq!(near_zero_diagonal_equations(&tiny), vec![1]);
    }

    #[test]
    fn test_relative_error_uses_floor() {
        let new = vector_from_slice(ctx(), &[2.0, 0.0]).unwrap();
        let old = vector_from_slice(ctx(), &[1.0, 0.0]).unwrap();
        assert_eq!(relative_error(ctx(), &new, &old).unwrap().to_string(), "0.5");

        let new = vector_from_slice(ctx(), &[0.0]).unwrap();
        let old = vector_from_slice(ctx(), &[1e-12]).unwrap();
        let err = relative_error(ctx(), &new, &old).unwrap();
        assert_eq!(err.to_string(), "0.01");
    }
}
