//! Gauss elimination with back substitution

use super::elimination::{EliminationConfig, Reduction};
use crate::error::{FailureReason, Result};
use crate::matrix::{Matrix, Vector, augment, validate_system};
use crate::result::{Failure, SolveOutcome, Solution};
use crate::step::{Step, Trace};
use crate::traits::Solver;
use math_trace_decimal::Precision;
use ndarray::Array1;
use std::time::Instant;

/// Gauss elimination solver.
///
/// Forward elimination with (optionally scaled) partial pivoting reduces
/// `[A | b]` to upper-triangular form, then back substitution recovers `x`.
#[derive(Debug, Clone)]
pub struct GaussElimination {
    a: Matrix,
    b: Vector,
    config: EliminationConfig,
}

impl GaussElimination {
    /// Create a solver for `A x = b`.
    ///
    /// # Errors
    /// Shape errors if `A` is not square or `b` does not match it.
    pub fn new(a: Matrix, b: Vector, config: EliminationConfig) -> Result<Self> {
        validate_system(&a, &b)?;
        Ok(Self { a, b, config })
    }

    fn run(&self, trace: &mut Trace) -> std::result::Result<Vector, FailureReason> {
        let ctx = self.config.precision;
        let n = self.a.nrows();
        let mut red = Reduction::new(ctx, augment(&self.a, &self.b), self.config.scaling, trace);

        for k in 0..n.saturating_sub(1) {
            red.pivot(k)?;
            if red.m[[k, k]].is_near_zero() {
                return Err(FailureReason::NoUniqueSolution { row: k });
            }
            for i in (k + 1)..n {
                red.eliminate(i, k, k)?;
            }
        }
        if red.m[[n - 1, n - 1]].is_near_zero() {
            return Err(FailureReason::NoUniqueSolution { row: n - 1 });
        }

        let m = red.into_matrix();
        let x = back_substitute(ctx, &m)?;
        trace.record(Step::BackSubstitution {
            matrix: m,
            result: x.clone(),
        });
        Ok(x)
    }
}

/// Solve an upper-triangular augmented system `[U | y]` bottom-up.
pub(crate) fn back_substitute(
    ctx: Precision,
    m: &Matrix,
) -> std::result::Result<Vector, FailureReason> {
    let n = m.nrows();
    let mut x = Array1::from_elem(n, ctx.zero());
    for i in (0..n).rev() {
        let mut acc = m[[i, n]].clone();
        for j in (i + 1)..n {
            acc -= &(&m[[i, j]] * &x[j]);
        }
        x[i] = acc.checked_div(&m[[i, i]])?;
    }
    Ok(x)
}

impl Solver for GaussElimination {
    fn name(&self) -> &'static str {
        "Gauss Elimination"
    }

    fn solve(&self) -> SolveOutcome {
        let started = Instant::now();
        let mut trace = Trace::new();
        match self.run(&mut trace) {
            Ok(x) => {
                log::info!("{} finished with {} steps", self.name(), trace.len());
                Ok(Solution::new(
                    x,
                    trace.into_steps(),
                    format!("Solution found using {}.", self.name()),
                    started,
                ))
            }
            Err(reason) => Err(Failure::new(reason, started)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{matrix_from_rows, vector_from_slice};
    use approx::assert_relative_eq;

    fn ctx() -> Precision {
        Precision::new(10).unwrap()
    }

    fn config(scaling: bool) -> EliminationConfig {
        EliminationConfig::default()
            .with_precision(ctx())
            .with_scaling(scaling)
    }

    #[test]
    fn test_gauss_small_system() {
        let a = matrix_from_rows(ctx(), &[vec![2.0, 1.0], vec![1.0, 3.0]]).unwrap();
        let b = vector_from_slice(ctx(), &[3.0, 5.0]).unwrap();
        let solution = GaussElimination::new(a, b, config(false))
            .unwrap()
            .solve()
            .unwrap();
        assert_relative_eq!(solution.x[0].to_f64(), 0.8, epsilon = 1e-9);
        assert_relative_eq!(solution.x[1].to_f64(), 1.4, epsilon = 1e-9);
        assert_eq!(
            solution.steps.last().map(Step::step_type),
            Some("back-substitution")
        );
    }

    #[test]
    fn test_gauss_scenario_one() {
        let a = matrix_from_rows(
            ctx(),
            &[
                vec![10.0, -7.0, 0.0],
                vec![-3.0, 2.099, 6.0],
                vec![5.0, -1.0, 5.0],
            ],
        )
        .unwrap();
        let b = vector_from_slice(ctx(), &[7.0, 3.901, 6.0]).unwrap();
        for scaling in [false, true] {
            let solution = GaussElimination::new(a.clone(), b.clone(), config(scaling))
                .unwrap()
                .solve()
                .unwrap();
            assert_relative_eq!(solution.x[0].to_f64(), 0.0, epsilon = 1e-4);
            assert_relative_eq!(solution.x[1].to_f64(), -1.0, epsilon = 1e-4);
            assert_relative_eq!(solution.x[2].to_f64(), 1.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_gauss_singular() {
        let a = matrix_from_rows(ctx(), &[vec![1.0, 2.0], vec![2.0, 4.0]]).unwrap();
        let b = vector_from_slice(ctx(), &[1.0, 2.0]).unwrap();
        let failure = GaussElimination::new(a, b, config(false))
            .unwrap()
            .solve()
            .unwrap_err();
        assert_eq!(failure.message, "System doesn't have a unique solution.");
        assert!(matches!(
            failure.reason,
            FailureReason::NoUniqueSolution { row: 1 }
        ));
    }

    #[test]
    fn test_gauss_rejects_mismatched_constants() {
        let a = matrix_from_rows(ctx(), &[vec![1.0, 2.0], vec![2.0, 4.0]]).unwrap();
        let b = vector_from_slice(ctx(), &[1.0]).unwrap();
        let err = GaussElimination::new(a, b, config(false)).unwrap_err();
        assert!(err.is_dimension_error());
    }

    #[test]
    fn test_gauss_single_equation() {
        let a = matrix_from_rows(ctx(), &[vec![4.0]]).unwrap();
        let b = vector_from_slice(ctx(), &[2.0]).unwrap();
        let solution = GaussElimination::new(a, b, config(false))
            .unwrap()
            .solve()
            .unwrap();
        assert_eq!(solution.x[0].to_string(), "0.5");
    }
}
