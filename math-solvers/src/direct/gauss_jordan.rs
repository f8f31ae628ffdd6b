//! Gauss-Jordan elimination

use super::elimination::{EliminationConfig, Reduction};
use crate::error::{FailureReason, Result};
use crate::matrix::{Matrix, Vector, augment, validate_system};
use crate::result::{Failure, SolveOutcome, Solution};
use crate::step::Trace;
use crate::traits::Solver;
use std::time::Instant;

/// Gauss-Jordan solver.
///
/// Each pivot row is normalized to a unit pivot and the pivot column is
/// cleared in every other row, so `[A | b]` ends as `[I | x]`.
#[derive(Debug, Clone)]
pub struct GaussJordan {
    a: Matrix,
    b: Vector,
    config: EliminationConfig,
}

impl GaussJordan {
    pub fn new(a: Matrix, b: Vector, config: EliminationConfig) -> Result<Self> {
        validate_system(&a, &b)?;
        Ok(Self { a, b, config })
    }

    fn run(&self, trace: &mut Trace) -> std::result::Result<Vector, FailureReason> {
        let n = self.a.nrows();
        let mut red = Reduction::new(
            self.config.precision,
            augment(&self.a, &self.b),
            self.config.scaling,
            trace,
        );

        for k in 0..n {
            red.pivot(k)?;
            if red.m[[k, k]].is_near_zero() {
                return Err(FailureReason::NoUniqueSolution { row: k });
            }
            red.normalize(k)?;
            for i in (0..n).filter(|&i| i != k) {
                red.eliminate(i, k, k)?;
            }
        }

        Ok(red.into_matrix().column(n).to_owned())
    }
}

impl Solver for GaussJordan {
    fn name(&self) -> &'static str {
        "Gauss-Jordan Elimination"
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
    use crate::step::Step;
    use approx::assert_relative_eq;
    use math_trace_decimal::Precision;

    fn config() -> EliminationConfig {
        EliminationConfig::default().with_precision(Precision::new(12).unwrap())
    }

    #[test]
    fn test_gauss_jordan_three_by_three() {
        let ctx = config().precision;
        let a = matrix_from_rows(
            ctx,
            &[vec![2.0, 1.0, -1.0], vec![-3.0, -1.0, 2.0], vec![-2.0, 1.0, 2.0]],
        )
        .unwrap();
        let b = vector_from_slice(ctx, &[8.0, -11.0, -3.0]).unwrap();
        let solution = GaussJordan::new(a, b, config()).unwrap().solve().unwrap();

        assert_relative_eq!(solution.x[0].to_f64(), 2.0, epsilon = 1e-9);
        assert_relative_eq!(solution.x[1].to_f64(), 3.0, epsilon = 1e-9);
        assert_relative_eq!(solution.x[2].to_f64(), -1.0, epsilon = 1e-9);

        // one normalization per pivot, no substitution phase
        let scales = solution
            .steps
            .iter()
            .filter(|s| matches!(s, Step::RowScale { .. }))
            .count();
        assert_eq!(scales, 3);
        assert!(
            !solution
                .steps
                .iter()
                .any(|s| matches!(s, Step::BackSubstitution { .. }))
        );
    }

    #[test]
    fn test_gauss_jordan_singular() {
        let ctx = config().precision;
        let a = matrix_from_rows(ctx, &[vec![1.0, 1.0], vec![1.0, 1.0]]).unwrap();
        let b = vector_from_slice(ctx, &[1.0, 2.0]).unwrap();
        let failure = GaussJordan::new(a, b, config()).unwrap().solve().unwrap_err();
        assert!(matches!(
            failure.reason,
            FailureReason::NoUniqueSolution { .. }
        ));
    }

    #[test]
    fn test_gauss_jordan_swaps_zero_pivot() {
        let ctx = config().precision;
        let a = matrix_from_rows(ctx, &[vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();
        let b = vector_from_slice(ctx, &[5.0, 7.0]).unwrap();
        let solution = GaussJordan::new(a, b, config()).unwrap().solve().unwrap();
        assert_eq!(solution.x[0], ctx.from_i64(7));
        assert_eq!(solution.x[1], ctx.from_i64(5));
        assert_eq!(solution.steps[0].step_type(), "row-swap");
    }
}
