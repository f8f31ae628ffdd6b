//! Gauss-Seidel iteration

use super::{IterativeConfig, run_iterations, validate_iterative};
use crate::error::Result;
use crate::matrix::{Matrix, Vector, partial_dot};
use crate::result::SolveOutcome;
use crate::step::IterationMethod;
use crate::traits::Solver;

/// Gauss-Seidel solver.
///
/// Components are updated in place, so row `i` of a sweep already sees the new
/// values of rows `0..i`.
#[derive(Debug, Clone)]
pub struct GaussSeidel {
    a: Matrix,
    b: Vector,
    config: IterativeConfig,
}

impl GaussSeidel {
    pub fn new(a: Matrix, b: Vector, config: IterativeConfig) -> Result<Self> {
        validate_iterative(&a, &b, &config)?;
        Ok(Self { a, b, config })
    }
}

impl Solver for GaussSeidel {
    fn name(&self) -> &'static str {
        "Gauss-Seidel Iteration"
    }

    fn solve(&self) -> SolveOutcome {
        let ctx = self.config.precision;
        let (a, b) = (&self.a, &self.b);
        let n = a.nrows();
        run_iterations(
            self.name(),
            IterationMethod::GaussSeidel,
            a,
            b,
            &self.config,
            |x_old| {
                let mut x = x_old.clone();
                for i in 0..n {
                    let off = partial_dot(
                        ctx,
                        (0..n).filter(|&j| j != i).map(|j| &a[[i, j]] * &x[j]),
                    );
                    x[i] = (&b[i] - off).div_exact_nonzero(&a[[i, i]])?;
                }
                Ok(x)
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iterative::Jacobi;
    use crate::matrix::{matrix_from_rows, vector_from_slice};
    use approx::assert_relative_eq;
    use math_trace_decimal::Precision;

    fn ctx() -> Precision {
        Precision::new(12).unwrap()
    }

    fn system() -> (Matrix, Vector) {
        let a = matrix_from_rows(
            ctx(),
            &[vec![10.0, 2.0, 1.0], vec![1.0, 5.0, 1.0], vec![2.0, 3.0, 10.0]],
        )
        .unwrap();
        let b = vector_from_slice(ctx(), &[7.0, -8.0, 6.0]).unwrap();
        (a, b)
    }

    fn tolerance_config() -> IterativeConfig {
        IterativeConfig::builder()
            .precision(ctx())
            .absolute_relative_error(1e-10)
            .build()
            .unwrap()
    }

    #[test]
    fn test_gauss_seidel_converges() {
        let (a, b) = system();
        let solution = GaussSeidel::new(a, b, tolerance_config())
            .unwrap()
            .solve()
            .unwrap();
        assert!(solution.iterations.as_ref().unwrap().converged);
        assert_relative_eq!(solution.x[0].to_f64(), 1.0, epsilon = 1e-8);
        assert_relative_eq!(solution.x[1].to_f64(), -2.0, epsilon = 1e-8);
        assert_relative_eq!(solution.x[2].to_f64(), 1.0, epsilon = 1e-8);
    }

    #[test]
    fn test_gauss_seidel_needs_fewer_sweeps_than_jacobi() {
        let (a, b) = system();
        let gs = GaussSeidel::new(a.clone(), b.clone(), tolerance_config())
            .unwrap()
            .solve()
            .unwrap();
        let jacobi = Jacobi::new(a, b, tolerance_config()).unwrap().solve().unwrap();
        let gs_count = gs.iterations.as_ref().unwrap().count;
        let jacobi_count = jacobi.iterations.as_ref().unwrap().count;
        assert!(gs_count <= jacobi_count);
        for (x, y) in gs.x.iter().zip(jacobi.x.iter()) {
            assert_relative_eq!(x.to_f64(), y.to_f64(), epsilon = 1e-8);
        }
    }

    #[test]
    fn test_gauss_seidel_first_sweep_uses_new_values() {
        let a = matrix_from_rows(ctx(), &[vec![2.0, 1.0], vec![1.0, 2.0]]).unwrap();
        let b = vector_from_slice(ctx(), &[2.0, 2.0]).unwrap();
        let config = IterativeConfig::builder()
            .precision(ctx())
            .number_of_iterations(1)
            .build()
            .unwrap();
        let solution = GaussSeidel::new(a, b, config).unwrap().solve().unwrap();
        // x0 = 2/2 = 1, then x1 = (2 - 1)/2 = 0.5
        assert_eq!(solution.x[0].to_string(), "1");
        assert_eq!(solution.x[1].to_string(), "0.5");
        assert_eq!(solution.steps[0].step_type(), "iteration");
    }

    #[test]
    fn test_gauss_seidel_near_zero_diagonal_warns() {
        let ctx = Precision::new(20).unwrap();
        let a = matrix_from_rows(ctx, &[vec![1e-13, 0.0], vec![1.0, 2.0]]).unwrap();
        let b = vector_from_slice(ctx, &[2e-13, 4.0]).unwrap();
        let config = IterativeConfig::builder()
            .precision(ctx)
            .absolute_relative_error(1e-9)
            .build()
            .unwrap();
        let solution = GaussSeidel::new(a, b, config).unwrap().solve().unwrap();

        let report = solution.iterations.as_ref().unwrap();
        assert!(report.count > 0);
        assert!(report.converged);
        assert!(solution.message.contains("near-zero diagonal elements"));
        // x0 = 2e-13 / 1e-13, then x1 = (4 - 2) / 2
        assert_eq!(solution.x[0].to_string(), "2");
        assert_eq!(solution.x[1].to_string(), "1");
    }
}
