//! Jacobi iteration

use super::{IterativeConfig, run_iterations, validate_iterative};
use crate::error::Result;
use crate::matrix::{Matrix, Vector, partial_dot};
use crate::result::SolveOutcome;
use crate::step::IterationMethod;
use crate::traits::Solver;
use ndarray::Array1;

/// Jacobi solver: `x_new[i] = (b[i] - Σ_{j≠i} a[i,j] x_old[j]) / a[i,i]`.
///
/// Every component of a sweep is computed from the previous iterate only.
#[derive(Debug, Clone)]
pub struct Jacobi {
    a: Matrix,
    b: Vector,
    config: IterativeConfig,
}

impl Jacobi {
    /// # Errors
    /// Shape errors, including an initial guess of the wrong length.
    pub fn new(a: Matrix, b: Vector, config: IterativeConfig) -> Result<Self> {
        validate_iterative(&a, &b, &config)?;
        Ok(Self { a, b, config })
    }
}

impl Solver for Jacobi {
    fn name(&self) -> &'static str {
        "Jacobi Iteration"
    }

    fn solve(&self) -> SolveOutcome {
        let ctx = self.config.precision;
        let (a, b) = (&self.a, &self.b);
        let n = a.nrows();
        run_iterations(
            self.name(),
            IterationMethod::Jacobi,
            a,
            b,
            &self.config,
            |x_old| {
                let mut x_new = Array1::from_elem(n, ctx.zero());
                for i in 0..n {
                    let off = partial_dot(
                        ctx,
                        (0..n).filter(|&j| j != i).map(|j| &a[[i, j]] * &x_old[j]),
                    );
                    x_new[i] = (&b[i] - off).div_exact_nonzero(&a[[i, i]])?;
                }
                Ok(x_new)
            },
        )
    }
}
