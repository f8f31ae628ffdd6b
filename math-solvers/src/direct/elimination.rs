//! Row-reduction primitives shared by Gauss and Gauss-Jordan elimination
//!
//! All operations act in place on the augmented matrix `[A | b]` and record a
//! [`Step`] holding snapshots taken before and after the change.

use crate::matrix::{Matrix, swap_rows};
use crate::step::{Step, Trace};
use math_trace_decimal::{Decimal, NumericError, Precision};

/// Configuration for Gauss and Gauss-Jordan elimination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EliminationConfig {
    /// Working precision
    pub precision: Precision,
    /// Use scaled partial pivoting instead of plain partial pivoting
    pub scaling: bool,
}

impl EliminationConfig {
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_scaling(mut self, scaling: bool) -> Self {
        self.scaling = scaling;
        self
    }
}

/// Augmented system under reduction, with the optional per-row scale factors
/// that follow their rows through swaps.
pub(crate) struct Reduction<'t> {
    pub(crate) m: Matrix,
    ctx: Precision,
    n: usize,
    scales: Option<Vec<Decimal>>,
    trace: &'t mut Trace,
}

impl<'t> Reduction<'t> {
    pub(crate) fn new(ctx: Precision, m: Matrix, scaling: bool, trace: &'t mut Trace) -> Self {
        let n = m.nrows();
        let scales = scaling.then(|| scale_factors(ctx, &m, n));
        if let Some(s) = &scales {
            log::debug!(
                "scale factors: [{}]",
                s.iter().map(Decimal::to_string).collect::<Vec<_>>().join(", ")
            );
        }
        Self {
            m,
            ctx,
            n,
            scales,
            trace,
        }
    }

    /// Bring the best pivot candidate for column `k` to row `k`.
    ///
    /// Plain partial pivoting compares `|m[r,k]|`; scaled partial pivoting
    /// compares `|m[r,k]| / s_r`. Ties keep the upper row.
    pub(crate) fn pivot(&mut self, k: usize) -> Result<(), NumericError> {
        let mut best = k;
        let mut best_score = self.score(k, k)?;
        for r in (k + 1)..self.n {
            let score = self.score(r, k)?;
            if score > best_score {
                best = r;
                best_score = score;
            }
        }
        if best != k {
            log::debug!("pivot column {}: swap rows {} and {}", k + 1, k + 1, best + 1);
            self.swap(k, best);
        }
        Ok(())
    }

    fn score(&self, row: usize, col: usize) -> Result<Decimal, NumericError> {
        let value = self.m[[row, col]].abs();
        match &self.scales {
            // an all-zero row can never supply a pivot
            Some(scales) if scales[row].is_near_zero() => Ok(self.ctx.zero()),
            Some(scales) => value.checked_div(&scales[row]),
            None => Ok(value),
        }
    }

    /// `R_i <-> R_j`
    pub(crate) fn swap(&mut self, i: usize, j: usize) {
        let before = self.m.clone();
        swap_rows(&mut self.m, i, j);
        if let Some(scales) = &mut self.scales {
            scales.swap(i, j);
        }
        self.trace.record(Step::RowSwap {
            target_row: i,
            source_row: j,
            before,
            after: self.m.clone(),
        });
    }

    /// Divide row `k` by its pivot so that `m[k,k]` becomes exactly one.
    pub(crate) fn normalize(&mut self, k: usize) -> Result<(), NumericError> {
        let ctx = self.ctx;
        let pivot = self.m[[k, k]].clone();
        let factor = ctx.one().checked_div(&pivot)?;
        let before = self.m.clone();
        for j in 0..self.m.ncols() {
            self.m[[k, j]] = if j == k {
                ctx.one()
            } else {
                self.m[[k, j]].checked_div(&pivot)?
            };
        }
        self.trace.record(Step::RowScale {
            row: k,
            factor,
            before,
            after: self.m.clone(),
        });
        Ok(())
    }

    /// Clear `m[target, col]` using the pivot in `m[source, col]`:
    /// `R_target <- R_target - (m[target,col] / m[source,col]) R_source`.
    ///
    /// Rows whose entry is already exactly zero are left alone.
    pub(crate) fn eliminate(
        &mut self,
        target: usize,
        source: usize,
        col: usize,
    ) -> Result<(), NumericError> {
        if self.m[[target, col]].is_zero() {
            return Ok(());
        }
        let factor = self.m[[target, col]].checked_div(&self.m[[source, col]])?;
        let before = self.m.clone();
        for j in 0..self.m.ncols() {
            if j == col {
                continue;
            }
            let delta = &factor * &self.m[[source, j]];
            self.m[[target, j]] -= &delta;
        }
        self.m[[target, col]] = self.ctx.zero();
        self.trace.record(Step::RowAdd {
            target_row: target,
            source_row: source,
            factor: -factor,
            before,
            after: self.m.clone(),
        });
        Ok(())
    }

    pub(crate) fn into_matrix(self) -> Matrix {
        self.m
    }
}

/// Largest magnitude among the coefficient columns of each row.
fn scale_factors(ctx: Precision, m: &Matrix, n: usize) -> Vec<Decimal> {
    m.rows()
        .into_iter()
        .map(|row| {
            row.iter()
                .take(n)
                .fold(ctx.zero(), |best, v| best.max_of(&v.abs()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::matrix_from_rows;

    fn ctx() -> Precision {
        Precision::new(10).unwrap()
    }

    #[test]
    fn test_scale_factors_ignore_constants() {
        let m = matrix_from_rows(ctx(), &[vec![1.0, -4.0, 100.0], vec![3.0, 2.0, -7.0]]).unwrap();
        let s = scale_factors(ctx(), &m, 2);
        assert_eq!(s[0], ctx().from_i64(4));
        assert_eq!(s[1], ctx().from_i64(3));
    }

    #[test]
    fn test_plain_pivot_picks_largest() {
        let m = matrix_from_rows(
            ctx(),
            &[vec![1.0, 2.0, 0.0], vec![-5.0, 1.0, 0.0], vec![3.0, 1.0, 0.0]],
        )
        .unwrap();
        let mut trace = Trace::new();
        let mut red = Reduction::new(ctx(), m, false, &mut trace);
        red.pivot(0).unwrap();
        assert_eq!(red.m[[0, 0]], ctx().from_i64(-5));
        assert_eq!(trace.len(), 1);
        assert_eq!(trace.steps()[0].step_type(), "row-swap");
    }

    #[test]
    fn test_scaled_pivot_prefers_relative_size() {
        // row 0 has the larger entry but an even larger scale
        let m = matrix_from_rows(ctx(), &[vec![2.0, 100.0, 0.0], vec![1.0, 1.0, 0.0]]).unwrap();
        let mut trace = Trace::new();
        let mut plain = Reduction::new(ctx(), m.clone(), false, &mut trace);
        plain.pivot(0).unwrap();
        assert_eq!(plain.m[[0, 0]], ctx().from_i64(2));

        let mut trace = Trace::new();
        let mut scaled = Reduction::new(ctx(), m, true, &mut trace);
        scaled.pivot(0).unwrap();
        assert_eq!(scaled.m[[0, 0]], ctx().from_i64(1));
    }

    #[test]
    fn test_eliminate_records_negated_factor() {
        let m = matrix_from_rows(ctx(), &[vec![2.0, 1.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        let mut trace = Trace::new();
        let mut red = Reduction::new(ctx(), m, false, &mut trace);
        red.eliminate(1, 0, 0).unwrap();
        let m = red.into_matrix();
        assert!(m[[1, 0]].is_zero());
        assert_eq!(m[[1, 1]], ctx().from_i64(3));
        assert_eq!(m[[1, 2]], ctx().from_i64(0));
        match &trace.steps()[0] {
            Step::RowAdd { factor, .. } => assert_eq!(*factor, ctx().from_i64(-2)),
            other => panic!("unexpected step {other:?}"),
        }
    }

    #[test]
    fn test_normalize_sets_unit_pivot() {
        let m = matrix_from_rows(ctx(), &[vec![4.0, 2.0, 8.0]]).unwrap();
        let mut trace = Trace::new();
        let mut red = Reduction::new(ctx(), m, false, &mut trace);
        red.normalize(0).unwrap();
        assert_eq!(red.m[[0, 0]], ctx().one());
        assert_eq!(red.m[[0, 1]].to_string(), "0.5");
        assert_eq!(red.m[[0, 2]], ctx().from_i64(2));
    }
}
