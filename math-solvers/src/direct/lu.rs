//! LU decomposition solver
//!
//! Factors `A` into triangular `L` and `U` in one of three forms, then solves
//! `L y = P b` by forward substitution and `U x = y` by back substitution.
//!
//! | Format    | `L`              | `U`              | Pivoting        |
//! |-----------|------------------|------------------|-----------------|
//! | Doolittle | unit lower       | upper            | partial         |
//! | Crout     | lower            | unit upper       | optional        |
//! | Cholesky  | lower            | `Lᵗ`             | none (SPD only) |

use super::gauss::back_substitute;
use crate::error::{FailureReason, Result, SolverError};
use crate::matrix::{
    Matrix, Vector, augment, identity, is_symmetric, mat_vec, matmul, partial_dot,
    permutation_matrix, swap_rows, transpose, validate_system, zeros,
};
use crate::result::{Failure, LuFactors, SolveOutcome, Solution};
use crate::step::{Step, Trace};
use crate::traits::Solver;
use math_trace_decimal::Precision;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

/// Relative tolerance of the Cholesky symmetry check
const SYMMETRY_RTOL: f64 = 1e-5;
/// Absolute tolerance of the Cholesky symmetry check
const SYMMETRY_ATOL: f64 = 1e-8;

/// Which LU factorization to compute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LuFormat {
    #[default]
    Doolittle,
    Crout,
    Cholesky,
}

impl LuFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LuFormat::Doolittle => "doolittle",
            LuFormat::Crout => "crout",
            LuFormat::Cholesky => "cholesky",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            LuFormat::Doolittle => "Doolittle",
            LuFormat::Crout => "Crout",
            LuFormat::Cholesky => "Cholesky",
        }
    }
}

impl fmt::Display for LuFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LuFormat {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "doolittle" => Ok(LuFormat::Doolittle),
            "crout" => Ok(LuFormat::Crout),
            "cholesky" => Ok(LuFormat::Cholesky),
            _ => Err(SolverError::UnknownLuFormat(s.to_string())),
        }
    }
}

/// Configuration for [`LuDecomposition`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LuConfig {
    /// Working precision
    pub precision: Precision,
    /// Factorization form
    pub format: LuFormat,
    /// Apply partial pivoting to the Crout form (on by default)
    pub crout_pivoting: bool,
}

impl Default for LuConfig {
    fn default() -> Self {
        Self {
            precision: Precision::default(),
            format: LuFormat::default(),
            crout_pivoting: true,
        }
    }
}

impl LuConfig {
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_format(mut self, format: LuFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_crout_pivoting(mut self, enabled: bool) -> Self {
        self.crout_pivoting = enabled;
        self
    }
}

/// Doolittle factorization with partial pivoting: `P A = L U`, `L` unit lower.
///
/// The pivot for column `i` is chosen among the not-yet-factored rows by the
/// magnitude of the value `U[i,i]` would take, so the permutation is decided
/// during the factorization rather than up front.
pub fn factorize_doolittle(
    ctx: Precision,
    a: &Matrix,
) -> std::result::Result<LuFactors, FailureReason> {
    let n = a.nrows();
    let mut a = a.clone();
    let mut l = zeros(ctx, n);
    let mut u = zeros(ctx, n);
    let mut perm: Vec<usize> = (0..n).collect();

    for i in 0..n {
        let candidate = |a: &Matrix, l: &Matrix, u: &Matrix, r: usize| {
            &a[[r, i]] - partial_dot(ctx, (0..i).map(|k| &l[[r, k]] * &u[[k, i]]))
        };
        let mut best = i;
        let mut best_abs = candidate(&a, &l, &u, i).abs();
        for r in (i + 1)..n {
            let value = candidate(&a, &l, &u, r).abs();
            if value > best_abs {
                best = r;
                best_abs = value;
            }
        }
        if best != i {
            log::debug!("doolittle: swap rows {} and {}", i + 1, best + 1);
            swap_rows(&mut a, i, best);
            swap_prefix(&mut l, i, best, i);
            perm.swap(i, best);
        }

        for j in i..n {
            u[[i, j]] = &a[[i, j]] - partial_dot(ctx, (0..i).map(|k| &l[[i, k]] * &u[[k, j]]));
        }
        if u[[i, i]].is_near_zero() {
            return Err(FailureReason::NoUniqueSolution { row: i });
        }

        l[[i, i]] = ctx.one();
        for j in (i + 1)..n {
            let numerator =
                &a[[j, i]] - partial_dot(ctx, (0..i).map(|k| &l[[j, k]] * &u[[k, i]]));
            l[[j, i]] = numerator.checked_div(&u[[i, i]])?;
        }
    }

    Ok(LuFactors {
        format: LuFormat::Doolittle,
        l,
        u,
        p: Some(permutation_matrix(ctx, &perm)),
    })
}

/// Crout factorization `A = L U` with unit upper `U`.
///
/// With `pivoting`, rows are exchanged so that `L[j,j]` is the largest
/// candidate of its column and `P A = L U` holds instead.
pub fn factorize_crout(
    ctx: Precision,
    a: &Matrix,
    pivoting: bool,
) -> std::result::Result<LuFactors, FailureReason> {
    let n = a.nrows();
    let mut a = a.clone();
    let mut l = zeros(ctx, n);
    let mut u = identity(ctx, n);
    let mut perm: Vec<usize> = (0..n).collect();

    for j in 0..n {
        for i in j..n {
            l[[i, j]] = &a[[i, j]] - partial_dot(ctx, (0..j).map(|k| &l[[i, k]] * &u[[k, j]]));
        }

        if pivoting {
            let mut best = j;
            for r in (j + 1)..n {
                if l[[r, j]].abs() > l[[best, j]].abs() {
                    best = r;
                }
            }
            if best != j {
                log::debug!("crout: swap rows {} and {}", j + 1, best + 1);
                swap_rows(&mut a, j, best);
                swap_prefix(&mut l, j, best, j + 1);
                perm.swap(j, best);
            }
        }

        if l[[j, j]].is_near_zero() {
            return Err(FailureReason::NoUniqueSolution { row: j });
        }

        for i in (j + 1)..n {
            let numerator =
                &a[[j, i]] - partial_dot(ctx, (0..j).map(|k| &l[[j, k]] * &u[[k, i]]));
            u[[j, i]] = numerator.checked_div(&l[[j, j]])?;
        }
    }

    Ok(LuFactors {
        format: LuFormat::Crout,
        l,
        u,
        p: pivoting.then(|| permutation_matrix(ctx, &perm)),
    })
}

/// Cholesky factorization `A = L Lᵗ` for symmetric positive-definite `A`.
///
/// The returned `U` is `Lᵗ`.
pub fn factorize_cholesky(
    ctx: Precision,
    a: &Matrix,
) -> std::result::Result<LuFactors, FailureReason> {
    if !is_symmetric(a, SYMMETRY_RTOL, SYMMETRY_ATOL) {
        return Err(FailureReason::NotSymmetric);
    }

    let n = a.nrows();
    let mut l = zeros(ctx, n);
    for i in 0..n {
        for j in 0..=i {
            if i == j {
                let radicand =
                    &a[[i, i]] - partial_dot(ctx, (0..j).map(|k| &l[[i, k]] * &l[[i, k]]));
                if !radicand.is_positive() || radicand.is_near_zero() {
                    return Err(FailureReason::NotPositiveDefinite { row: i });
                }
                l[[i, i]] = radicand.sqrt()?;
            } else {
                let numerator =
                    &a[[i, j]] - partial_dot(ctx, (0..j).map(|k| &l[[i, k]] * &l[[j, k]]));
                l[[i, j]] = numerator.checked_div(&l[[j, j]])?;
            }
        }
    }

    Ok(LuFactors {
        format: LuFormat::Cholesky,
        u: transpose(&l),
        l,
        p: None,
    })
}

/// Exchange `m[i, 0..len]` and `m[j, 0..len]`.
fn swap_prefix(m: &mut Matrix, i: usize, j: usize, len: usize) {
    for col in 0..len {
        m.swap([i, col], [j, col]);
    }
}

/// Solve a lower-triangular augmented system `[L | c]` top-down.
fn forward_substitute(
    ctx: Precision,
    m: &Matrix,
) -> std::result::Result<Vector, FailureReason> {
    let n = m.nrows();
    let mut y: Vector = Array1::from_elem(n, ctx.zero());
    for i in 0..n {
        let numerator = &m[[i, n]] - partial_dot(ctx, (0..i).map(|j| &m[[i, j]] * &y[j]));
        y[i] = numerator.checked_div(&m[[i, i]])?;
    }
    Ok(y)
}

/// LU decomposition solver in Doolittle, Crout or Cholesky form.
#[derive(Debug, Clone)]
pub struct LuDecomposition {
    a: Matrix,
    b: Vector,
    config: LuConfig,
}

impl LuDecomposition {
    pub fn new(a: Matrix, b: Vector, config: LuConfig) -> Result<Self> {
        validate_system(&a, &b)?;
        Ok(Self { a, b, config })
    }

    /// Compute the factors only.
    pub fn factorize(&self) -> std::result::Result<LuFactors, FailureReason> {
        let ctx = self.config.precision;
        match self.config.format {
            LuFormat::Doolittle => factorize_doolittle(ctx, &self.a),
            LuFormat::Crout => factorize_crout(ctx, &self.a, self.config.crout_pivoting),
            LuFormat::Cholesky => factorize_cholesky(ctx, &self.a),
        }
    }

    fn run(&self, trace: &mut Trace) -> std::result::Result<(Vector, LuFactors), FailureReason> {
        let ctx = self.config.precision;
        let factors = self.factorize()?;

        let mut shown = vec![
            ("L".to_string(), factors.l.clone()),
            ("U".to_string(), factors.u.clone()),
        ];
        if let Some(p) = &factors.p {
            shown.push(("P".to_string(), p.clone()));
        }
        trace.record(Step::ShowMatrices { matrices: shown });

        let pb = match &factors.p {
            Some(p) => mat_vec(ctx, p, &self.b),
            None => self.b.clone(),
        };

        let lower = augment(&factors.l, &pb);
        let y = forward_substitute(ctx, &lower)?;
        trace.record(Step::ForwardSubstitution {
            matrix: lower,
            result: y.clone(),
        });

        let upper = augment(&factors.u, &y);
        let x = back_substitute(ctx, &upper)?;
        trace.record(Step::BackSubstitution {
            matrix: upper,
            result: x.clone(),
        });

        Ok((x, factors))
    }
}

impl Solver for LuDecomposition {
    fn name(&self) -> &'static str {
        "LU Decomposition"
    }

    fn solve(&self) -> SolveOutcome {
        let started = Instant::now();
        let mut trace = Trace::new();
        match self.run(&mut trace) {
            Ok((x, factors)) => {
                log::info!(
                    "{} ({}) finished with {} steps",
                    self.name(),
                    self.config.format,
                    trace.len()
                );
                let message = format!(
                    "Solution found using {} {}.",
                    self.config.format.title(),
                    self.name()
                );
                Ok(Solution::new(x, trace.into_steps(), message, started).with_factors(factors))
            }
            Err(reason) => Err(Failure::new(reason, started)),
        }
    }
}

/// `L Lᵗ`, `L U` or `Pᵗ L U` reassembled, for checking a factorization.
pub fn reassemble(ctx: Precision, factors: &LuFactors) -> Matrix {
    let lu = matmul(ctx, &factors.l, &factors.u);
    match &factors.p {
        Some(p) => matmul(ctx, &transpose(p), &lu),
        None => lu,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{matrix_from_rows, max_abs_diff, vector_from_slice};
    use approx::assert_relative_eq;
    use ndarray::Array2;

    fn ctx() -> Precision {
        Precision::new(15).unwrap()
    }

    fn system() -> (Matrix, Vector) {
        let a = matrix_from_rows(
            ctx(),
            &[vec![2.0, -1.0, 1.0], vec![4.0, 1.0, -1.0], vec![1.0, 1.0, 1.0]],
        )
        .unwrap();
        let b = vector_from_slice(ctx(), &[1.0, 5.0, 0.0]).unwrap();
        (a, b)
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("Crout".parse::<LuFormat>().unwrap(), LuFormat::Crout);
        assert_eq!(" cholesky ".parse::<LuFormat>().unwrap(), LuFormat::Cholesky);
        assert!(matches!(
            "qr".parse::<LuFormat>(),
            Err(SolverError::UnknownLuFormat(_))
        ));
        assert_eq!(LuFormat::default(), LuFormat::Doolittle);
    }

    #[test]
    fn test_doolittle_pa_equals_lu() {
        let (a, _) = system();
        let factors = factorize_doolittle(ctx(), &a).unwrap();
        let p = factors.p.as_ref().unwrap();
        let pa = matmul(ctx(), p, &a);
        let lu = matmul(ctx(), &factors.l, &factors.u);
        assert!(max_abs_diff(&pa, &lu) < 1e-12);
        for i in 0..3 {
            assert_eq!(factors.l[[i, i]], ctx().one());
        }
        // largest first-column entry was moved up
        assert_eq!(factors.u[[0, 0]], ctx().from_i64(4));
    }

    #[test]
    fn test_crout_unit_upper() {
        let (a, _) = system();
        let factors = factorize_crout(ctx(), &a, false).unwrap();
        assert!(factors.p.is_none());
        for i in 0..3 {
            assert_eq!(factors.u[[i, i]], ctx().one());
        }
        assert!(max_abs_diff(&a, &reassemble(ctx(), &factors)) < 1e-12);
    }

    #[test]
    fn test_crout_zero_leading_entry_needs_pivoting() {
        let a = matrix_from_rows(ctx(), &[vec![0.0, 1.0], vec![2.0, 3.0]]).unwrap();
        assert!(matches!(
            factorize_crout(ctx(), &a, false),
            Err(FailureReason::NoUniqueSolution { row: 0 })
        ));

        let factors = factorize_crout(ctx(), &a, true).unwrap();
        assert!(factors.p.is_some());
        assert!(max_abs_diff(&a, &reassemble(ctx(), &factors)) < 1e-12);
    }

    #[test]
    fn test_cholesky_factor() {
        let a = matrix_from_rows(ctx(), &[vec![4.0, 2.0], vec![2.0, 3.0]]).unwrap();
        let factors = factorize_cholesky(ctx(), &a).unwrap();
        assert_eq!(factors.l[[0, 0]], ctx().from_i64(2));
        assert_eq!(factors.l[[1, 0]], ctx().from_i64(1));
        assert!(factors.l[[0, 1]].is_zero());
        assert_relative_eq!(factors.l[[1, 1]].to_f64(), 2f64.sqrt(), epsilon = 1e-12);
        assert_eq!(factors.u, transpose(&factors.l));
    }

    #[test]
    fn test_cholesky_rejects_non_spd() {
        let asym = matrix_from_rows(ctx(), &[vec![4.0, 1.0], vec![2.0, 3.0]]).unwrap();
        assert_eq!(
            factorize_cholesky(ctx(), &asym).unwrap_err(),
            FailureReason::NotSymmetric
        );

        let indefinite = matrix_from_rows(ctx(), &[vec![1.0, 2.0], vec![2.0, 1.0]]).unwrap();
        assert_eq!(
            factorize_cholesky(ctx(), &indefinite).unwrap_err(),
            FailureReason::NotPositiveDefinite { row: 1 }
        );
    }

    #[test]
    fn test_cholesky_rejects_vanishing_radicand() {
        let ctx = Precision::new(40).unwrap();
        let rows = [
            ["1", "1", "0"],
            ["1", "1.000000000000000000000000000001", "0"],
            ["0", "0", "1"],
        ];
        // semidefinite up to a 1e-30 perturbation
        let a = Array2::from_shape_fn((3, 3), |(i, j)| ctx.parse(rows[i][j]).unwrap());
        assert_eq!(
            factorize_cholesky(ctx, &a).unwrap_err(),
            FailureReason::NotPositiveDefinite { row: 1 }
        );
    }

    #[test]
    fn test_lu_solve_all_formats() {
        let a = matrix_from_rows(
            ctx(),
            &[vec![4.0, 1.0, 2.0], vec![1.0, 5.0, 1.0], vec![2.0, 1.0, 6.0]],
        )
        .unwrap();
        let b = vector_from_slice(ctx(), &[7.0, 7.0, 9.0]).unwrap();
        for format in [LuFormat::Doolittle, LuFormat::Crout, LuFormat::Cholesky] {
            let config = LuConfig::default().with_precision(ctx()).with_format(format);
            let solution = LuDecomposition::new(a.clone(), b.clone(), config)
                .unwrap()
                .solve()
                .unwrap();
            for v in solution.x.iter() {
                assert_relative_eq!(v.to_f64(), 1.0, epsilon = 1e-12);
            }
            let kinds: Vec<_> = solution.steps.iter().map(Step::step_type).collect();
            assert_eq!(
                kinds,
                vec!["show-matrices", "forward-substitution", "back-substitution"]
            );
            let factors = solution.factors.as_ref().unwrap();
            assert_eq!(factors.format, format);
            assert_eq!(factors.p.is_some(), format != LuFormat::Cholesky);
        }
    }

    #[test]
    fn test_lu_message_names_format() {
        let (a, b) = system();
        let config = LuConfig::default().with_precision(ctx()).with_format(LuFormat::Crout);
        let solution = LuDecomposition::new(a, b, config).unwrap().solve().unwrap();
        assert_eq!(
            solution.message,
            "Solution found using Crout LU Decomposition."
        );
    }
}
