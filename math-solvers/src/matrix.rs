//! Dense decimal matrices and vectors
//!
//! Thin helpers over `ndarray` containers of [`Decimal`]. Every solver takes
//! its own owned copy of the system, so nothing here shares state.

use crate::error::{Result, SolverError};
use math_trace_decimal::{Decimal, Precision};
use ndarray::{Array1, Array2};

/// Square row-major coefficient matrix
pub type Matrix = Array2<Decimal>;

/// Right-hand side or solution vector
pub type Vector = Array1<Decimal>;

/// Build a matrix from rows of floats, rounding each entry to `ctx`.
///
/// # Errors
/// `NotSquare` if rows have differing lengths, `Numeric` for non-finite entries.
pub fn matrix_from_rows(ctx: Precision, rows: &[Vec<f64>]) -> Result<Matrix> {
    let n_rows = rows.len();
    let n_cols = rows.first().map_or(0, Vec::len);
    if let Some(bad) = rows.iter().find(|r| r.len() != n_cols) {
        return Err(SolverError::NotSquare {
            rows: n_rows,
            cols: bad.len(),
        });
    }

    let mut data = Vec::with_capacity(n_rows * n_cols);
    for row in rows {
        for &v in row {
            data.push(ctx.from_f64(v)?);
        }
    }
    Array2::from_shape_vec((n_rows, n_cols), data)
        .map_err(|e| SolverError::Config(e.to_string()))
}

/// Build a vector from floats, rounding each entry to `ctx`.
pub fn vector_from_slice(ctx: Precision, values: &[f64]) -> Result<Vector> {
    values
        .iter()
        .map(|&v| ctx.from_f64(v).map_err(SolverError::from))
        .collect()
}

/// Check that `a` is a non-empty square matrix matching `b`.
pub fn validate_system(a: &Matrix, b: &Vector) -> Result<()> {
    let (rows, cols) = a.dim();
    if rows == 0 {
        return Err(SolverError::Empty);
    }
    if rows != cols {
        return Err(SolverError::NotSquare { rows, cols });
    }
    if b.len() != rows {
        return Err(SolverError::DimensionMismatch {
            expected: rows,
            got: b.len(),
        });
    }
    Ok(())
}

pub fn zeros(ctx: Precision, n: usize) -> Matrix {
    Array2::from_elem((n, n), ctx.zero())
}

pub fn identity(ctx: Precision, n: usize) -> Matrix {
    Array2::from_shape_fn((n, n), |(i, j)| if i == j { ctx.one() } else { ctx.zero() })
}

/// Permutation matrix whose row `i` selects original row `perm[i]`.
pub fn permutation_matrix(ctx: Precision, perm: &[usize]) -> Matrix {
    let n = perm.len();
    Array2::from_shape_fn((n, n), |(i, j)| {
        if perm[i] == j { ctx.one() } else { ctx.zero() }
    })
}

/// The augmented matrix `[A | b]`.
pub fn augment(a: &Matrix, b: &Vector) -> Matrix {
    let n = a.nrows();
    Array2::from_shape_fn((n, a.ncols() + 1), |(i, j)| {
        if j < a.ncols() {
            a[[i, j]].clone()
        } else {
            b[i].clone()
        }
    })
}

/// Swap two rows in place.
pub fn swap_rows(m: &mut Matrix, i: usize, j: usize) {
    if i == j {
        return;
    }
    for col in 0..m.ncols() {
        m.swap([i, col], [j, col]);
    }
}

/// Sum of already-multiplied terms, e.g. `Σ_k L[i,k]·U[k,j]`.
pub(crate) fn partial_dot<I>(ctx: Precision, terms: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    terms.into_iter().fold(ctx.zero(), |acc, t| acc + t)
}

pub fn matmul(ctx: Precision, a: &Matrix, b: &Matrix) -> Matrix {
    let (n, m) = (a.nrows(), b.ncols());
    let inner = a.ncols();
    Array2::from_shape_fn((n, m), |(i, j)| {
        partial_dot(ctx, (0..inner).map(|k| &a[[i, k]] * &b[[k, j]]))
    })
}

pub fn mat_vec(ctx: Precision, a: &Matrix, x: &Vector) -> Vector {
    Array1::from_shape_fn(a.nrows(), |i| {
        partial_dot(ctx, (0..a.ncols()).map(|k| &a[[i, k]] * &x[k]))
    })
}

pub fn transpose(a: &Matrix) -> Matrix {
    a.t().to_owned()
}

/// `allclose(A, Aᵗ)` with `|x - y| <= atol + rtol·|y|`.
pub fn is_symmetric(a: &Matrix, rtol: f64, atol: f64) -> bool {
    let n = a.nrows();
    for i in 0..n {
        for j in (i + 1)..n {
            let x = a[[i, j]].to_f64();
            let y = a[[j, i]].to_f64();
            if (x - y).abs() > atol + rtol * y.abs() {
                return false;
            }
        }
    }
    true
}

/// Largest entrywise difference, as a float.
pub fn max_abs_diff(a: &Matrix, b: &Matrix) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs().to_f64())
        .fold(0.0, f64::max)
}
