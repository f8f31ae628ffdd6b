//! Direct solvers for linear systems
//!
//! This module provides direct (non-iterative) solvers:
//! - [`GaussElimination`]: forward elimination and back substitution
//! - [`GaussJordan`]: reduction of `[A | b]` to `[I | x]`
//! - [`LuDecomposition`]: Doolittle, Crout or Cholesky factorization
//!
//! Gauss and Gauss-Jordan share the pivoting and row-reduction primitives of
//! the `elimination` module.

mod elimination;
mod gauss;
mod gauss_jordan;
mod lu;

pub use elimination::EliminationConfig;
pub use gauss::GaussElimination;
pub use gauss_jordan::GaussJordan;
pub use lu::{
    LuConfig, LuDecomposition, LuFormat, factorize_cholesky, factorize_crout, factorize_doolittle,
    reassemble,
};
