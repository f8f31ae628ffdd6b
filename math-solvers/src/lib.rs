//! Step-by-step solvers for dense linear systems
//!
//! This crate solves `A x = b` in exact decimal arithmetic and records every
//! intermediate operation so that a front end can replay the solve.
//!
//! # Features
//!
//! - **Direct Solvers**: Gauss elimination, Gauss-Jordan, LU decomposition
//!   (Doolittle, Crout, Cholesky)
//! - **Iterative Solvers**: Jacobi, Gauss-Seidel
//! - **Traces**: row swaps, scalings, eliminations, substitutions and sweeps,
//!   each with before/after snapshots
//! - **Problem Files**: JSON problems and a method-name factory
//!
//! # Example
//!
//! ```
//! use math_trace_decimal::Precision;
//! use math_trace_solvers::{
//!     EliminationConfig, GaussElimination, Solver, matrix_from_rows, vector_from_slice,
//! };
//!
//! let ctx = Precision::new(10).unwrap();
//! let a = matrix_from_rows(ctx, &[vec![2.0, 1.0], vec![1.0, 3.0]]).unwrap();
//! let b = vector_from_slice(ctx, &[3.0, 5.0]).unwrap();
//!
//! let solver = GaussElimination::new(a, b, EliminationConfig::default()).unwrap();
//! let solution = solver.solve().unwrap();
//! assert_eq!(solution.x[0].to_string(), "0.8");
//! ```

pub mod config;
pub mod direct;
pub mod error;
pub mod iterative;
pub mod matrix;
pub mod parallel;
pub mod result;
pub mod step;
pub mod traits;

// Re-export main types
pub use error::{FailureReason, Result, SolverError};
pub use matrix::{Matrix, Vector, matrix_from_rows, vector_from_slice};
pub use result::{
    Failure, IterationReport, LuFactors, SolutionReport, SolveOutcome, Solution,
};
pub use step::{IterationMethod, Step, Trace};
pub use traits::Solver;

// Re-export direct solvers
pub use direct::{
    EliminationConfig, GaussElimination, GaussJordan, LuConfig, LuDecomposition, LuFormat,
};

// Re-export iterative solvers
pub use iterative::{
    GaussSeidel, IterativeConfig, IterativeConfigBuilder, Jacobi, StoppingCriterion,
};

pub use config::{Method, SolverParameters, SystemProblem, create_solver};
pub use parallel::solve_batch;
