//! Parallel utilities with feature-gated implementations
//!
//! Solvers share no state, so independent systems can be solved side by side.
//! With the `rayon` feature the work is spread over the rayon thread pool;
//! without it the same functions run sequentially.

use crate::result::SolveOutcome;
use crate::traits::Solver;

/// Check if parallel processing is available
#[cfg(feature = "rayon")]
pub fn is_parallel_available() -> bool {
    true
}

/// Check if parallel processing is available
#[cfg(not(feature = "rayon"))]
pub fn is_parallel_available() -> bool {
    false
}

/// Parallel map over a slice
#[cfg(feature = "rayon")]
pub fn parallel_map<T, U, F>(data: &[T], f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync + Send,
{
    use rayon::prelude::*;
    data.par_iter().map(f).collect()
}

/// Sequential map (fallback when parallel is not available)
#[cfg(not(feature = "rayon"))]
pub fn parallel_map<T, U, F>(data: &[T], f: F) -> Vec<U>
where
    F: Fn(&T) -> U,
{
    data.iter().map(f).collect()
}

/// Solve every system in `solvers`, returning outcomes in input order.
pub fn solve_batch<S>(solvers: &[S]) -> Vec<SolveOutcome>
where
    S: Solver,
{
    log::debug!(
        "solving {} systems ({})",
        solvers.len(),
        if is_parallel_available() {
            "parallel"
        } else {
            "sequential"
        }
    );
    parallel_map(solvers, |s| s.solve())
}
