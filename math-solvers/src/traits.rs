//! Core traits for linear system solvers
//!
//! - [`Solver`]: anything that can run a solve on the system it was built with
//!
//! Every direct and iterative method implements [`Solver`], which lets the
//! factory in [`config`](crate::config) hand out `Box<dyn Solver>` values and
//! lets [`solve_batch`](crate::parallel::solve_batch) run them side by side.

use crate::result::SolveOutcome;

/// A configured solver for one linear system `A x = b`.
///
/// Construction validates shapes and options; [`solve`](Solver::solve) never
/// panics on a well-formed system. Structural problems (singular pivot, zero
/// diagonal, ...) come back as the `Err` side of the outcome.
///
/// Solvers own their inputs and clone them for each run, so calling `solve`
/// twice yields identical outcomes.
pub trait Solver: Send + Sync {
    /// Human-readable method name
    fn name(&self) -> &'static str;

    /// Run the method to completion.
    fn solve(&self) -> SolveOutcome;
}

impl<S: Solver + ?Sized> Solver for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn solve(&self) -> SolveOutcome {
        (**self).solve()
    }
}
