//! Solve results
//!
//! A run either produces a [`Solution`] or a [`Failure`]; there is no state in
//! between. [`SolutionReport`] flattens either side into the serializable shape
//! consumed by front ends.

use crate::direct::LuFormat;
use crate::error::FailureReason;
use crate::matrix::{Matrix, Vector};
use crate::step::{Step, matrix_to_json};
use math_trace_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use std::time::{Duration, Instant};

/// Convergence diagnostics of an iterative run.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationReport {
    /// Sweeps performed
    pub count: usize,
    /// Whether the stopping tolerance was met
    pub converged: bool,
    /// Relative error of the last sweep
    pub relative_error: Option<Decimal>,
    /// Estimated correct significant digits
    pub significant_digits: usize,
}

/// Factors computed by an LU decomposition.
#[derive(Debug, Clone, PartialEq)]
pub struct LuFactors {
    pub format: LuFormat,
    pub l: Matrix,
    pub u: Matrix,
    /// Row permutation, present when pivoting was applied
    pub p: Option<Matrix>,
}

/// A successful solve.
#[derive(Debug, Clone)]
pub struct Solution {
    pub x: Vector,
    pub steps: Vec<Step>,
    pub message: String,
    pub execution_time: Duration,
    pub iterations: Option<IterationReport>,
    pub factors: Option<LuFactors>,
}

impl Solution {
    pub(crate) fn new(x: Vector, steps: Vec<Step>, message: String, started: Instant) -> Self {
        Self {
            x,
            steps,
            message,
            execution_time: started.elapsed(),
            iterations: None,
            factors: None,
        }
    }

    pub(crate) fn with_iterations(mut self, report: IterationReport) -> Self {
        self.iterations = Some(report);
        self
    }

    pub(crate) fn with_factors(mut self, factors: LuFactors) -> Self {
        self.factors = Some(factors);
        self
    }
}

/// A solve that could not produce a solution.
#[derive(Debug, Clone)]
pub struct Failure {
    pub reason: FailureReason,
    pub message: String,
    pub execution_time: Duration,
    /// Iterations completed before the failure
    pub iterations: usize,
}

impl Failure {
    pub(crate) fn new(reason: FailureReason, started: Instant) -> Self {
        let message = reason.to_string();
        log::warn!("solve failed: {message}");
        Self {
            reason,
            message,
            execution_time: started.elapsed(),
            iterations: 0,
        }
    }

    pub(crate) fn after_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }
}

/// Outcome of [`Solver::solve`](crate::Solver::solve).
pub type SolveOutcome = Result<Solution, Failure>;

/// Flat serializable view of a [`SolveOutcome`]; absent fields are omitted.
#[derive(Debug, Clone, Serialize)]
pub struct SolutionReport {
    pub message: String,
    pub execution_time: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solution: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_iterations: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub converged: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub significant_digits: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub absolute_relative_error: Option<String>,
    #[serde(rename = "L", skip_serializing_if = "Option::is_none")]
    pub l: Option<Value>,
    #[serde(rename = "U", skip_serializing_if = "Option::is_none")]
    pub u: Option<Value>,
    #[serde(rename = "P", skip_serializing_if = "Option::is_none")]
    pub p: Option<Value>,
}

impl From<&SolveOutcome> for SolutionReport {
    fn from(outcome: &SolveOutcome) -> Self {
        match outcome {
            Ok(solution) => {
                let iterations = solution.iterations.as_ref();
                let factors = solution.factors.as_ref();
                Self {
                    message: solution.message.clone(),
                    execution_time: solution.execution_time.as_secs_f64(),
                    solution: Some(solution.x.iter().map(Decimal::to_string).collect()),
                    steps: Some(solution.steps.iter().map(Step::to_json).collect()),
                    number_of_iterations: iterations.map(|r| r.count),
                    converged: iterations.map(|r| r.converged),
                    significant_digits: iterations.map(|r| r.significant_digits),
                    absolute_relative_error: iterations
                        .and_then(|r| r.relative_error.as_ref())
                        .map(Decimal::to_string),
                    l: factors.map(|f| matrix_to_json(&f.l)),
                    u: factors.map(|f| matrix_to_json(&f.u)),
                    p: factors.and_then(|f| f.p.as_ref()).map(matrix_to_json),
                }
            }
            Err(failure) => Self {
                message: failure.message.clone(),
                execution_time: failure.execution_time.as_secs_f64(),
                solution: None,
                steps: None,
                number_of_iterations: None,
                converged: None,
                significant_digits: None,
                absolute_relative_error: None,
                l: None,
                u: None,
                p: None,
            },
        }
    }
}
