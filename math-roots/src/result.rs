//! Root finder results
//!
//! A run ends in a [`RootEstimate`] (converged or not) or a [`RootFailure`]
//! when the method could not continue. [`RootReport`] flattens either side into
//! the serializable shape consumed by front ends.

use crate::error::RootFailureReason;
use math_trace_decimal::Decimal;
use serde::Serialize;
use std::time::{Duration, Instant};

/// One entry of the iteration trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IterationRecord {
    /// 0 for the starting point of open methods
    pub iteration: usize,
    pub estimate: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative_error: Option<Decimal>,
}

/// Best estimate produced by a finder.
#[derive(Debug, Clone)]
pub struct RootEstimate {
    pub root: Decimal,
    /// Relative change of the last iteration
    pub relative_error: Option<Decimal>,
    /// Correct significant figures implied by `relative_error`
    pub significant_figures: Option<usize>,
    pub iterations: usize,
    pub converged: bool,
    pub message: String,
    pub execution_time: Duration,
    pub trace: Vec<IterationRecord>,
}

/// A run the method could not finish.
#[derive(Debug, Clone)]
pub struct RootFailure {
    pub reason: RootFailureReason,
    pub message: String,
    /// Last estimate computed before the failure, if any
    pub last_estimate: Option<Decimal>,
    pub iterations: usize,
    pub execution_time: Duration,
}

impl RootFailure {
    pub(crate) fn new(
        method: &str,
        reason: RootFailureReason,
        iterations: usize,
        last_estimate: Option<Decimal>,
        started: Instant,
    ) -> Self {
        let message = if iterations == 0 {
            format!("{method} method can't start: {reason}")
        } else {
            format!("{method} method can't continue at iteration {iterations}: {reason}")
        };
        log::warn!("{message}");
        Self {
            reason,
            message,
            last_estimate,
            iterations,
            execution_time: started.elapsed(),
        }
    }
}

/// Outcome of [`Finder::find`](crate::Finder::find).
pub type RootOutcome = Result<RootEstimate, RootFailure>;

/// Flat serializable view of a [`RootOutcome`]; absent fields are omitted.
#[derive(Debug, Clone, Serialize)]
pub struct RootReport {
    pub message: String,
    pub execution_time: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub absolute_relative_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_correct_significant_figures: Option<usize>,
    pub number_of_iterations: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub converged: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iterations: Option<Vec<IterationRecord>>,
}

impl From<&RootOutcome> for RootReport {
    fn from(outcome: &RootOutcome) -> Self {
        match outcome {
            Ok(estimate) => Self {
                message: estimate.message.clone(),
                execution_time: estimate.execution_time.as_secs_f64(),
                root: Some(estimate.root.to_string()),
                absolute_relative_error: estimate.relative_error.as_ref().map(Decimal::to_string),
                number_of_correct_significant_figures: estimate.significant_figures,
                number_of_iterations: estimate.iterations,
                converged: Some(estimate.converged),
                iterations: Some(estimate.trace.clone()),
            },
            Err(failure) => Self {
                message: failure.message.clone(),
                execution_time: failure.execution_time.as_secs_f64(),
                root: failure.last_estimate.as_ref().map(Decimal::to_string),
                absolute_relative_error: None,
                number_of_correct_significant_figures: None,
                number_of_iterations: failure.iterations,
                converged: None,
                iterations: None,
            },
        }
    }
}
