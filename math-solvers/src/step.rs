//! Step-by-step trace of a solve
//!
//! Every row operation, substitution sweep and iteration appends one [`Step`]
//! to a [`Trace`]. A step owns copies of the matrices it describes, taken
//! before and after the operation, so the caller can replay the whole solve.

use crate::matrix::{Matrix, Vector};
use math_trace_decimal::Decimal;
use serde_json::{Value, json};

/// Which iterative method produced an [`Step::Iteration`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterationMethod {
    Jacobi,
    GaussSeidel,
}

impl IterationMethod {
    /// Wire name of the method
    pub fn as_str(&self) -> &'static str {
        match self {
            IterationMethod::Jacobi => "jacobi",
            IterationMethod::GaussSeidel => "gauss-seidel",
        }
    }
}

/// One recorded operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// `R_target <-> R_source` on the augmented matrix
    RowSwap {
        target_row: usize,
        source_row: usize,
        before: Matrix,
        after: Matrix,
    },
    /// `R_row <- factor * R_row`
    RowScale {
        row: usize,
        factor: Decimal,
        before: Matrix,
        after: Matrix,
    },
    /// `R_target <- R_target + factor * R_source`
    RowAdd {
        target_row: usize,
        source_row: usize,
        factor: Decimal,
        before: Matrix,
        after: Matrix,
    },
    /// Solve a lower-triangular augmented system top-down
    ForwardSubstitution { matrix: Matrix, result: Vector },
    /// Solve an upper-triangular augmented system bottom-up
    BackSubstitution { matrix: Matrix, result: Vector },
    /// One sweep of an iterative method
    Iteration {
        method: IterationMethod,
        index: usize,
        matrix: Matrix,
        old_solution: Vector,
        new_solution: Vector,
        relative_error: Decimal,
    },
    /// Named matrices to display, e.g. the factors of an LU decomposition
    ShowMatrices { matrices: Vec<(String, Matrix)> },
}

impl Step {
    /// Wire tag of the variant
    pub fn step_type(&self) -> &'static str {
        match self {
            Step::RowSwap { .. } => "row-swap",
            Step::RowScale { .. } => "row-scale",
            Step::RowAdd { .. } => "row-add",
            Step::ForwardSubstitution { .. } => "forward-substitution",
            Step::BackSubstitution { .. } => "back-substitution",
            Step::Iteration { .. } => "iteration",
            Step::ShowMatrices { .. } => "show-matrices",
        }
    }

    /// Serialize for display. Matrices become nested lists of decimal strings.
    pub fn to_json(&self) -> Value {
        let step_type = self.step_type();
        match self {
            Step::RowSwap {
                target_row,
                source_row,
                before,
                after,
            } => json!({
                "step_type": step_type,
                "target_row": target_row,
                "source_row": source_row,
                "old_matrix": matrix_to_json(before),
                "new_matrix": matrix_to_json(after),
            }),
            Step::RowScale {
                row,
                factor,
                before,
                after,
            } => json!({
                "step_type": step_type,
                "target_row": row,
                "factor": factor.to_string(),
                "old_matrix": matrix_to_json(before),
                "new_matrix": matrix_to_json(after),
            }),
            Step::RowAdd {
                target_row,
                source_row,
                factor,
                before,
                after,
            } => json!({
                "step_type": step_type,
                "target_row": target_row,
                "source_row": source_row,
                "factor": factor.to_string(),
                "old_matrix": matrix_to_json(before),
                "new_matrix": matrix_to_json(after),
            }),
            Step::ForwardSubstitution { matrix, result }
            | Step::BackSubstitution { matrix, result } => json!({
                "step_type": step_type,
                "matrix": matrix_to_json(matrix),
                "result": vector_to_json(result),
            }),
            Step::Iteration {
                method,
                index,
                matrix,
                old_solution,
                new_solution,
                relative_error,
            } => json!({
                "step_type": step_type,
                "iteration_type": method.as_str(),
                "iteration": index,
                "matrix": matrix_to_json(matrix),
                "old_solution": vector_to_json(old_solution),
                "new_solution": vector_to_json(new_solution),
                "absolute_relative_error": relative_error.to_string(),
            }),
            Step::ShowMatrices { matrices } => {
                let map: serde_json::Map<String, Value> = matrices
                    .iter()
                    .map(|(name, m)| (name.clone(), matrix_to_json(m)))
                    .collect();
                json!({
                    "step_type": step_type,
                    "matrices": map,
                })
            }
        }
    }
}

pub fn matrix_to_json(m: &Matrix) -> Value {
    Value::Array(
        m.rows()
            .into_iter()
            .map(|row| Value::Array(row.iter().map(|v| Value::String(v.to_string())).collect()))
            .collect(),
    )
}

pub fn vector_to_json(v: &Vector) -> Value {
    Value::Array(v.iter().map(|x| Value::String(x.to_string())).collect())
}

/// Append-only log of steps for one solver run.
#[derive(Debug, Default)]
pub struct Trace {
    steps: Vec<Step>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step.
    pub fn record(&mut self, step: Step) {
        log::debug!("step {}: {}", self.steps.len() + 1, step.step_type());
        self.steps.push(step);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Hand the recorded steps over to the result.
    pub fn into_steps(self) -> Vec<Step> {
        self.steps
    }
}
