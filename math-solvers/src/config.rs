//! JSON problem files and the solver factory
//!
//! A problem file names a method, the system and the method parameters:
//!
//! ```json
//! {
//!   "method": "lu-decomposition",
//!   "coefficients": [[4, 2], [2, 3]],
//!   "constants": [1, 2],
//!   "precision": 8,
//!   "parameters": { "format": "cholesky" }
//! }
//! ```
//!
//! Numbers may also be given as strings (`"2.099"`) so that they reach the
//! solver without passing through a binary float.

use crate::direct::{
    EliminationConfig, GaussElimination, GaussJordan, LuConfig, LuDecomposition, LuFormat,
};
use crate::error::{Result, SolverError};
use crate::iterative::{GaussSeidel, IterativeConfig, Jacobi};
use crate::matrix::{Matrix, Vector};
use crate::traits::Solver;
use math_trace_decimal::{Decimal, Precision};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Methods the factory can build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Method {
    GaussElimination,
    GaussJordanElimination,
    LuDecomposition,
    JacobiIteration,
    GaussSeidelIteration,
}

impl Method {
    pub const ALL: [Method; 5] = [
        Method::GaussElimination,
        Method::GaussJordanElimination,
        Method::LuDecomposition,
        Method::JacobiIteration,
        Method::GaussSeidelIteration,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GaussElimination => "gauss-elimination",
            Method::GaussJordanElimination => "gauss-jordan-elimination",
            Method::LuDecomposition => "lu-decomposition",
            Method::JacobiIteration => "jacobi-iteration",
            Method::GaussSeidelIteration => "gauss-seidel-iteration",
        }
    }

    /// Whether the method is Jacobi or Gauss-Seidel
    pub fn is_iterative(&self) -> bool {
        matches!(
            self,
            Method::JacobiIteration | Method::GaussSeidelIteration
        )
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Method::ALL
            .into_iter()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| SolverError::UnknownMethod(s.to_string()))
    }
}

/// A number given either as a JSON number or as a decimal string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DecimalInput {
    Number(f64),
    Text(String),
}

impl DecimalInput {
    /// Round to `ctx`; strings are parsed exactly.
    pub fn to_decimal(&self, ctx: Precision) -> Result<Decimal> {
        match self {
            DecimalInput::Number(v) => Ok(ctx.from_f64(*v)?),
            DecimalInput::Text(s) => Ok(ctx.parse(s)?),
        }
    }

    pub fn to_f64(&self) -> Result<f64> {
        match self {
            DecimalInput::Number(v) => Ok(*v),
            DecimalInput::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|e| SolverError::Config(format!("invalid number '{s}': {e}"))),
        }
    }
}

impl From<f64> for DecimalInput {
    fn from(v: f64) -> Self {
        DecimalInput::Number(v)
    }
}

/// Method-specific parameters; each method reads only the ones it uses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverParameters {
    /// Scaled partial pivoting for Gauss and Gauss-Jordan
    pub scaling: bool,
    /// LU form: `doolittle`, `crout` or `cholesky`
    pub format: Option<String>,
    /// Partial pivoting for the Crout form; on unless set to `false`
    pub crout_pivoting: Option<bool>,
    /// Starting vector for iterative methods
    pub initial_guess: Option<Vec<DecimalInput>>,
    /// Fixed sweep count for iterative methods
    pub number_of_iterations: Option<usize>,
    /// Tolerance for iterative methods
    pub absolute_relative_error: Option<DecimalInput>,
    /// Sweep cap in tolerance mode
    pub max_iterations: Option<usize>,
}

/// A linear system and the method to solve it with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemProblem {
    pub method: String,
    pub coefficients: Vec<Vec<DecimalInput>>,
    pub constants: Vec<DecimalInput>,
    /// Significant digits; the default precision when absent
    #[serde(default)]
    pub precision: Option<usize>,
    #[serde(default)]
    pub parameters: SolverParameters,
}

impl SystemProblem {
    /// Load a problem from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| SolverError::Config(format!("Failed to read config file: {}", e)))?;
        Self::from_json_str(&contents)
    }

    /// Parse a problem from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| SolverError::Config(format!("Failed to parse JSON: {}", e)))
    }

    /// Save the problem as pretty-printed JSON
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| SolverError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, json)
            .map_err(|e| SolverError::Config(format!("Failed to write config file: {}", e)))
    }

    pub fn precision(&self) -> Result<Precision> {
        match self.precision {
            Some(digits) => Ok(Precision::new(digits)?),
            None => Ok(Precision::default()),
        }
    }

    /// Coefficient matrix and constants rounded to the problem precision.
    pub fn system(&self) -> Result<(Matrix, Vector)> {
        let ctx = self.precision()?;
        let rows = self.coefficients.len();
        let cols = self.coefficients.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows * cols);
        for row in &self.coefficients {
            if row.len() != cols {
                return Err(SolverError::NotSquare {
                    rows,
                    cols: row.len(),
                });
            }
            for v in row {
                data.push(v.to_decimal(ctx)?);
            }
        }
        let a = Array2::from_shape_vec((rows, cols), data)
            .map_err(|e| SolverError::Config(e.to_string()))?;
        let b = self
            .constants
            .iter()
            .map(|v| v.to_decimal(ctx))
            .collect::<Result<Vector>>()?;
        Ok((a, b))
    }

    /// Build the configured solver.
    ///
    /// # Errors
    /// Unknown method or LU format, malformed numbers, shape errors and
    /// conflicting iterative stopping criteria.
    pub fn build_solver(&self) -> Result<Box<dyn Solver>> {
        let method: Method = self.method.parse()?;
        let ctx = self.precision()?;
        let (a, b) = self.system()?;
        create_solver(method, a, b, ctx, &self.parameters)
    }
}

/// Route a method and its parameters to a boxed solver.
pub fn create_solver(
    method: Method,
    a: Matrix,
    b: Vector,
    ctx: Precision,
    params: &SolverParameters,
) -> Result<Box<dyn Solver>> {
    log::debug!("building {method} solver for a {}x{} system", a.nrows(), a.ncols());
    let elimination = EliminationConfig::default()
        .with_precision(ctx)
        .with_scaling(params.scaling);

    match method {
        Method::GaussElimination => Ok(Box::new(GaussElimination::new(a, b, elimination)?)),
        Method::GaussJordanElimination => Ok(Box::new(GaussJordan::new(a, b, elimination)?)),
        Method::LuDecomposition => {
            let format: LuFormat = match &params.format {
                Some(f) => f.parse()?,
                None => LuFormat::default(),
            };
            let config = LuConfig::default()
                .with_precision(ctx)
                .with_format(format)
                .with_crout_pivoting(params.crout_pivoting.unwrap_or(true));
            Ok(Box::new(LuDecomposition::new(a, b, config)?))
        }
        Method::JacobiIteration | Method::GaussSeidelIteration => {
            let config = iterative_config(ctx, params)?;
            if method == Method::JacobiIteration {
                Ok(Box::new(Jacobi::new(a, b, config)?))
            } else {
                Ok(Box::new(GaussSeidel::new(a, b, config)?))
            }
        }
    }
}

fn iterative_config(ctx: Precision, params: &SolverParameters) -> Result<IterativeConfig> {
    let mut builder = IterativeConfig::builder().precision(ctx);
    if let Some(guess) = &params.initial_guess {
        let values = guess
            .iter()
            .map(DecimalInput::to_f64)
            .collect::<Result<Vec<_>>>()?;
        builder = builder.initial_guess(values);
    }
    if let Some(n) = params.number_of_iterations {
        builder = builder.number_of_iterations(n);
    }
    if let Some(tol) = &params.absolute_relative_error {
        builder = builder.absolute_relative_error(tol.to_f64()?);
    }
    if let Some(cap) = params.max_iterations {
        builder = builder.max_iterations(cap);
    }
    builder.build()
}
