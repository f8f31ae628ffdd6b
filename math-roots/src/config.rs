//! JSON root problems and the finder factory
//!
//! ```json
//! {
//!   "method": "newton-raphson",
//!   "function": "double_root",
//!   "tolerance": 1e-6,
//!   "max_iterations": 50,
//!   "precision": 12,
//!   "parameters": { "guess": 1.5, "multiplicity": 2 }
//! }
//! ```
//!
//! Functions are looked up by name in a [`FunctionRegistry`].

use crate::bracketing::{Bisection, FalsePosition};
use crate::error::{Result, RootError};
use crate::finder::{DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE, Finder, FinderConfig};
use crate::open::{FixedPoint, NewtonRaphson, Secant};
use crate::registry::{FunctionRegistry, RegisteredFunction};
use math_trace_decimal::Precision;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Methods the factory can build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RootMethod {
    Bisection,
    FalsePosition,
    Secant,
    FixedPoint,
    NewtonRaphson,
    /// Newton-Raphson with a multiplicity, 2 unless given
    ModifiedNewtonRaphson,
}

impl RootMethod {
    pub const ALL: [RootMethod; 6] = [
        RootMethod::Bisection,
        RootMethod::FalsePosition,
        RootMethod::Secant,
        RootMethod::FixedPoint,
        RootMethod::NewtonRaphson,
        RootMethod::ModifiedNewtonRaphson,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RootMethod::Bisection => "bisection",
            RootMethod::FalsePosition => "false-position",
            RootMethod::Secant => "secant",
            RootMethod::FixedPoint => "fixed-point",
            RootMethod::NewtonRaphson => "newton-raphson",
            RootMethod::ModifiedNewtonRaphson => "modified-newton-raphson",
        }
    }

    /// Whether the method needs `lower_bound` and `upper_bound`
    pub fn is_bracketing(&self) -> bool {
        matches!(self, RootMethod::Bisection | RootMethod::FalsePosition)
    }
}

impl fmt::Display for RootMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RootMethod {
    type Err = RootError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        RootMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| RootError::UnknownMethod(s.to_string()))
    }
}

/// Method-specific parameters; each method reads only the ones it uses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RootParameters {
    pub lower_bound: Option<f64>,
    pub upper_bound: Option<f64>,
    /// Starting point of fixed-point and Newton-Raphson
    pub guess: Option<f64>,
    /// First of the two secant starting points
    pub first_guess: Option<f64>,
    /// Second of the two secant starting points
    pub second_guess: Option<f64>,
    pub multiplicity: Option<u32>,
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

/// A named function and the method to find its root with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootProblem {
    pub method: String,
    /// Registry name of the function
    pub function: String,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Significant digits; the default precision when absent
    #[serde(default)]
    pub precision: Option<usize>,
    #[serde(default)]
    pub parameters: RootParameters,
}

impl RootProblem {
    /// Load a problem from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| RootError::Config(format!("Failed to read config file: {}", e)))?;
        Self::from_json_str(&contents)
    }

    /// Parse a problem from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| RootError::Config(format!("Failed to parse JSON: {}", e)))
    }

    /// Save the problem as pretty-printed JSON
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| RootError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, json)
            .map_err(|e| RootError::Config(format!("Failed to write config file: {}", e)))
    }

    pub fn precision(&self) -> Result<Precision> {
        match self.precision {
            Some(digits) => Ok(Precision::new(digits)?),
            None => Ok(Precision::default()),
        }
    }

    pub fn finder_config(&self) -> Result<FinderConfig> {
        Ok(FinderConfig::default()
            .with_precision(self.precision()?)
            .with_tolerance(self.tolerance)
            .with_max_iterations(self.max_iterations))
    }

    /// Build the configured finder.
    ///
    /// # Errors
    /// Unknown method or function, missing parameters and invalid options.
    pub fn build_finder(&self, registry: &FunctionRegistry) -> Result<Box<dyn Finder>> {
        let method: RootMethod = self.method.parse()?;
        let (_, entry) = registry
            .resolve(&self.function)
            .ok_or_else(|| RootError::UnknownFunction(self.function.clone()))?;
        create_finder(method, entry, self.finder_config()?, &self.parameters)
    }
}

fn required(value: Option<f64>, method: RootMethod, name: &str) -> Result<f64> {
    value.ok_or_else(|| RootError::Config(format!("{method} requires the '{name}' parameter")))
}

/// Route a method and its parameters to a boxed finder.
pub fn create_finder(
    method: RootMethod,
    entry: &RegisteredFunction,
    config: FinderConfig,
    params: &RootParameters,
) -> Result<Box<dyn Finder>> {
    log::debug!("building {method} finder for {}", entry.formula);
    let f = entry.function.clone();

    match method {
        RootMethod::Bisection | RootMethod::FalsePosition => {
            let lower = required(params.lower_bound, method, "lower_bound")?;
            let upper = required(params.upper_bound, method, "upper_bound")?;
            if method == RootMethod::Bisection {
                Ok(Box::new(Bisection::new(f, lower, upper, config)?))
            } else {
                Ok(Box::new(FalsePosition::new(f, lower, upper, config)?))
            }
        }
        RootMethod::Secant => {
            let x0 = required(params.first_guess, method, "first_guess")?;
            let x1 = required(params.second_guess, method, "second_guess")?;
            Ok(Box::new(Secant::new(f, x0, x1, config)?))
        }
        RootMethod::FixedPoint => {
            let guess = required(params.guess, method, "guess")?;
            Ok(Box::new(FixedPoint::new(f, guess, config)?))
        }
        RootMethod::NewtonRaphson | RootMethod::ModifiedNewtonRaphson => {
            let guess = required(params.guess, method, "guess")?;
            let derivative = entry.derivative.clone().ok_or_else(|| {
                RootError::Config(format!("{} has no derivative registered", entry.formula))
            })?;
            let default_multiplicity = if method == RootMethod::NewtonRaphson { 1 } else { 2 };
            let multiplicity = params.multiplicity.unwrap_or(default_multiplicity);
            let finder =
                NewtonRaphson::new(f, derivative, guess, config)?.with_multiplicity(multiplicity)?;
            Ok(Box::new(finder))
        }
    }
}
