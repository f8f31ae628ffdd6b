//! Named functions (and their derivatives) available to problem files and the CLI

use crate::function::{Polynomial, SharedFunction, from_f64_fn};
use std::collections::HashMap;

/// A function together with its derivative, when one is known.
#[derive(Clone)]
pub struct RegisteredFunction {
    /// Formula shown by `--list-functions`
    pub formula: &'static str,
    pub function: SharedFunction,
    pub derivative: Option<SharedFunction>,
}

impl RegisteredFunction {
    pub fn new(formula: &'static str, function: SharedFunction) -> Self {
        Self {
            formula,
            function,
            derivative: None,
        }
    }

    pub fn with_derivative(mut self, derivative: SharedFunction) -> Self {
        self.derivative = Some(derivative);
        self
    }

    fn polynomial(formula: &'static str, coefficients: Vec<f64>) -> Self {
        let p = Polynomial::new(coefficients);
        let dp = p.derivative();
        Self::new(formula, p.shared()).with_derivative(dp.shared())
    }
}

/// Function registry mapping names to functions.
pub struct FunctionRegistry {
    functions: HashMap<String, RegisteredFunction>,
}

impl FunctionRegistry {
    /// Creates a new registry with the built-in functions.
    pub fn new() -> Self {
        let mut functions = HashMap::new();

        // Polynomials, evaluated exactly
        functions.insert(
            "sqrt2".to_string(),
            RegisteredFunction::polynomial("x^2 - 2", vec![-2.0, 0.0, 1.0]),
        );
        functions.insert(
            "cubic".to_string(),
            RegisteredFunction::polynomial("x^3 - x - 2", vec![-2.0, -1.0, 0.0, 1.0]),
        );
        functions.insert(
            "double_root".to_string(),
            RegisteredFunction::polynomial("x^3 - 3x + 2", vec![2.0, -3.0, 0.0, 1.0]),
        );

        // Transcendental roots
        functions.insert(
            "exp_minus_x".to_string(),
            RegisteredFunction::new("exp(-x) - x", from_f64_fn(|x| (-x).exp() - x))
                .with_derivative(from_f64_fn(|x| -(-x).exp() - 1.0)),
        );
        functions.insert(
            "cos_minus_x".to_string(),
            RegisteredFunction::new("cos(x) - x", from_f64_fn(|x| x.cos() - x))
                .with_derivative(from_f64_fn(|x| -x.sin() - 1.0)),
        );
        functions.insert(
            "ln_minus_one".to_string(),
            RegisteredFunction::new("ln(x) - 1", from_f64_fn(|x| x.ln() - 1.0))
                .with_derivative(from_f64_fn(|x| 1.0 / x)),
        );

        // Iteration maps for fixed-point
        functions.insert(
            "cos".to_string(),
            RegisteredFunction::new("cos(x)", from_f64_fn(f64::cos))
                .with_derivative(from_f64_fn(|x| -x.sin())),
        );
        functions.insert(
            "exp_neg".to_string(),
            RegisteredFunction::new("exp(-x)", from_f64_fn(|x| (-x).exp()))
                .with_derivative(from_f64_fn(|x| -(-x).exp())),
        );

        Self { functions }
    }

    /// Add or replace a function.
    pub fn register(&mut self, name: impl Into<String>, entry: RegisteredFunction) {
        self.functions.insert(name.into(), entry);
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredFunction> {
        self.functions.get(name)
    }

    /// Look up a name, falling back to a case-insensitive match.
    pub fn resolve(&self, requested: &str) -> Option<(&str, &RegisteredFunction)> {
        let requested = requested.trim();
        if let Some((name, entry)) = self.functions.get_key_value(requested) {
            return Some((name.as_str(), entry));
        }
        self.functions
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(requested))
            .map(|(name, entry)| (name.as_str(), entry))
    }

    /// Sorted function names
    pub fn list_functions(&self) -> Vec<String> {
        let mut names: Vec<String> = self.functions.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &RegisteredFunction)> {
        self.functions.iter()
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::decimal_fn;
    use approx::assert_relative_eq;
    use math_trace_decimal::Precision;

    #[test]
    fn test_builtins_have_derivatives() {
        let registry = FunctionRegistry::new();
        assert!(registry.list_functions().contains(&"sqrt2".to_string()));
        for (name, entry) in registry.iter() {
            assert!(entry.derivative.is_some(), "{name} has no derivative");
        }
    }

    #[test]
    fn test_registered_values() {
        let ctx = Precision::default();
        let registry = FunctionRegistry::new();
        let two = ctx.from_i64(2);

        let sqrt2 = registry.get("sqrt2").unwrap();
        assert_eq!(sqrt2.function.eval(&two).unwrap().to_string(), "2");
        let d = sqrt2.derivative.as_ref().unwrap();
        assert_eq!(d.eval(&two).unwrap().to_string(), "4");

        let cos = registry.get("cos_minus_x").unwrap();
        let y = cos.function.eval(&ctx.zero()).unwrap();
        assert_relative_eq!(y.to_f64(), 1.0);
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let registry = FunctionRegistry::new();
        let (name, _) = registry.resolve(" Double_Root ").unwrap();
        assert_eq!(name, "double_root");
        assert!(registry.resolve("tan").is_none());
    }

    #[test]
    fn test_register_custom() {
        let mut registry = FunctionRegistry::default();
        let two = Precision::default().from_i64(2);
        registry.register(
            "half",
            RegisteredFunction::new("x / 2", decimal_fn(move |x| Ok(x.checked_div(&two)?))),
        );
        let entry = registry.get("half").unwrap();
        assert!(entry.derivative.is_none());
        let ctx = Precision::default();
        assert_eq!(entry.function.eval(&ctx.one()).unwrap().to_string(), "0.5");
    }
}
