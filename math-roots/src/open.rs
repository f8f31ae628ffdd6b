//! Open methods: secant, Newton-Raphson and fixed-point iteration
//!
//! Open methods move from one estimate to the next without keeping a bracket,
//! so they may wander off. Every step is guarded: a vanishing denominator or
//! an estimate beyond [`DIVERGENCE_LIMIT`](crate::finder::DIVERGENCE_LIMIT)
//! ends the run with a [`RootFailure`](crate::result::RootFailure). A run
//! converges once the relative change of the estimate drops below the
//! tolerance, or as soon as the function vanishes exactly.

use crate::error::{Result, RootError, RootFailureReason};
use crate::finder::{Finder, FinderConfig, Run, is_diverged, relative_change};
use crate::function::SharedFunction;
use crate::result::RootOutcome;
use math_trace_decimal::{Decimal, Precision};

/// Result of one step of an open method.
pub(crate) enum Advance {
    /// Next estimate
    To(Decimal),
    /// Next estimate, at which the function is exactly zero
    Root(Decimal),
}

/// Iterate `step` from `start` until convergence, failure or the cap.
pub(crate) fn iterate<S>(
    mut run: Run<'_>,
    start: Decimal,
    max_iterations: usize,
    mut step: S,
) -> RootOutcome
where
    S: FnMut(&Decimal) -> std::result::Result<Advance, RootFailureReason>,
{
    let mut x = start;
    let mut error = None;
    run.record(0, &x, None);

    for iteration in 1..=max_iterations {
        let (next, exact) = match step(&x) {
            Ok(Advance::To(next)) => (next, false),
            Ok(Advance::Root(next)) => (next, true),
            Err(reason) => return run.fail(reason, iteration, Some(x)),
        };
        if is_diverged(&next) {
            return run.fail(RootFailureReason::Diverged, iteration, Some(x));
        }

        let change = relative_change(&next, &x);
        run.record(iteration, &next, Some(&change));
        let done = exact || change < *run.tolerance();
        error = Some(change);
        x = next;
        if done {
            return run.converged(x, error, iteration);
        }
    }
    run.exhausted(x, error, max_iterations)
}

fn validated(config: FinderConfig, guess: f64) -> Result<(Decimal, Decimal)> {
    let tolerance = config.validate()?;
    Ok((config.precision.from_f64(guess)?, tolerance))
}

/// Secant method from two starting points.
pub struct Secant {
    function: SharedFunction,
    x0: Decimal,
    x1: Decimal,
    ctx: Precision,
    tolerance: Decimal,
    max_iterations: usize,
}

impl Secant {
    pub fn new(
        function: SharedFunction,
        first_guess: f64,
        second_guess: f64,
        config: FinderConfig,
    ) -> Result<Self> {
        let (x0, tolerance) = validated(config, first_guess)?;
        let x1 = config.precision.from_f64(second_guess)?;
        Ok(Self {
            function,
            x0,
            x1,
            ctx: config.precision,
            tolerance,
            max_iterations: config.max_iterations,
        })
    }
}

impl Finder for Secant {
    fn name(&self) -> &'static str {
        "Secant"
    }

    fn find(&self) -> RootOutcome {
        let run = Run::start(self.name(), self.ctx, &self.tolerance);
        let (mut f_prev, mut f_curr) =
            match (self.function.eval(&self.x0), self.function.eval(&self.x1)) {
                (Ok(a), Ok(b)) => (a, b),
                (Err(e), _) | (_, Err(e)) => return run.fail(e.into(), 0, None),
            };
        let mut x_prev = self.x0.clone();

        iterate(run, self.x1.clone(), self.max_iterations, |x_curr| {
            if f_curr.is_zero() {
                return Ok(Advance::Root(x_curr.clone()));
            }
            let step = (&f_curr * &(x_curr - &x_prev))
                .checked_div(&(&f_curr - &f_prev))
                .map_err(|_| RootFailureReason::VanishingSecantDenominator)?;
            let x_new = x_curr - &step;
            let f_new = self.function.eval(&x_new)?;

            x_prev = x_curr.clone();
            f_prev = std::mem::replace(&mut f_curr, f_new);
            if f_curr.is_zero() {
                Ok(Advance::Root(x_new))
            } else {
                Ok(Advance::To(x_new))
            }
        })
    }
}

/// Newton-Raphson with an optional root multiplicity `m`:
/// `x_new = x - m·f(x)/f'(x)`.
pub struct NewtonRaphson {
    function: SharedFunction,
    derivative: SharedFunction,
    guess: Decimal,
    multiplicity: u32,
    ctx: Precision,
    tolerance: Decimal,
    max_iterations: usize,
}

impl NewtonRaphson {
    pub fn new(
        function: SharedFunction,
        derivative: SharedFunction,
        guess: f64,
        config: FinderConfig,
    ) -> Result<Self> {
        let (guess, tolerance) = validated(config, guess)?;
        Ok(Self {
            function,
            derivative,
            guess,
            multiplicity: 1,
            ctx: config.precision,
            tolerance,
            max_iterations: config.max_iterations,
        })
    }

    /// Set the multiplicity of the sought root.
    ///
    /// # Errors
    /// `InvalidMultiplicity` for 0.
    pub fn with_multiplicity(mut self, multiplicity: u32) -> Result<Self> {
        if multiplicity == 0 {
            return Err(RootError::InvalidMultiplicity(multiplicity));
        }
        self.multiplicity = multiplicity;
        Ok(self)
    }

    pub fn multiplicity(&self) -> u32 {
        self.multiplicity
    }
}

impl Finder for NewtonRaphson {
    fn name(&self) -> &'static str {
        "Newton-Raphson"
    }

    fn find(&self) -> RootOutcome {
        let run = Run::start(self.name(), self.ctx, &self.tolerance);
        let m = self.ctx.from_i64(i64::from(self.multiplicity));

        iterate(run, self.guess.clone(), self.max_iterations, |x| {
            let fx = self.function.eval(x)?;
            if fx.is_zero() {
                return Ok(Advance::Root(x.clone()));
            }
            let dfx = self.derivative.eval(x)?;
            let ratio = fx
                .checked_div(&dfx)
                .map_err(|_| RootFailureReason::ZeroDerivative)?;
            Ok(Advance::To(x - &(&m * &ratio)))
        })
    }
}

/// Fixed-point iteration `x_new = g(x)`.
pub struct FixedPoint {
    function: SharedFunction,
    guess: Decimal,
    ctx: Precision,
    tolerance: Decimal,
    max_iterations: usize,
}

impl FixedPoint {
    /// `function` is the iteration map `g`, not the `f` whose root is sought.
    pub fn new(function: SharedFunction, guess: f64, config: FinderConfig) -> Result<Self> {
        let (guess, tolerance) = validated(config, guess)?;
        Ok(Self {
            function,
            guess,
            ctx: config.precision,
            tolerance,
            max_iterations: config.max_iterations,
        })
    }
}

impl Finder for FixedPoint {
    fn name(&self) -> &'static str {
        "Fixed-Point"
    }

    fn find(&self) -> RootOutcome {
        let run = Run::start(self.name(), self.ctx, &self.tolerance);
        iterate(run, self.guess.clone(), self.max_iterations, |x| {
            Ok(Advance::To(self.function.eval(x)?))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::{Polynomial, from_f64_fn};
    use approx::assert_relative_eq;

    fn config() -> FinderConfig {
        FinderConfig::default()
            .with_precision(Precision::new(16).unwrap())
            .with_tolerance(1e-8)
    }

    fn sqrt2() -> Polynomial {
        Polynomial::new(vec![-2.0, 0.0, 1.0])
    }

    #[test]
    fn test_newton_sqrt2() {
        let f = sqrt2();
        let finder = NewtonRaphson::new(f.clone().shared(), f.derivative().shared(), 1.0, config())
            .unwrap();
        let estimate = finder.find().unwrap();
        assert!(estimate.converged);
        assert!(estimate.iterations <= 6);
        assert_relative_eq!(estimate.root.to_f64(), 2f64.sqrt(), epsilon = 1e-12);
        // x1 = 1 - (1 - 2) / 2
        assert_eq!(estimate.trace[0].estimate.to_string(), "1");
        assert_eq!(estimate.trace[1].estimate.to_string(), "1.5");
        assert_eq!(estimate.trace.len(), estimate.iterations + 1);
    }

    #[test]
    fn test_multiplicity_speeds_up_double_root() {
        // (x - 1)^2 (x + 2)
        let f = Polynomial::new(vec![2.0, -3.0, 0.0, 1.0]);
        let config = config().with_tolerance(1e-5);
        let plain = NewtonRaphson::new(f.clone().shared(), f.derivative().shared(), 1.5, config)
            .unwrap()
            .find()
            .unwrap();
        let modified = NewtonRaphson::new(f.clone().shared(), f.derivative().shared(), 1.5, config)
            .unwrap()
            .with_multiplicity(2)
            .unwrap()
            .find()
            .unwrap();

        assert!(plain.converged && modified.converged);
        assert!(modified.iterations < plain.iterations);
        assert_relative_eq!(plain.root.to_f64(), 1.0, epsilon = 1e-4);
        assert_relative_eq!(modified.root.to_f64(), 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_newton_zero_derivative() {
        let f = sqrt2();
        let failure = NewtonRaphson::new(f.clone().shared(), f.derivative().shared(), 0.0, config())
            .unwrap()
            .find()
            .unwrap_err();
        assert_eq!(failure.reason, RootFailureReason::ZeroDerivative);
        assert_eq!(failure.iterations, 1);
        assert_eq!(failure.last_estimate.unwrap().to_string(), "0");
        assert!(failure.message.contains("Derivative too close to zero"));
    }

    #[test]
    fn test_zero_multiplicity_rejected() {
        let f = sqrt2();
        let err = NewtonRaphson::new(f.clone().shared(), f.derivative().shared(), 1.0, config())
            .unwrap()
            .with_multiplicity(0)
            .err()
            .unwrap();
        assert!(matches!(err, RootError::InvalidMultiplicity(0)));
    }

    #[test]
    fn test_secant_sqrt2() {
        let estimate = Secant::new(sqrt2().shared(), 1.0, 2.0, config())
            .unwrap()
            .find()
            .unwrap();
        assert!(estimate.converged);
        assert_relative_eq!(estimate.root.to_f64(), 2f64.sqrt(), epsilon = 1e-10);
        // chord through (1, -1) and (2, 2)
        assert_eq!(estimate.trace[1].estimate.to_string(), "1.333333333333333");
    }

    #[test]
    fn test_secant_equal_guesses() {
        let failure = Secant::new(sqrt2().shared(), 1.0, 1.0, config())
            .unwrap()
            .find()
            .unwrap_err();
        assert_eq!(failure.reason, RootFailureReason::VanishingSecantDenominator);
        assert_eq!(failure.iterations, 1);
    }

    #[test]
    fn test_fixed_point_cosine() {
        let config = config().with_tolerance(1e-6).with_max_iterations(100);
        let estimate = FixedPoint::new(from_f64_fn(f64::cos), 1.0, config)
            .unwrap()
            .find()
            .unwrap();
        assert!(estimate.converged);
        assert_relative_eq!(estimate.root.to_f64(), 0.7390851332, epsilon = 1e-5);
    }

    #[test]
    fn test_fixed_point_divergence() {
        let square = Polynomial::new(vec![0.0, 0.0, 1.0]).shared();
        let failure = FixedPoint::new(square, 2.0, config())
            .unwrap()
            .find()
            .unwrap_err();
        assert_eq!(failure.reason, RootFailureReason::Diverged);
        // 2^(2^9) is the first estimate past 1e100
        assert_eq!(failure.iterations, 9);
    }

    #[test]
    fn test_fixed_point_cap() {
        let config = config().with_max_iterations(4);
        let estimate = FixedPoint::new(from_f64_fn(f64::cos), 1.0, config)
            .unwrap()
            .find()
            .unwrap();
        assert!(!estimate.converged);
        assert_eq!(estimate.iterations, 4);
        assert!(estimate.relative_error.is_some());
    }
}
