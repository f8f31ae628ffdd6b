//! Bracketing methods: bisection and false position
//!
//! Both keep an interval `[xl, xu]` with `f(xl)·f(xu) <= 0` and shrink it
//! around a candidate `xr` every iteration, so they cannot diverge. They differ
//! only in how `xr` is chosen:
//!
//! - bisection takes the midpoint;
//! - false position takes the zero of the chord through both endpoints,
//!   `xr = (xl·f(xu) - xu·f(xl)) / (f(xu) - f(xl))`.
//!
//! From the second iteration on, a run stops once the relative change of `xr`
//! or `|f(xr)|` drops below the tolerance.

use crate::error::{Result, RootError, RootFailureReason};
use crate::finder::{Finder, FinderConfig, Run, relative_change};
use crate::function::SharedFunction;
use crate::result::RootOutcome;
use math_trace_decimal::{Decimal, Precision};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    Midpoint,
    Chord,
}

impl Rule {
    fn name(self) -> &'static str {
        match self {
            Rule::Midpoint => "Bisection",
            Rule::Chord => "False-Position",
        }
    }

    fn candidate(
        self,
        ctx: Precision,
        xl: &Decimal,
        xu: &Decimal,
        fxl: &Decimal,
        fxu: &Decimal,
    ) -> std::result::Result<Decimal, RootFailureReason> {
        match self {
            Rule::Midpoint => Ok((xl + xu).checked_div(&ctx.from_i64(2))?),
            Rule::Chord => {
                if fxl == fxu {
                    return Err(RootFailureReason::EqualFunctionValues);
                }
                let numerator = xl * fxu - xu * fxl;
                Ok(numerator.checked_div(&(fxu - fxl))?)
            }
        }
    }
}

/// Shared state of both bracketing finders.
struct Bracket {
    function: SharedFunction,
    lower: Decimal,
    upper: Decimal,
    ctx: Precision,
    tolerance: Decimal,
    max_iterations: usize,
    rule: Rule,
}

impl Bracket {
    fn new(
        function: SharedFunction,
        lower: f64,
        upper: f64,
        config: FinderConfig,
        rule: Rule,
    ) -> Result<Self> {
        let tolerance = config.validate()?;
        let ctx = config.precision;
        let (lower, upper) = (ctx.from_f64(lower)?, ctx.from_f64(upper)?);
        if lower >= upper {
            return Err(RootError::InvalidInterval {
                lower: lower.to_string(),
                upper: upper.to_string(),
            });
        }
        Ok(Self {
            function,
            lower,
            upper,
            ctx,
            tolerance,
            max_iterations: config.max_iterations,
            rule,
        })
    }

    fn run(&self) -> RootOutcome {
        let run = Run::start(self.rule.name(), self.ctx, &self.tolerance);
        let mut xl = self.lower.clone();
        let mut xu = self.upper.clone();
        let (mut fxl, mut fxu) = match (self.function.eval(&xl), self.function.eval(&xu)) {
            (Ok(fxl), Ok(fxu)) => (fxl, fxu),
            (Err(e), _) | (_, Err(e)) => return run.fail(e.into(), 0, None),
        };
        if (&fxl * &fxu).is_positive() {
            return run.fail(RootFailureReason::InvalidBracket, 0, None);
        }
        if fxl.is_zero() {
            return run.converged(xl, None, 0);
        }
        if fxu.is_zero() {
            return run.converged(xu, None, 0);
        }

        self.narrow(run, &mut xl, &mut xu, &mut fxl, &mut fxu)
    }

    fn narrow(
        &self,
        mut run: Run<'_>,
        xl: &mut Decimal,
        xu: &mut Decimal,
        fxl: &mut Decimal,
        fxu: &mut Decimal,
    ) -> RootOutcome {
        let mut xr = xl.clone();
        let mut error = None;
        for iteration in 1..=self.max_iterations {
            let candidate = match self.rule.candidate(self.ctx, xl, xu, fxl, fxu) {
                Ok(x) => x,
                Err(reason) => {
                    let last = (iteration > 1).then(|| xr.clone());
                    return run.fail(reason, iteration, last);
                }
            };
            let previous = std::mem::replace(&mut xr, candidate);
            let fxr = match self.function.eval(&xr) {
                Ok(v) => v,
                Err(e) => return run.fail(e.into(), iteration, Some(xr)),
            };

            error = (iteration > 1).then(|| relative_change(&xr, &previous));
            run.record(iteration, &xr, error.as_ref());
            if let Some(e) = &error {
                if *e < self.tolerance || fxr.abs() < self.tolerance {
                    return run.converged(xr, error, iteration);
                }
            }

            if (&*fxl * &fxr).is_negative() {
                *xu = xr.clone();
                *fxu = fxr;
            } else if (&fxr * &*fxu).is_negative() {
                *xl = xr.clone();
                *fxl = fxr;
            } else {
                // f(xr) is exactly zero
                return run.converged(xr, error, iteration);
            }
        }
        run.exhausted(xr, error, self.max_iterations)
    }
}

/// Interval halving.
pub struct Bisection {
    bracket: Bracket,
}

impl Bisection {
    /// # Errors
    /// `InvalidInterval` unless `lower < upper`, plus the option checks of
    /// [`FinderConfig`].
    pub fn new(
        function: SharedFunction,
        lower: f64,
        upper: f64,
        config: FinderConfig,
    ) -> Result<Self> {
        let bracket = Bracket::new(function, lower, upper, config, Rule::Midpoint)?;
        Ok(Self { bracket })
    }
}

impl Finder for Bisection {
    fn name(&self) -> &'static str {
        Rule::Midpoint.name()
    }

    fn find(&self) -> RootOutcome {
        self.bracket.run()
    }
}

/// Regula falsi.
pub struct FalsePosition {
    bracket: Bracket,
}

impl FalsePosition {
    /// # Errors
    /// Same as [`Bisection::new`].
    pub fn new(
        function: SharedFunction,
        lower: f64,
        upper: f64,
        config: FinderConfig,
    ) -> Result<Self> {
        let bracket = Bracket::new(function, lower, upper, config, Rule::Chord)?;
        Ok(Self { bracket })
    }
}

impl Finder for FalsePosition {
    fn name(&self) -> &'static str {
        Rule::Chord.name()
    }

    fn find(&self) -> RootOutcome {
        self.bracket.run()
    }
}
