//! Find a root of a registered function
//!
//! Usage:
//!   find_root --function sqrt2 --method bisection --lower 0 --upper 2
//!   find_root --function double_root --method modified-newton-raphson --guess 1.5
//!   find_root --config problem.json --output report.json
//!   find_root --list-functions

use clap::Parser;
use math_trace_roots::{
    FunctionRegistry, RootMethod, RootParameters, RootProblem, RootReport,
};
use std::fs;
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[command(
    name = "find_root",
    about = "Find a root of a named function step by step in exact decimal arithmetic"
)]
struct Args {
    /// Problem file (JSON); command line options override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Name of the function (use --list-functions to see available options)
    #[arg(short, long)]
    function: Option<String>,

    /// Method: bisection, false-position, secant, fixed-point, newton-raphson, modified-newton-raphson
    #[arg(short, long)]
    method: Option<String>,

    /// Lower bound of the bracket
    #[arg(long, allow_hyphen_values = true)]
    lower: Option<f64>,

    /// Upper bound of the bracket
    #[arg(long, allow_hyphen_values = true)]
    upper: Option<f64>,

    /// Starting point (fixed-point, Newton-Raphson) or first secant point
    #[arg(short, long, allow_hyphen_values = true)]
    guess: Option<f64>,

    /// Second secant point
    #[arg(long, allow_hyphen_values = true)]
    second_guess: Option<f64>,

    /// Multiplicity of the root for Newton-Raphson
    #[arg(long)]
    multiplicity: Option<u32>,

    /// Absolute relative error to stop at
    #[arg(short, long)]
    tolerance: Option<f64>,

    /// Maximum number of iterations
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Number of significant digits
    #[arg(short, long)]
    precision: Option<usize>,

    /// Write the JSON report here
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print every iterate
    #[arg(short, long)]
    verbose: bool,

    /// List all available functions and exit
    #[arg(long)]
    list_functions: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();
    let registry = FunctionRegistry::new();

    if args.list_functions {
        list_available_functions(&registry);
        return Ok(());
    }

    let mut problem = match &args.config {
        Some(path) => {
            println!("Loading problem from: {}", path.display());
            RootProblem::from_file(path)?
        }
        None => {
            let Some(function) = &args.function else {
                eprintln!("Error: --function must be provided unless --config or --list-functions is used.");
                process::exit(2);
            };
            RootProblem {
                method: RootMethod::Bisection.to_string(),
                function: function.clone(),
                tolerance: math_trace_roots::DEFAULT_TOLERANCE,
                max_iterations: math_trace_roots::DEFAULT_MAX_ITERATIONS,
                precision: None,
                parameters: RootParameters::default(),
            }
        }
    };
    apply_overrides(&args, &mut problem);

    let finder = match problem.build_finder(&registry) {
        Ok(finder) => finder,
        Err(e) if e.is_config_error() => {
            eprintln!("Error: {e}");
            process::exit(2);
        }
        Err(e) => return Err(e.into()),
    };
    println!(
        "Finding a root of {} with {} ({} significant digits, tolerance {})",
        problem.function,
        finder.name(),
        problem.precision()?.digits(),
        problem.tolerance
    );

    let outcome = finder.find();
    match &outcome {
        Ok(estimate) => {
            if args.verbose {
                for record in &estimate.trace {
                    match &record.relative_error {
                        Some(e) => println!("{:>4}: x = {} (error {e})", record.iteration, record.estimate),
                        None => println!("{:>4}: x = {}", record.iteration, record.estimate),
                    }
                }
            }
            println!("\n{}", estimate.message);
            println!("  root = {}", estimate.root);
            if let Some(figures) = estimate.significant_figures {
                println!("  correct significant figures: {figures}");
            }
            println!("Found in {:.2?}", estimate.execution_time);
        }
        Err(failure) => println!("\n{}", failure.message),
    }

    let report = RootReport::from(&outcome);
    let json = serde_json::to_string_pretty(&report)?;
    match &args.output {
        Some(path) => {
            fs::write(path, json)?;
            println!("Report written to: {}", path.display());
        }
        None if args.verbose => println!("{json}"),
        None => {}
    }

    if outcome.is_err() {
        process::exit(1);
    }
    Ok(())
}

fn apply_overrides(args: &Args, problem: &mut RootProblem) {
    if let Some(function) = &args.function {
        problem.function = function.clone();
    }
    if let Some(method) = &args.method {
        problem.method = method.clone();
    }
    if let Some(tolerance) = args.tolerance {
        problem.tolerance = tolerance;
    }
    if let Some(max_iterations) = args.max_iterations {
        problem.max_iterations = max_iterations;
    }
    if let Some(digits) = args.precision {
        problem.precision = Some(digits);
    }

    let params = &mut problem.parameters;
    if args.lower.is_some() {
        params.lower_bound = args.lower;
    }
    if args.upper.is_some() {
        params.upper_bound = args.upper;
    }
    if args.guess.is_some() {
        params.guess = args.guess;
        params.first_guess = args.guess;
    }
    if args.second_guess.is_some() {
        params.second_guess = args.second_guess;
    }
    if args.multiplicity.is_some() {
        params.multiplicity = args.multiplicity;
    }
}

fn list_available_functions(registry: &FunctionRegistry) {
    let names = registry.list_functions();
    println!("Available functions ({}):", names.len());
    for name in names {
        if let Some(entry) = registry.get(&name) {
            println!("- {name:<14} f(x) = {}", entry.formula);
        }
    }
}
