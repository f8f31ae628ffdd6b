//! Solve a linear system described in a JSON problem file
//!
//! Usage:
//!   solve_system --config problem.json
//!   solve_system --config problem.json --method gauss-jordan-elimination --output report.json

use clap::Parser;
use math_trace_solvers::{Method, SolutionReport, Step, SystemProblem};
use std::fs;
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[command(
    name = "solve_system",
    about = "Solve a linear system step by step in exact decimal arithmetic"
)]
struct Args {
    /// Problem file (JSON)
    #[arg(short, long, required_unless_present = "list_methods")]
    config: Option<PathBuf>,

    /// Write the JSON report here
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Override the method named in the problem file
    #[arg(short, long)]
    method: Option<String>,

    /// Override the number of significant digits
    #[arg(short, long)]
    precision: Option<usize>,

    /// Print every recorded step
    #[arg(short, long)]
    verbose: bool,

    /// List the available methods and exit
    #[arg(long)]
    list_methods: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    if args.list_methods {
        for method in Method::ALL {
            println!("{method}");
        }
        return Ok(());
    }

    let Some(config) = &args.config else {
        eprintln!("Error: --config must be provided unless --list-methods is used.");
        process::exit(2);
    };
    println!("Loading problem from: {}", config.display());
    let mut problem = SystemProblem::from_file(config)?;
    if let Some(method) = &args.method {
        problem.method = method.clone();
    }
    if let Some(digits) = args.precision {
        problem.precision = Some(digits);
    }

    let solver = match problem.build_solver() {
        Ok(solver) => solver,
        Err(e) if e.is_config_error() || e.is_dimension_error() => {
            eprintln!("Error: {e}");
            process::exit(2);
        }
        Err(e) => return Err(e.into()),
    };
    println!(
        "Solving {}x{} system with {} ({} significant digits)",
        problem.coefficients.len(),
        problem.constants.len(),
        solver.name(),
        problem.precision()?.digits()
    );

    let outcome = solver.solve();
    match &outcome {
        Ok(solution) => {
            if args.verbose {
                for (i, step) in solution.steps.iter().enumerate() {
                    print_step(i + 1, step);
                }
            }
            println!("\n{}", solution.message);
            for (i, x) in solution.x.iter().enumerate() {
                println!("  x{} = {}", i + 1, x);
            }
            println!("Solved in {:.2?}", solution.execution_time);
        }
        Err(failure) => {
            println!("\n{}", failure.message);
        }
    }

    let report = SolutionReport::from(&outcome);
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

fn print_step(index: usize, step: &Step) {
    match step {
        Step::RowSwap {
            target_row,
            source_row,
            ..
        } => println!("{index:>4}: R{} <-> R{}", target_row + 1, source_row + 1),
        Step::RowScale { row, factor, .. } => {
            println!("{index:>4}: R{} <- ({factor}) R{}", row + 1, row + 1)
        }
        Step::RowAdd {
            target_row,
            source_row,
            factor,
            ..
        } => println!(
            "{index:>4}: R{} <- R{} + ({factor}) R{}",
            target_row + 1,
            target_row + 1,
            source_row + 1
        ),
        Step::ForwardSubstitution { result, .. } | Step::BackSubstitution { result, .. } => {
            let values: Vec<String> = result.iter().map(ToString::to_string).collect();
            println!("{index:>4}: {} -> [{}]", step.step_type(), values.join(", "));
        }
        Step::Iteration {
            index: sweep,
            new_solution,
            relative_error,
            ..
        } => {
            let values: Vec<String> = new_solution.iter().map(ToString::to_string).collect();
            println!(
                "{index:>4}: sweep {sweep}: [{}] (error {relative_error})",
                values.join(", ")
            );
        }
        Step::ShowMatrices { matrices } => {
            for (name, m) in matrices {
                println!("{index:>4}: {name} =");
                for row in m.rows() {
                    let values: Vec<String> = row.iter().map(ToString::to_string).collect();
                    println!("        [{}]", values.join(", "));
                }
            }
        }
    }
}
