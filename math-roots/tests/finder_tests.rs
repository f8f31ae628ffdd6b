//! Integration tests for the root finders
//!
//! Every method through the factory and the registry, agreement between
//! methods, and the serialized report.

use approx::assert_relative_eq;
use math_trace_decimal::Precision;
use math_trace_roots::{
    Bisection, Finder, FinderConfig, FunctionRegistry, Polynomial, RootFailureReason,
    RootMethod, RootParameters, RootProblem, RootReport, create_finder,
};

fn sqrt2_config() -> FinderConfig {
    FinderConfig::default()
        .with_precision(Precision::new(10).unwrap())
        .with_tolerance(1e-6)
}

#[test]
fn test_scenario_bisection_sqrt2() {
    let f = Polynomial::new(vec![-2.0, 0.0, 1.0]).shared();
    let estimate = Bisection::new(f, 0.0, 2.0, sqrt2_config())
        .unwrap()
        .find()
        .unwrap();

    assert!(estimate.converged);
    assert!(estimate.iterations < 30, "took {}", estimate.iterations);
    assert!(estimate.root.to_string().starts_with("1.41421"));
    let error = estimate.relative_error.as_ref().unwrap();
    assert!(error.to_f64() < 1e-6);
}

#[test]
fn test_every_method_finds_the_same_root() {
    let registry = FunctionRegistry::new();
    let entry = registry.get("cubic").unwrap();
    let config = FinderConfig::default()
        .with_precision(Precision::new(16).unwrap())
        .with_tolerance(1e-9)
        .with_max_iterations(200);
    let params = RootParameters {
        lower_bound: Some(1.0),
        upper_bound: Some(2.0),
        guess: Some(2.0),
        first_guess: Some(1.0),
        second_guess: Some(2.0),
        multiplicity: Some(1),
    };

    // x^3 - x - 2
    let expected = 1.5213797068045676;
    for method in RootMethod::ALL {
        if method == RootMethod::FixedPoint {
            continue;
        }
        let finder = create_finder(method, entry, config, &params).unwrap();
        let estimate = finder.find().unwrap();
        assert!(estimate.converged, "{method} did not converge");
        assert_relative_eq!(estimate.root.to_f64(), expected, epsilon = 1e-7);
    }
}

#[test]
fn test_fixed_point_of_exp_neg_solves_exp_minus_x() {
    let registry = FunctionRegistry::new();
    let config = FinderConfig::default()
        .with_tolerance(1e-7)
        .with_max_iterations(200);

    let map = registry.get("exp_neg").unwrap();
    let params = RootParameters {
        guess: Some(0.0),
        ..RootParameters::default()
    };
    let fixed = create_finder(RootMethod::FixedPoint, map, config, &params)
        .unwrap()
        .find()
        .unwrap();

    let root_form = registry.get("exp_minus_x").unwrap();
    let newton = create_finder(RootMethod::NewtonRaphson, root_form, config, &params)
        .unwrap()
        .find()
        .unwrap();

    assert!(fixed.converged && newton.converged);
    assert!(newton.iterations < fixed.iterations);
    assert_relative_eq!(fixed.root.to_f64(), newton.root.to_f64(), epsilon = 1e-6);
    assert_relative_eq!(newton.root.to_f64(), 0.5671432904, epsilon = 1e-8);
}

#[test]
fn test_newton_outside_domain_reports_evaluation_failure() {
    let json = r#"{
        "method": "newton-raphson",
        "function": "ln_minus_one",
        "parameters": { "guess": 8 }
    }"#;
    // 8 - (ln 8 - 1) * 8 is negative, where ln is undefined
    let failure = RootProblem::from_json_str(json)
        .unwrap()
        .build_finder(&FunctionRegistry::new())
        .unwrap()
        .find()
        .unwrap_err();
    assert!(matches!(failure.reason, RootFailureReason::Evaluation(_)));
    assert_eq!(failure.iterations, 2);
}

#[test]
fn test_report_serialization() {
    let json = r#"{
        "method": "secant",
        "function": "sqrt2",
        "tolerance": 1e-8,
        "precision": 12,
        "parameters": { "first_guess": 1, "second_guess": 2 }
    }"#;
    let outcome = RootProblem::from_json_str(json)
        .unwrap()
        .build_finder(&FunctionRegistry::new())
        .unwrap()
        .find();
    let report = serde_json::to_value(RootReport::from(&outcome)).unwrap();

    assert!(report["root"].as_str().unwrap().starts_with("1.41421356"));
    assert_eq!(report["converged"], true);
    assert_eq!(report["iterations"][0]["iteration"], 0);
    assert_eq!(report["iterations"][0]["estimate"], "2");
    assert!(report["number_of_correct_significant_figures"].as_u64().unwrap() >= 6);
    let n = report["number_of_iterations"].as_u64().unwrap() as usize;
    assert_eq!(report["iterations"].as_array().unwrap().len(), n + 1);
}

#[test]
fn test_problem_file_round_trip() {
    let problem = RootProblem {
        method: "false-position".to_string(),
        function: "cos_minus_x".to_string(),
        tolerance: 1e-6,
        max_iterations: 40,
        precision: Some(12),
        parameters: RootParameters {
            lower_bound: Some(0.0),
            upper_bound: Some(1.0),
            ..RootParameters::default()
        },
    };
    let path = std::env::temp_dir().join("math_trace_roots_problem.json");
    problem.to_file(&path).unwrap();
    let loaded = RootProblem::from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(loaded.method, problem.method);
    assert_eq!(loaded.parameters, problem.parameters);
    assert_eq!(loaded.precision, Some(12));
    assert_relative_eq!(loaded.tolerance, 1e-6);

    let estimate = loaded
        .build_finder(&FunctionRegistry::new())
        .unwrap()
        .find()
        .unwrap();
    assert_relative_eq!(estimate.root.to_f64(), 0.7390851332, epsilon = 1e-5);
}
