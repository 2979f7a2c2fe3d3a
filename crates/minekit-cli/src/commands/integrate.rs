//! Integrate command implementation.
//!
//! Applies one composite quadrature rule to a benchmark function or a
//! polynomial.

use anyhow::Result;
use clap::{Args, ValueEnum};
use serde::Serialize;

use minekit_analytics::error_study::{percent_error, BenchmarkFunction};
use minekit_math::integration::{integrate, QuadratureRule};

use crate::cli::Context;
use crate::commands::{parse_list, RuleChoice};
use crate::error::CliError;
use crate::output::{print_report, KeyValue};

/// Arguments for the integrate command.
#[derive(Args, Debug)]
pub struct IntegrateArgs {
    /// Function to integrate
    #[arg(long, value_enum, default_value = "f1")]
    pub function: FunctionChoice,

    /// Polynomial coefficients in ascending powers (c0,c1,c2,...), for --function poly
    #[arg(long)]
    pub coeffs: Option<String>,

    /// Lower bound (defaults to the benchmark function's own interval)
    #[arg(short = 'a', long = "from", allow_hyphen_values = true)]
    pub lower: Option<f64>,

    /// Upper bound (defaults to the benchmark function's own interval)
    #[arg(short = 'b', long = "to", allow_hyphen_values = true)]
    pub upper: Option<f64>,

    /// Number of subintervals (must be even for Simpson's rule)
    #[arg(short = 'n', long, default_value = "10")]
    pub intervals: u32,

    /// Quadrature rule
    #[arg(short, long, value_enum, default_value = "simpson")]
    pub rule: RuleChoice,
}

/// Integrand choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FunctionChoice {
    /// 4e^(4x) + 3e^(3x) + 2e^(2x) + e^x on [1, 2]
    F1,
    /// x^3 + 2x + 1/x on [e, 5]
    F2,
    /// Polynomial given by --coeffs
    Poly,
}

#[derive(Debug, Serialize)]
struct IntegrateOutput {
    function: String,
    rule: QuadratureRule,
    a: f64,
    b: f64,
    n: u32,
    estimate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    true_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    percent_error: Option<f64>,
}

/// Evaluates `c0 + c1*x + c2*x^2 + ...` by Horner's scheme.
fn polynomial(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

/// Execute the integrate command.
pub fn execute(args: IntegrateArgs, ctx: &Context) -> Result<()> {
    let rule = QuadratureRule::from(args.rule);
    let n = args.intervals;

    let output = match args.function {
        FunctionChoice::F1 | FunctionChoice::F2 => {
            let benchmark = if args.function == FunctionChoice::F1 {
                BenchmarkFunction::Exponential
            } else {
                BenchmarkFunction::Cubic
            };
            let (lo, hi) = benchmark.bounds();
            let a = args.lower.unwrap_or(lo);
            let b = args.upper.unwrap_or(hi);
            let estimate = integrate(rule, |x| benchmark.eval(x), a, b, n)?;

            // The closed form only applies on the benchmark's own interval
            let true_value = (a == lo && b == hi).then(|| benchmark.true_value());
            let error = true_value.map(|t| percent_error(estimate, t)).transpose()?;

            IntegrateOutput {
                function: benchmark.to_string(),
                rule,
                a,
                b,
                n,
                estimate,
                true_value,
                percent_error: error,
            }
        }
        FunctionChoice::Poly => {
            let coeffs = parse_list(args.coeffs.as_deref().ok_or_else(|| {
                CliError::MissingArgument("--coeffs for --function poly".to_string())
            })?)?;
            let (Some(a), Some(b)) = (args.lower, args.upper) else {
                return Err(
                    CliError::MissingArgument("-a and -b for --function poly".to_string()).into(),
                );
            };
            let estimate = integrate(rule, |x| polynomial(&coeffs, x), a, b, n)?;

            IntegrateOutput {
                function: "poly".to_string(),
                rule,
                a,
                b,
                n,
                estimate,
                true_value: None,
                percent_error: None,
            }
        }
    };

    let p = ctx.precision;
    let mut results = vec![
        KeyValue::new("Function", output.function.clone()),
        KeyValue::new("Rule", rule.to_string()),
        KeyValue::new("Interval", format!("[{}, {}]", output.a, output.b)),
        KeyValue::new("Subintervals", n.to_string()),
        KeyValue::from_f64("Estimate", output.estimate, p),
    ];
    if let Some(true_value) = output.true_value {
        results.push(KeyValue::from_f64("True Value", true_value, p));
    }
    if let Some(error) = output.percent_error {
        results.push(KeyValue::from_percent("Error", error, p));
    }

    let minimal = ctx.number(output.estimate);
    print_report(ctx, "Numerical Integration", &results, &output, &minimal)
}
