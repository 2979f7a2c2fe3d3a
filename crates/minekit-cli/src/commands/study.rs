//! Study command implementation.
//!
//! Tabulates the percent error of the quadrature rules on a benchmark
//! function as the number of subintervals grows.

use anyhow::Result;
use clap::{Args, ValueEnum};
use serde::Serialize;
use tabled::Tabled;

use minekit_analytics::error_study::{BenchmarkFunction, ErrorPoint};
use minekit_math::integration::QuadratureRule;

use crate::cli::{Context, OutputFormat};
use crate::commands::RuleChoice;
use crate::error::CliError;
use crate::output::{print_header, print_json_value, print_output};

/// Arguments for the study command.
#[derive(Args, Debug)]
pub struct StudyArgs {
    /// Benchmark function
    #[arg(long, value_enum, default_value = "f1")]
    pub function: BenchmarkChoice,

    /// Restrict the study to one rule (both rules by default)
    #[arg(short, long, value_enum)]
    pub rule: Option<RuleChoice>,

    /// Smallest subinterval count
    #[arg(long, default_value = "10")]
    pub from: u32,

    /// Largest subinterval count (inclusive)
    #[arg(long, default_value = "99")]
    pub to: u32,
}

/// Benchmark function choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BenchmarkChoice {
    /// 4e^(4x) + 3e^(3x) + 2e^(2x) + e^x on [1, 2]
    F1,
    /// x^3 + 2x + 1/x on [e, 5]
    F2,
}

impl From<BenchmarkChoice> for BenchmarkFunction {
    fn from(choice: BenchmarkChoice) -> Self {
        match choice {
            BenchmarkChoice::F1 => Self::Exponential,
            BenchmarkChoice::F2 => Self::Cubic,
        }
    }
}

/// One sample of the study with its rule.
#[derive(Debug, Serialize)]
struct StudySample {
    rule: QuadratureRule,
    #[serde(flatten)]
    point: ErrorPoint,
}

/// One formatted row of the study.
#[derive(Debug, Serialize, Tabled)]
struct StudyRow {
    #[tabled(rename = "Rule")]
    rule: QuadratureRule,
    #[tabled(rename = "n")]
    n: u32,
    #[tabled(rename = "Estimate")]
    estimate: String,
    #[tabled(rename = "Error (%)")]
    percent_error: String,
}

/// Execute the study command.
pub fn execute(args: StudyArgs, ctx: &Context) -> Result<()> {
    if args.from > args.to {
        return Err(CliError::InvalidArguments(format!(
            "--from ({}) is greater than --to ({})",
            args.from, args.to
        ))
        .into());
    }

    let function = BenchmarkFunction::from(args.function);
    let rules = match args.rule {
        Some(rule) => vec![QuadratureRule::from(rule)],
        None => vec![QuadratureRule::Trapezoidal, QuadratureRule::Simpson],
    };

    let mut samples = Vec::new();
    for rule in rules {
        let points = function
            .study(rule)
            .run(|x| function.eval(x), args.from..=args.to)?;
        tracing::debug!("study: {function} {rule}: {} points", points.len());
        samples.extend(points.into_iter().map(|point| StudySample { rule, point }));
    }

    let rows: Vec<StudyRow> = samples
        .iter()
        .map(|sample| StudyRow {
            rule: sample.rule,
            n: sample.point.n,
            estimate: ctx.number(sample.point.estimate),
            percent_error: format!("{:.prec$e}", sample.point.percent_error, prec = ctx.precision),
        })
        .collect();

    match ctx.format {
        OutputFormat::Table => {
            if !ctx.quiet {
                print_header(&format!(
                    "Quadrature Error for {function} (true value {})",
                    ctx.number(function.true_value())
                ));
            }
            print_output(&rows, ctx.format)
        }
        OutputFormat::Json => print_json_value(&samples),
        OutputFormat::Csv => print_output(&rows, ctx.format),
        OutputFormat::Minimal => {
            for row in &rows {
                println!("{} {} {}", row.rule, row.n, row.percent_error);
            }
            Ok(())
        }
    }
}
