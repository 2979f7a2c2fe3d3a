//! Regress command implementation.
//!
//! Fits `y = m*x + c`, or `y = k * x^(-a)` on log-log axes.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use minekit_math::regression::{fit, fit_power_law, LinearFit, PowerLawFit};

use crate::cli::Context;
use crate::commands::{parse_list, read_points};
use crate::error::CliError;
use crate::output::{print_report, KeyValue};

/// Arguments for the regress command.
#[derive(Args, Debug)]
pub struct RegressArgs {
    /// X values (comma-separated, e.g., "1,2,3")
    #[arg(long, requires = "y", conflicts_with = "csv")]
    pub x: Option<String>,

    /// Y values (comma-separated, e.g., "2,4,6")
    #[arg(long, requires = "x", conflicts_with = "csv")]
    pub y: Option<String>,

    /// CSV file with columns x,y
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Fit a power law y = k * x^(-a) by regressing ln y on ln x
    #[arg(long)]
    pub log_log: bool,

    /// Evaluate the fitted curve at this x
    #[arg(long)]
    pub predict: Option<f64>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum RegressOutput {
    Linear {
        #[serde(flatten)]
        fit: LinearFit,
        #[serde(skip_serializing_if = "Option::is_none")]
        prediction: Option<f64>,
    },
    PowerLaw {
        #[serde(flatten)]
        fit: PowerLawFit,
        #[serde(skip_serializing_if = "Option::is_none")]
        prediction: Option<f64>,
    },
}

/// Execute the regress command.
pub fn execute(args: RegressArgs, ctx: &Context) -> Result<()> {
    let (xs, ys) = match (&args.x, &args.y, &args.csv) {
        (Some(x), Some(y), None) => (parse_list(x)?, parse_list(y)?),
        (None, None, Some(path)) => read_points(path)?,
        _ => {
            return Err(CliError::MissingArgument("either --x and --y, or --csv".to_string()).into())
        }
    };

    let p = ctx.precision;
    let mut results = vec![KeyValue::new("Points", xs.len().to_string())];

    let (output, minimal) = if args.log_log {
        let power = fit_power_law(&xs, &ys)?;
        let prediction = args.predict.map(|x| power.evaluate(x));

        results.push(KeyValue::from_f64("k", power.k, p));
        results.push(KeyValue::from_f64("a", power.a, p));
        results.push(KeyValue::from_f64("Slope (ln-ln)", power.log_fit.slope, p));
        results.push(KeyValue::from_f64("Intercept (ln-ln)", power.log_fit.intercept, p));
        if let (Some(x), Some(y)) = (args.predict, prediction) {
            results.push(KeyValue::from_f64(format!("y({x})"), y, p));
        }

        let minimal = format!("{} {}", ctx.number(power.k), ctx.number(power.a));
        (
            RegressOutput::PowerLaw {
                fit: power,
                prediction,
            },
            minimal,
        )
    } else {
        let line = fit(&xs, &ys)?;
        let prediction = args.predict.map(|x| line.predict(x));

        results.push(KeyValue::from_f64("Slope", line.slope, p));
        results.push(KeyValue::from_f64("Intercept", line.intercept, p));
        if let (Some(x), Some(y)) = (args.predict, prediction) {
            results.push(KeyValue::from_f64(format!("y({x})"), y, p));
        }

        let minimal = format!("{} {}", ctx.number(line.slope), ctx.number(line.intercept));
        (
            RegressOutput::Linear {
                fit: line,
                prediction,
            },
            minimal,
        )
    };

    let title = if args.log_log {
        "Power-Law Fit"
    } else {
        "Least-Squares Fit"
    };
    print_report(ctx, title, &results, &output, &minimal)
}
