//! IRR command implementation.

use anyhow::Result;
use clap::Args;

use minekit_analytics::cashflows::{irr_with, CashFlowProject, IrrConfig, IrrStatus};

use crate::cli::Context;
use crate::commands::config::ConfigKey;
use crate::commands::{read_cash_flows, ProjectArgs};
use crate::output::{print_report, print_warning, KeyValue};

/// Arguments for the irr command.
#[derive(Args, Debug)]
pub struct IrrArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Starting rate (percent) [default: irr_guess setting]
    #[arg(short, long, allow_hyphen_values = true)]
    pub guess: Option<f64>,

    /// Tolerance on successive rates [default: irr_tolerance setting]
    #[arg(short, long)]
    pub tolerance: Option<f64>,

    /// Iteration budget [default: irr_max_iterations setting]
    #[arg(short, long)]
    pub max_iterations: Option<u32>,
}

/// Execute the irr command.
pub fn execute(args: IrrArgs, ctx: &Context) -> Result<()> {
    let config = IrrConfig::default()
        .with_initial_guess(match args.guess {
            Some(guess) => guess,
            None => ctx.config.parse(ConfigKey::IrrGuess)?,
        })
        .with_tolerance(match args.tolerance {
            Some(tolerance) => tolerance,
            None => ctx.config.parse(ConfigKey::IrrTolerance)?,
        })
        .with_max_iterations(match args.max_iterations {
            Some(budget) => budget,
            None => ctx.config.parse(ConfigKey::IrrMaxIterations)?,
        });

    let rows = read_cash_flows(&args.project.csv)?;
    // The discount rate plays no part in the IRR
    let project = CashFlowProject::from_rows(rows, args.project.tax, 0.0)?;

    let result = irr_with(&project, &config)?;

    if result.status == IrrStatus::IterationLimitReached && !ctx.quiet {
        print_warning(&format!(
            "IRR did not converge within {} iterations; showing the last estimate",
            result.iterations
        ));
    }

    let status = match result.status {
        IrrStatus::Converged => "converged",
        IrrStatus::IterationLimitReached => "iteration limit reached",
    };
    let results = vec![
        KeyValue::new("Periods", project.len().to_string()),
        KeyValue::from_percent("Tax Rate", project.tax_rate(), 2),
        KeyValue::from_percent("IRR", result.rate, ctx.precision),
        KeyValue::new("Iterations", result.iterations.to_string()),
        KeyValue::new("Status", status),
    ];

    print_report(
        ctx,
        "Internal Rate of Return",
        &results,
        &result,
        &ctx.number(result.rate),
    )
}
