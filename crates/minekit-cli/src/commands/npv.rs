//! NPV command implementation.
//!
//! Discounts a project's after-tax cash flows, optionally showing the
//! per-period schedule.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use minekit_analytics::cashflows::{CashFlowLine, CashFlowProject};

use crate::cli::{Context, OutputFormat};
use crate::commands::{read_cash_flows, ProjectArgs};
use crate::output::{print_header, print_output, print_report, KeyValue};

/// Arguments for the npv command.
#[derive(Args, Debug)]
pub struct NpvArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Discount rate (percent)
    #[arg(short, long, allow_hyphen_values = true)]
    pub discount: f64,

    /// Also print the discounted cash-flow schedule
    #[arg(long)]
    pub schedule: bool,
}

#[derive(Debug, Serialize)]
struct NpvOutput {
    periods: usize,
    tax_rate: f64,
    discount_rate: f64,
    npv: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    schedule: Option<Vec<CashFlowLine>>,
}

/// One formatted schedule line.
#[derive(Debug, Serialize, Tabled)]
struct ScheduleRow {
    #[tabled(rename = "Year")]
    year: f64,
    #[tabled(rename = "Net Cash Flow")]
    net_cash_flow: String,
    #[tabled(rename = "Discount Factor")]
    discount_factor: String,
    #[tabled(rename = "Present Value")]
    present_value: String,
}

/// Execute the npv command.
pub fn execute(args: NpvArgs, ctx: &Context) -> Result<()> {
    let rows = read_cash_flows(&args.project.csv)?;
    let project = CashFlowProject::from_rows(rows, args.project.tax, args.discount)?;

    let npv = project.npv();
    let schedule = args.schedule.then(|| project.schedule(args.discount));

    let p = ctx.precision;
    let results = vec![
        KeyValue::new("Periods", project.len().to_string()),
        KeyValue::from_percent("Tax Rate", project.tax_rate(), 2),
        KeyValue::from_percent("Discount Rate", project.discount_rate(), 2),
        KeyValue::from_f64("NPV", npv, p),
    ];

    let output = NpvOutput {
        periods: project.len(),
        tax_rate: project.tax_rate(),
        discount_rate: project.discount_rate(),
        npv,
        schedule,
    };

    print_report(ctx, "Net Present Value", &results, &output, &ctx.number(npv))?;

    if let Some(lines) = &output.schedule {
        if matches!(ctx.format, OutputFormat::Table | OutputFormat::Csv) {
            let rows: Vec<ScheduleRow> = lines
                .iter()
                .map(|line| ScheduleRow {
                    year: line.year,
                    net_cash_flow: ctx.number(line.net_cash_flow),
                    discount_factor: ctx.number(line.discount_factor),
                    present_value: ctx.number(line.present_value),
                })
                .collect();
            if ctx.format == OutputFormat::Table && !ctx.quiet {
                print_header("Discounted Cash Flows");
            }
            print_output(&rows, ctx.format)?;
        }
    }

    Ok(())
}
