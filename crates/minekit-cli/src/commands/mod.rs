//! CLI command implementations.

pub mod config;
pub mod integrate;
pub mod irr;
pub mod npv;
pub mod pillar;
pub mod regress;
pub mod study;

// Re-export argument types for convenience
pub use config::ConfigArgs;
pub use integrate::IntegrateArgs;
pub use irr::IrrArgs;
pub use npv::NpvArgs;
pub use pillar::PillarArgs;
pub use regress::RegressArgs;
pub use study::StudyArgs;

use std::path::Path;

use clap::{Args, ValueEnum};
use serde::{Deserialize, Deserializer};

use minekit_analytics::cashflows::CashFlowRow;
use minekit_math::integration::QuadratureRule;

use crate::error::{CliError, CliResult};

/// Quadrature rule choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RuleChoice {
    /// Composite trapezoidal rule
    Trapezoidal,
    /// Composite Simpson's 1/3 rule
    Simpson,
}

impl From<RuleChoice> for QuadratureRule {
    fn from(choice: RuleChoice) -> Self {
        match choice {
            RuleChoice::Trapezoidal => Self::Trapezoidal,
            RuleChoice::Simpson => Self::Simpson,
        }
    }
}

/// Cash-flow file and tax rate shared by `npv` and `irr`.
#[derive(Args, Debug)]
pub struct ProjectArgs {
    /// CSV file with columns year,operating_cost,capital_cost,revenue
    #[arg(long)]
    pub csv: std::path::PathBuf,

    /// Tax rate applied to operating margin (percent)
    #[arg(long, default_value = "0")]
    pub tax: f64,
}

/// Parses a comma-separated list of numbers.
pub fn parse_list(s: &str) -> CliResult<Vec<f64>> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<f64>()
                .map_err(|_| CliError::InvalidNumber(part.to_string()))
        })
        .collect()
}

/// Parses a cash-flow cell: blank or `-` means the entry is not defined.
fn parse_amount(s: &str) -> CliResult<Option<f64>> {
    match s.trim() {
        "" | "-" => Ok(None),
        value => value
            .parse::<f64>()
            .map(Some)
            .map_err(|_| CliError::InvalidNumber(value.to_string())),
    }
}

fn optional_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) => parse_amount(&s).map_err(serde::de::Error::custom),
    }
}

/// One line of a cash-flow file.
#[derive(Debug, Deserialize)]
struct CashFlowRecord {
    year: f64,
    #[serde(default, deserialize_with = "optional_amount")]
    operating_cost: Option<f64>,
    #[serde(default, deserialize_with = "optional_amount")]
    capital_cost: Option<f64>,
    #[serde(default, deserialize_with = "optional_amount")]
    revenue: Option<f64>,
}

impl From<CashFlowRecord> for CashFlowRow {
    fn from(record: CashFlowRecord) -> Self {
        Self {
            year: record.year,
            operating_cost: record.operating_cost,
            capital_cost: record.capital_cost,
            revenue: record.revenue,
        }
    }
}

/// Reads the rows of a cash-flow CSV file.
pub fn read_cash_flows(path: &Path) -> CliResult<Vec<CashFlowRow>> {
    let input_error = |source| CliError::Input {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(input_error)?;

    let mut rows = Vec::new();
    for record in reader.deserialize::<CashFlowRecord>() {
        rows.push(record.map_err(input_error)?.into());
    }

    tracing::debug!("read {} cash-flow rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// One sample of an `x,y` data file.
#[derive(Debug, Deserialize)]
struct PointRecord {
    x: f64,
    y: f64,
}

/// Reads `x,y` samples from a CSV file.
pub fn read_points(path: &Path) -> CliResult<(Vec<f64>, Vec<f64>)> {
    let input_error = |source| CliError::Input {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(input_error)?;

    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for record in reader.deserialize::<PointRecord>() {
        let point = record.map_err(input_error)?;
        xs.push(point.x);
        ys.push(point.y);
    }

    tracing::debug!("read {} points from {}", xs.len(), path.display());
    Ok((xs, ys))
}
