//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::commands::config::{config_path, Config, ConfigKey, DEFAULT_PRECISION};
use crate::commands::{
    ConfigArgs, IntegrateArgs, IrrArgs, NpvArgs, PillarArgs, RegressArgs, StudyArgs,
};
use crate::error::CliResult;

/// Minekit - Numerical toolkit for mining engineering calculations
#[derive(Parser)]
#[command(name = "minekit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format [default: table, or the `default_format` setting]
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log solver progress to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file to use instead of the per-user one
    #[arg(long, env = "MINEKIT_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Fit a straight line (or a power law) by least squares
    Regress(RegressArgs),

    /// Integrate a function with the trapezoidal or Simpson's rule
    Integrate(IntegrateArgs),

    /// Tabulate quadrature error against the number of subintervals
    Study(StudyArgs),

    /// Net present value of a project's cash flows
    Npv(NpvArgs),

    /// Internal rate of return of a project's cash flows
    Irr(IrrArgs),

    /// Size square pillars from laboratory strength data
    Pillar(PillarArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
    /// Minimal output (just the value)
    Minimal,
}

/// Settings shared by every command.
pub struct Context {
    /// Resolved output format.
    pub format: OutputFormat,
    /// Suppress headers and notices.
    pub quiet: bool,
    /// Decimal places for formatted numbers.
    pub precision: usize,
    /// Location of the configuration file.
    pub config_path: PathBuf,
    /// Loaded configuration.
    pub config: Config,
}

impl Context {
    /// Resolves flags against the configuration file.
    pub fn from_cli(cli: &Cli) -> CliResult<Self> {
        let config_path = match &cli.config {
            Some(path) => path.clone(),
            None => config_path()?,
        };
        let config = Config::load(&config_path);

        let format = cli.format.unwrap_or_else(|| {
            let value = config.value(ConfigKey::DefaultFormat);
            <OutputFormat as ValueEnum>::from_str(&value, true).unwrap_or_else(|_| {
                tracing::warn!("ignoring invalid default_format {value:?}");
                OutputFormat::default()
            })
        });
        let precision = config
            .parse::<usize>(ConfigKey::Precision)
            .unwrap_or_else(|err| {
                tracing::warn!("{err}, using {DEFAULT_PRECISION}");
                DEFAULT_PRECISION
            });

        tracing::debug!("config: {} ({format:?}, precision {precision})", config_path.display());

        Ok(Self {
            format,
            quiet: cli.quiet,
            precision,
            config_path,
            config,
        })
    }

    /// Formats `value` with the configured precision.
    pub fn number(&self, value: f64) -> String {
        format!("{value:.prec$}", prec = self.precision)
    }
}
