//! Minekit CLI - Command-line interface for mining engineering calculations.
//!
//! # Usage
//!
//! ```bash
//! # Fit a line
//! minekit regress --x 1,2,3 --y 2,4,6
//!
//! # Integrate a benchmark function
//! minekit integrate --function f1 --rule simpson -n 10
//!
//! # Value a project
//! minekit npv --csv project.csv --tax 30 --discount 10
//! minekit irr --csv project.csv --tax 30
//!
//! # Size a pillar from laboratory strengths
//! minekit pillar --sizes 25,50,75,100 --strengths 18,10,7,6
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod error;
mod output;

use cli::{Cli, Commands, Context};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("minekit=debug,minekit_math=debug,minekit_analytics=debug")
        })
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // Results go to stdout, diagnostics to stderr
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let ctx = Context::from_cli(&cli)?;

    match cli.command {
        Commands::Regress(args) => commands::regress::execute(args, &ctx)?,
        Commands::Integrate(args) => commands::integrate::execute(args, &ctx)?,
        Commands::Study(args) => commands::study::execute(args, &ctx)?,
        Commands::Npv(args) => commands::npv::execute(args, &ctx)?,
        Commands::Irr(args) => commands::irr::execute(args, &ctx)?,
        Commands::Pillar(args) => commands::pillar::execute(args, &ctx)?,
        Commands::Config(args) => commands::config::execute(args, &ctx)?,
    }

    Ok(())
}
