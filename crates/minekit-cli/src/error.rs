//! CLI error types.

use std::path::PathBuf;

use minekit_analytics::AnalyticsError;
use minekit_math::MathError;
use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// A value that should be a number is not one.
    #[error("Invalid number: '{0}'")]
    InvalidNumber(String),

    /// Missing required argument.
    #[error("Missing required argument: {0}")]
    MissingArgument(String),

    /// Mutually dependent arguments disagree.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Unknown configuration key.
    #[error("Unknown configuration key: {0}. Run `minekit config list` for the available keys.")]
    UnknownConfigKey(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input file could not be read.
    #[error("Cannot read {path}: {source}")]
    Input {
        /// File that failed.
        path: PathBuf,
        /// Underlying CSV or IO error.
        #[source]
        source: csv::Error,
    },

    /// Numerical routine rejected its input or failed to converge.
    #[error(transparent)]
    Math(#[from] MathError),

    /// Engineering calculation failed.
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
