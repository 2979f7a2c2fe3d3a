//! Config command implementation.
//!
//! Manages persisted defaults for output and engineering parameters.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use minekit_analytics::cashflows::irr::{DEFAULT_INITIAL_GUESS, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};
use minekit_analytics::pillar::{
    DEFAULT_DEPTH, DEFAULT_GALLERY_WIDTH, DEFAULT_PILLAR_HEIGHT, DEFAULT_REFERENCE_SIZE,
    DEFAULT_SAFETY_FACTOR, DEFAULT_UNIT_WEIGHT,
};

use crate::cli::{Context, OutputFormat};
use crate::error::{CliError, CliResult};
use crate::output::{print_header, print_info, print_output, print_success, print_warning, KeyValue};

/// Decimal places used when `precision` is unset or invalid.
pub const DEFAULT_PRECISION: usize = 6;

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Get a configuration value
    Get(GetArgs),

    /// Set a configuration value
    Set(SetArgs),

    /// List available configuration keys
    List,

    /// Reset configuration to defaults
    Reset(ResetArgs),

    /// Show configuration file location
    Path,
}

/// Arguments for get subcommand.
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Configuration key
    pub key: String,
}

/// Arguments for set subcommand.
#[derive(Args, Debug)]
pub struct SetArgs {
    /// Configuration key
    pub key: String,

    /// Configuration value
    pub value: String,
}

/// Arguments for reset subcommand.
#[derive(Args, Debug)]
pub struct ResetArgs {
    /// Reset all settings (not just one)
    #[arg(long)]
    pub all: bool,

    /// Specific key to reset (optional)
    pub key: Option<String>,
}

/// CLI configuration keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    /// Default output format
    DefaultFormat,
    /// Decimal places in formatted output
    Precision,
    /// Pillar factor of safety
    SafetyFactor,
    /// Overburden unit weight
    UnitWeight,
    /// Pillar height
    PillarHeight,
    /// Size the in-situ strength is evaluated at
    ReferenceSize,
    /// Default mining depth
    Depth,
    /// Default gallery width
    GalleryWidth,
    /// IRR starting rate
    IrrGuess,
    /// IRR stopping tolerance
    IrrTolerance,
    /// IRR iteration budget
    IrrMaxIterations,
}

impl ConfigKey {
    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "default_format" | "format" => Some(Self::DefaultFormat),
            "precision" | "decimal_precision" => Some(Self::Precision),
            "safety_factor" | "fos" => Some(Self::SafetyFactor),
            "unit_weight" => Some(Self::UnitWeight),
            "pillar_height" => Some(Self::PillarHeight),
            "reference_size" => Some(Self::ReferenceSize),
            "depth" => Some(Self::Depth),
            "gallery_width" => Some(Self::GalleryWidth),
            "irr_guess" => Some(Self::IrrGuess),
            "irr_tolerance" => Some(Self::IrrTolerance),
            "irr_max_iterations" => Some(Self::IrrMaxIterations),
            _ => None,
        }
    }

    /// Canonical key name as stored in the file.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DefaultFormat => "default_format",
            Self::Precision => "precision",
            Self::SafetyFactor => "safety_factor",
            Self::UnitWeight => "unit_weight",
            Self::PillarHeight => "pillar_height",
            Self::ReferenceSize => "reference_size",
            Self::Depth => "depth",
            Self::GalleryWidth => "gallery_width",
            Self::IrrGuess => "irr_guess",
            Self::IrrTolerance => "irr_tolerance",
            Self::IrrMaxIterations => "irr_max_iterations",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Self::DefaultFormat => "Default output format (table, json, csv, minimal)",
            Self::Precision => "Number of decimal places for output (0-12)",
            Self::SafetyFactor => "Pillar factor of safety",
            Self::UnitWeight => "Overburden unit weight (N/m^3)",
            Self::PillarHeight => "Pillar height (m)",
            Self::ReferenceSize => "Size for the in-situ strength (mm)",
            Self::Depth => "Mining depth (m)",
            Self::GalleryWidth => "Gallery width (m)",
            Self::IrrGuess => "IRR starting rate (percent)",
            Self::IrrTolerance => "IRR tolerance on successive rates (percentage points)",
            Self::IrrMaxIterations => "IRR iteration budget",
        }
    }

    fn default_value(self) -> String {
        match self {
            Self::DefaultFormat => "table".to_string(),
            Self::Precision => DEFAULT_PRECISION.to_string(),
            Self::SafetyFactor => DEFAULT_SAFETY_FACTOR.to_string(),
            Self::UnitWeight => DEFAULT_UNIT_WEIGHT.to_string(),
            Self::PillarHeight => DEFAULT_PILLAR_HEIGHT.to_string(),
            Self::ReferenceSize => DEFAULT_REFERENCE_SIZE.to_string(),
            Self::Depth => DEFAULT_DEPTH.to_string(),
            Self::GalleryWidth => DEFAULT_GALLERY_WIDTH.to_string(),
            Self::IrrGuess => DEFAULT_INITIAL_GUESS.to_string(),
            Self::IrrTolerance => DEFAULT_TOLERANCE.to_string(),
            Self::IrrMaxIterations => DEFAULT_MAX_ITERATIONS.to_string(),
        }
    }

    fn all() -> &'static [Self] {
        &[
            Self::DefaultFormat,
            Self::Precision,
            Self::SafetyFactor,
            Self::UnitWeight,
            Self::PillarHeight,
            Self::ReferenceSize,
            Self::Depth,
            Self::GalleryWidth,
            Self::IrrGuess,
            Self::IrrTolerance,
            Self::IrrMaxIterations,
        ]
    }
}

impl FromStr for ConfigKey {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| CliError::UnknownConfigKey(s.to_string()))
    }
}

/// Simple config storage.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(flatten)]
    values: BTreeMap<String, String>,
}

impl Config {
    /// Loads the file at `path`.
    ///
    /// A missing file is an empty configuration. An unreadable or malformed
    /// file is logged and treated as empty too, and the next `config set` or
    /// `config reset` overwrites it.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::read(path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("ignoring config file {}: {err}", path.display());
                Self::default()
            }
        }
    }

    fn read(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, path: &Path) -> CliResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Stored value for `key`, or its default.
    pub fn value(&self, key: ConfigKey) -> String {
        self.values
            .get(key.as_str())
            .cloned()
            .unwrap_or_else(|| key.default_value())
    }

    /// Parses the value for `key`.
    pub fn parse<T: FromStr>(&self, key: ConfigKey) -> CliResult<T> {
        let value = self.value(key);
        value.parse().map_err(|_| {
            CliError::Config(format!("{} has an invalid value: {value}", key.as_str()))
        })
    }

    fn set(&mut self, key: ConfigKey, value: String) {
        self.values.insert(key.as_str().to_string(), value);
    }

    fn remove(&mut self, key: ConfigKey) {
        self.values.remove(key.as_str());
    }

    fn clear(&mut self) {
        self.values.clear();
    }
}

/// Get the per-user config file path.
pub fn config_path() -> CliResult<PathBuf> {
    let home = dirs::config_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| CliError::Config("could not determine config directory".to_string()))?;
    Ok(home.join("minekit").join("config.json"))
}

/// Execute the config command.
pub fn execute(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => execute_show(ctx),
        ConfigCommand::Get(get_args) => execute_get(&get_args, ctx),
        ConfigCommand::Set(set_args) => execute_set(set_args, ctx),
        ConfigCommand::List => execute_list(ctx),
        ConfigCommand::Reset(reset_args) => execute_reset(&reset_args, ctx),
        ConfigCommand::Path => {
            execute_path(ctx);
            Ok(())
        }
    }
}

/// Show current configuration.
fn execute_show(ctx: &Context) -> Result<()> {
    let results: Vec<KeyValue> = ConfigKey::all()
        .iter()
        .map(|key| KeyValue::new(key.as_str(), ctx.config.value(*key)))
        .collect();

    match ctx.format {
        OutputFormat::Table => {
            if !ctx.quiet {
                print_header("Current Configuration");
            }
            print_output(&results, ctx.format)?;
        }
        OutputFormat::Json => {
            let output: BTreeMap<&str, String> = ConfigKey::all()
                .iter()
                .map(|key| (key.as_str(), ctx.config.value(*key)))
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Csv => print_output(&results, ctx.format)?,
        OutputFormat::Minimal => {
            for kv in &results {
                println!("{}={}", kv.key, kv.value);
            }
        }
    }

    Ok(())
}

/// Get a configuration value.
fn execute_get(args: &GetArgs, ctx: &Context) -> Result<()> {
    let key: ConfigKey = args.key.parse()?;
    let value = ctx.config.value(key);

    match ctx.format {
        OutputFormat::Table | OutputFormat::Csv => println!("{}: {}", key.as_str(), value),
        OutputFormat::Json => {
            let output = serde_json::json!({
                "key": key.as_str(),
                "value": value
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Minimal => println!("{value}"),
    }

    Ok(())
}

/// Set a configuration value.
fn execute_set(args: SetArgs, ctx: &Context) -> Result<()> {
    let key: ConfigKey = args.key.parse()?;
    validate_config_value(key, &args.value)?;

    let mut config = Config::load(&ctx.config_path);
    config.set(key, args.value.clone());
    config.save(&ctx.config_path)?;

    if !ctx.quiet {
        print_success(&format!("Set {} = {}", key.as_str(), args.value));
    }
    Ok(())
}

/// List available configuration keys.
fn execute_list(ctx: &Context) -> Result<()> {
    match ctx.format {
        OutputFormat::Table => {
            let results: Vec<KeyValue> = ConfigKey::all()
                .iter()
                .map(|key| {
                    KeyValue::new(
                        key.as_str(),
                        format!("{} (default: {})", key.description(), key.default_value()),
                    )
                })
                .collect();
            if !ctx.quiet {
                print_header("Available Configuration Keys");
            }
            print_output(&results, ctx.format)?;
        }
        OutputFormat::Json => {
            let output: Vec<_> = ConfigKey::all()
                .iter()
                .map(|key| {
                    serde_json::json!({
                        "key": key.as_str(),
                        "description": key.description(),
                        "default": key.default_value()
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            wtr.write_record(["key", "description", "default"])?;
            for key in ConfigKey::all() {
                wtr.write_record([key.as_str(), key.description(), key.default_value().as_str()])?;
            }
            wtr.flush()?;
        }
        OutputFormat::Minimal => {
            for key in ConfigKey::all() {
                println!("{}", key.as_str());
            }
        }
    }

    Ok(())
}

/// Reset configuration.
fn execute_reset(args: &ResetArgs, ctx: &Context) -> Result<()> {
    let mut config = Config::load(&ctx.config_path);

    if args.all {
        config.clear();
        config.save(&ctx.config_path)?;
        if !ctx.quiet {
            print_success("Reset all configuration to defaults");
        }
    } else if let Some(key_str) = &args.key {
        let key: ConfigKey = key_str.parse()?;
        config.remove(key);
        config.save(&ctx.config_path)?;
        if !ctx.quiet {
            print_success(&format!(
                "Reset {} to default ({})",
                key.as_str(),
                key.default_value()
            ));
        }
    } else {
        print_warning("Use --all to reset all settings, or specify a key to reset");
    }

    Ok(())
}

/// Show configuration file path.
fn execute_path(ctx: &Context) {
    if ctx.format == OutputFormat::Minimal {
        println!("{}", ctx.config_path.display());
        return;
    }
    print_info(&format!("Config file: {}", ctx.config_path.display()));
    if ctx.config_path.exists() {
        print_info("Status: exists");
    } else {
        print_info("Status: not created yet (using defaults)");
    }
}

/// Validate a configuration value.
fn validate_config_value(key: ConfigKey, value: &str) -> CliResult<()> {
    let invalid = |expected: &str| {
        CliError::Config(format!(
            "invalid value for {}: {value}. {expected}",
            key.as_str()
        ))
    };

    match key {
        ConfigKey::DefaultFormat => {
            <OutputFormat as ValueEnum>::from_str(value, true)
                .map_err(|_| invalid("Use table, json, csv, or minimal."))?;
        }
        ConfigKey::Precision => {
            let precision: usize = value.parse().map_err(|_| invalid("Must be a number."))?;
            if precision > 12 {
                return Err(invalid("Must be between 0 and 12."));
            }
        }
        ConfigKey::IrrMaxIterations => {
            let budget: u32 = value.parse().map_err(|_| invalid("Must be a whole number."))?;
            if budget == 0 {
                return Err(invalid("Must be at least 1."));
            }
        }
        ConfigKey::IrrGuess => {
            let guess: f64 = value.parse().map_err(|_| invalid("Must be a number."))?;
            if !guess.is_finite() || guess <= -100.0 {
                return Err(invalid("Must be a finite rate above -100."));
            }
        }
        ConfigKey::SafetyFactor
        | ConfigKey::UnitWeight
        | ConfigKey::PillarHeight
        | ConfigKey::ReferenceSize
        | ConfigKey::Depth
        | ConfigKey::GalleryWidth
        | ConfigKey::IrrTolerance => {
            let number: f64 = value.parse().map_err(|_| invalid("Must be a number."))?;
            if !(number.is_finite() && number > 0.0) {
                return Err(invalid("Must be positive."));
            }
        }
    }
    Ok(())
}
