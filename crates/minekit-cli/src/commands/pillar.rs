//! Pillar command implementation.
//!
//! Fits the rock size effect to laboratory strengths, then sizes square
//! pillars for one design point or a grid of depths and gallery widths.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use minekit_analytics::pillar::{
    design_table, fit_strength, reference_strength, solve_width, DesignTable, PillarDesign,
    PillarDesignParams,
};
use minekit_math::regression::PowerLawFit;

use crate::cli::{Context, OutputFormat};
use crate::commands::config::ConfigKey;
use crate::commands::parse_list;
use crate::error::CliResult;
use crate::output::{print_grid, print_header, print_json_value, print_report, KeyValue};

/// Arguments for the pillar command.
#[derive(Args, Debug)]
pub struct PillarArgs {
    /// Specimen sizes in mm (comma-separated, e.g., "25,50,75,100")
    #[arg(long)]
    pub sizes: String,

    /// Specimen strengths in MPa (comma-separated, e.g., "18,10,7,6")
    #[arg(long)]
    pub strengths: String,

    /// Mining depth (m) [default: depth setting]
    #[arg(long)]
    pub depth: Option<f64>,

    /// Gallery width (m) [default: gallery_width setting]
    #[arg(long)]
    pub gallery_width: Option<f64>,

    /// Factor of safety [default: safety_factor setting]
    #[arg(long)]
    pub safety_factor: Option<f64>,

    /// Overburden unit weight (N/m^3) [default: unit_weight setting]
    #[arg(long)]
    pub unit_weight: Option<f64>,

    /// Pillar height (m) [default: pillar_height setting]
    #[arg(long)]
    pub pillar_height: Option<f64>,

    /// Size for the in-situ strength (mm) [default: reference_size setting]
    #[arg(long)]
    pub reference_size: Option<f64>,

    /// Tabulate widths over --depths and --gallery-widths
    #[arg(long)]
    pub table: bool,

    /// Depths for --table (m, comma-separated)
    #[arg(long, default_value = "63,163,263,363")]
    pub depths: String,

    /// Gallery widths for --table (m, comma-separated)
    #[arg(long, default_value = "3,3.6,4.2,4.8")]
    pub gallery_widths: String,
}

#[derive(Serialize)]
struct PillarOutput {
    strength_fit: PowerLawFit,
    in_situ_strength: f64,
    params: PillarDesignParams,
    #[serde(skip_serializing_if = "Option::is_none")]
    design: Option<PillarDesign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    table: Option<DesignTable>,
}

/// Resolves each parameter from its flag, falling back to the config file.
fn design_params(args: &PillarArgs, ctx: &Context) -> CliResult<PillarDesignParams> {
    let pick = |flag: Option<f64>, key: ConfigKey| -> CliResult<f64> {
        match flag {
            Some(value) => Ok(value),
            None => ctx.config.parse(key),
        }
    };

    Ok(PillarDesignParams::default()
        .with_depth(pick(args.depth, ConfigKey::Depth)?)
        .with_gallery_width(pick(args.gallery_width, ConfigKey::GalleryWidth)?)
        .with_safety_factor(pick(args.safety_factor, ConfigKey::SafetyFactor)?)
        .with_unit_weight(pick(args.unit_weight, ConfigKey::UnitWeight)?)
        .with_pillar_height(pick(args.pillar_height, ConfigKey::PillarHeight)?)
        .with_reference_size(pick(args.reference_size, ConfigKey::ReferenceSize)?))
}

/// Execute the pillar command.
pub fn execute(args: PillarArgs, ctx: &Context) -> Result<()> {
    let sizes = parse_list(&args.sizes)?;
    let strengths = parse_list(&args.strengths)?;
    let params = design_params(&args, ctx)?;

    let fit = fit_strength(&sizes, &strengths)?;
    let s1 = reference_strength(&fit, params.reference_size)?;
    tracing::debug!("pillar: k = {}, a = {}, S1 = {s1} MPa", fit.k, fit.a);

    let p = ctx.precision;
    let mut output = PillarOutput {
        strength_fit: fit,
        in_situ_strength: s1,
        params,
        design: None,
        table: None,
    };

    if args.table {
        let depths = parse_list(&args.depths)?;
        let gallery_widths = parse_list(&args.gallery_widths)?;
        let table = design_table(&params, s1, &depths, &gallery_widths)?;

        if ctx.format == OutputFormat::Json {
            output.table = Some(table);
            return print_json_value(&output);
        }

        let mut header = vec!["Depth (m)".to_string()];
        header.extend(gallery_widths.iter().map(|wg| format!("Wg = {wg} m")));
        let rows: Vec<Vec<String>> = table
            .depths
            .iter()
            .zip(&table.widths)
            .map(|(depth, widths)| {
                std::iter::once(depth.to_string())
                    .chain(widths.iter().map(|w| ctx.number(*w)))
                    .collect::<Vec<String>>()
            })
            .collect();

        if ctx.format == OutputFormat::Table && !ctx.quiet {
            print_header(&format!(
                "Pillar Width (m), k = {}, a = {}, S1 = {} MPa",
                ctx.number(fit.k),
                ctx.number(fit.a),
                ctx.number(s1)
            ));
        }
        return print_grid(header, rows, ctx.format);
    }

    let design = solve_width(&params, s1)?;
    let results = vec![
        KeyValue::from_f64("k", fit.k, p),
        KeyValue::from_f64("a", fit.a, p),
        KeyValue::from_f64("In-situ Strength (MPa)", s1, p),
        KeyValue::new("Depth (m)", params.depth.to_string()),
        KeyValue::new("Gallery Width (m)", params.gallery_width.to_string()),
        KeyValue::new("Factor of Safety", params.safety_factor.to_string()),
        KeyValue::from_f64("Pillar Width (m)", design.width, p),
        KeyValue::new("Iterations", design.iterations.to_string()),
    ];
    output.design = Some(design);

    print_report(
        ctx,
        "Pillar Design",
        &results,
        &output,
        &ctx.number(design.width),
    )
}
