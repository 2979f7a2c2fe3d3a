//! Square rock-pillar design for room-and-pillar workings.
//!
//! The workflow has three steps:
//!
//! 1. Fit the size effect `S = k * l^(-a)` to laboratory strengths of
//!    specimens of edge `l` (mm) with [`fit_strength`].
//! 2. Scale to the in-situ reference size (1 m cube by default) with
//!    [`reference_strength`], giving `S1` in MPa.
//! 3. Solve for the pillar width `w` at which the Obert-Duvall pillar
//!    strength `S1 * (0.64 + 0.36 w/h)` equals the required factor of
//!    safety times the tributary-area stress `gamma * H * ((w + Wg)/w)^2`.
//!
//! Multiplying through by `w^2` gives the design cubic
//!
//! ```text
//! A1 w^3 + A2 w^2 + A3 w + A4 = 0
//! A1 = 0.36 * S1 * 1e6 / h
//! A2 = 0.64 * S1 * 1e6 - FOS * gamma * H
//! A3 = -2 * FOS * gamma * H * Wg
//! A4 = -FOS * gamma * H * Wg^2
//! ```
//!
//! which [`solve_width`] hands to the Newton-Raphson solver.

use log::debug;
use serde::{Deserialize, Serialize};

use minekit_math::regression::{fit_power_law, PowerLawFit};
use minekit_math::solvers::{newton_raphson, SolverConfig};

use crate::error::{ensure_positive, AnalyticsError, AnalyticsResult};

/// Default factor of safety.
pub const DEFAULT_SAFETY_FACTOR: f64 = 1.35;

/// Default unit weight of the overburden (N/m^3): 2.6 t/m^3 under 9.81 m/s^2.
pub const DEFAULT_UNIT_WEIGHT: f64 = 2.6e3 * 9.81;

/// Default depth below surface (m).
pub const DEFAULT_DEPTH: f64 = 200.0;

/// Default gallery (room) width (m).
pub const DEFAULT_GALLERY_WIDTH: f64 = 4.5;

/// Default pillar height (m).
pub const DEFAULT_PILLAR_HEIGHT: f64 = 3.0;

/// Default in-situ reference specimen size (mm).
pub const DEFAULT_REFERENCE_SIZE: f64 = 1000.0;

/// Default starting width for the Newton iteration (m).
pub const DEFAULT_INITIAL_WIDTH: f64 = 100.0;

/// Default tolerance on successive width estimates (m).
pub const DEFAULT_WIDTH_TOLERANCE: f64 = 1e-4;

/// Geometry, loading and solver settings of a pillar design.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PillarDesignParams {
    /// Required factor of safety.
    pub safety_factor: f64,
    /// Unit weight of the overburden (N/m^3).
    pub unit_weight: f64,
    /// Depth below surface (m).
    pub depth: f64,
    /// Gallery width (m).
    pub gallery_width: f64,
    /// Pillar height (m).
    pub pillar_height: f64,
    /// Reference specimen size for the in-situ strength (mm).
    pub reference_size: f64,
    /// Starting width for the iteration (m).
    pub initial_width: f64,
    /// Solver tolerance and budget.
    pub solver: SolverConfig,
}

impl Default for PillarDesignParams {
    fn default() -> Self {
        Self {
            safety_factor: DEFAULT_SAFETY_FACTOR,
            unit_weight: DEFAULT_UNIT_WEIGHT,
            depth: DEFAULT_DEPTH,
            gallery_width: DEFAULT_GALLERY_WIDTH,
            pillar_height: DEFAULT_PILLAR_HEIGHT,
            reference_size: DEFAULT_REFERENCE_SIZE,
            initial_width: DEFAULT_INITIAL_WIDTH,
            solver: SolverConfig::new(DEFAULT_WIDTH_TOLERANCE, 100),
        }
    }
}

impl PillarDesignParams {
    /// Sets the factor of safety.
    #[must_use]
    pub fn with_safety_factor(mut self, safety_factor: f64) -> Self {
        self.safety_factor = safety_factor;
        self
    }

    /// Sets the overburden unit weight (N/m^3).
    #[must_use]
    pub fn with_unit_weight(mut self, unit_weight: f64) -> Self {
        self.unit_weight = unit_weight;
        self
    }

    /// Sets the depth (m).
    #[must_use]
    pub fn with_depth(mut self, depth: f64) -> Self {
        self.depth = depth;
        self
    }

    /// Sets the gallery width (m).
    #[must_use]
    pub fn with_gallery_width(mut self, gallery_width: f64) -> Self {
        self.gallery_width = gallery_width;
        self
    }

    /// Sets the pillar height (m).
    #[must_use]
    pub fn with_pillar_height(mut self, pillar_height: f64) -> Self {
        self.pillar_height = pillar_height;
        self
    }

    /// Sets the reference specimen size (mm).
    #[must_use]
    pub fn with_reference_size(mut self, reference_size: f64) -> Self {
        self.reference_size = reference_size;
        self
    }

    /// Sets the starting width (m).
    #[must_use]
    pub fn with_initial_width(mut self, initial_width: f64) -> Self {
        self.initial_width = initial_width;
        self
    }

    /// Sets the solver configuration.
    #[must_use]
    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    /// Checks that every physical quantity is positive and finite.
    pub fn validate(&self) -> AnalyticsResult<()> {
        ensure_positive("safety factor", self.safety_factor)?;
        ensure_positive("unit weight", self.unit_weight)?;
        ensure_positive("depth", self.depth)?;
        ensure_positive("gallery width", self.gallery_width)?;
        ensure_positive("pillar height", self.pillar_height)?;
        ensure_positive("reference size", self.reference_size)?;
        ensure_positive("initial width", self.initial_width)?;
        Ok(())
    }

    /// Vertical stress from the overburden times the factor of safety (Pa).
    fn design_load(&self) -> f64 {
        self.safety_factor * self.unit_weight * self.depth
    }
}

/// Fits the size-effect law `S = k * l^(-a)` to specimen sizes (mm) and
/// strengths (MPa).
pub fn fit_strength(sizes: &[f64], strengths: &[f64]) -> AnalyticsResult<PowerLawFit> {
    Ok(fit_power_law(sizes, strengths)?)
}

/// In-situ strength `S1 = k * reference_size^(-a)` in MPa.
pub fn reference_strength(fit: &PowerLawFit, reference_size: f64) -> AnalyticsResult<f64> {
    ensure_positive("reference size", reference_size)?;
    Ok(fit.evaluate(reference_size))
}

/// Coefficients of the design cubic in the pillar width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PillarCubic {
    /// Coefficient of `w^3`.
    pub a1: f64,
    /// Coefficient of `w^2`.
    pub a2: f64,
    /// Coefficient of `w`.
    pub a3: f64,
    /// Constant term.
    pub a4: f64,
}

impl PillarCubic {
    /// Builds the cubic for `params` and in-situ strength `s1` (MPa).
    #[must_use]
    pub fn new(params: &PillarDesignParams, s1: f64) -> Self {
        let strength = s1 * 1e6;
        let load = params.design_load();
        let wg = params.gallery_width;
        Self {
            a1: 0.36 * strength / params.pillar_height,
            a2: 0.64 * strength - load,
            a3: -2.0 * load * wg,
            a4: -load * wg * wg,
        }
    }

    /// Evaluates the cubic at `w`.
    #[must_use]
    pub fn evaluate(&self, w: f64) -> f64 {
        ((self.a1 * w + self.a2) * w + self.a3) * w + self.a4
    }

    /// Evaluates the derivative at `w`.
    #[must_use]
    pub fn derivative(&self, w: f64) -> f64 {
        (3.0 * self.a1 * w + 2.0 * self.a2) * w + self.a3
    }
}

/// A solved pillar design.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PillarDesign {
    /// Required pillar width (m).
    pub width: f64,
    /// The design cubic that was solved.
    pub cubic: PillarCubic,
    /// Newton updates used.
    pub iterations: u32,
}

/// Solves the design cubic for the pillar width.
///
/// # Errors
///
/// * [`AnalyticsError::InvalidInput`] if a parameter or `s1` is not
///   positive and finite.
/// * [`AnalyticsError::Math`] if the iteration does not converge.
pub fn solve_width(params: &PillarDesignParams, s1: f64) -> AnalyticsResult<PillarDesign> {
    params.validate()?;
    ensure_positive("in-situ strength", s1)?;

    let cubic = PillarCubic::new(params, s1);
    let result = newton_raphson(
        |w| cubic.evaluate(w),
        |w| cubic.derivative(w),
        params.initial_width,
        &params.solver,
    )?;

    debug!(
        "pillar: depth {} m, gallery {} m -> width {:.4} m ({} iterations)",
        params.depth, params.gallery_width, result.root, result.iterations
    );

    Ok(PillarDesign {
        width: result.root,
        cubic,
        iterations: result.iterations,
    })
}

/// Pillar widths for every combination of depth and gallery width.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DesignTable {
    /// Row labels: depths (m).
    pub depths: Vec<f64>,
    /// Column labels: gallery widths (m).
    pub gallery_widths: Vec<f64>,
    /// `widths[i][j]` is the pillar width at `depths[i]`, `gallery_widths[j]`.
    pub widths: Vec<Vec<f64>>,
}

impl DesignTable {
    /// Pillar width at row `depth_index`, column `gallery_index`.
    #[must_use]
    pub fn get(&self, depth_index: usize, gallery_index: usize) -> Option<f64> {
        self.widths.get(depth_index)?.get(gallery_index).copied()
    }
}

/// Solves [`solve_width`] over a grid of depths and gallery widths, keeping
/// every other parameter of `base`.
///
/// # Errors
///
/// [`AnalyticsError::InvalidInput`] for an empty grid, and
/// [`AnalyticsError::DesignPointFailed`] naming the first grid point that
/// could not be solved.
pub fn design_table(
    base: &PillarDesignParams,
    s1: f64,
    depths: &[f64],
    gallery_widths: &[f64],
) -> AnalyticsResult<DesignTable> {
    if depths.is_empty() || gallery_widths.is_empty() {
        return Err(AnalyticsError::invalid_input(
            "design table needs at least one depth and one gallery width",
        ));
    }

    let mut widths = Vec::with_capacity(depths.len());
    for &depth in depths {
        let mut row = Vec::with_capacity(gallery_widths.len());
        for &gallery_width in gallery_widths {
            let params = base.with_depth(depth).with_gallery_width(gallery_width);
            let design = match solve_width(&params, s1) {
                Ok(design) => design,
                Err(AnalyticsError::Math(source)) => {
                    return Err(AnalyticsError::DesignPointFailed {
                        depth,
                        gallery_width,
                        source,
                    })
                }
                Err(err) => return Err(err),
            };
            row.push(design.width);
        }
        widths.push(row);
    }

    Ok(DesignTable {
        depths: depths.to_vec(),
        gallery_widths: gallery_widths.to_vec(),
        widths,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SIZES: [f64; 4] = [25.0, 50.0, 75.0, 100.0];
    const STRENGTHS: [f64; 4] = [18.0, 10.0, 7.0, 6.0];

    fn lab_strength() -> f64 {
        let fit = fit_strength(&SIZES, &STRENGTHS).unwrap();
        reference_strength(&fit, DEFAULT_REFERENCE_SIZE).unwrap()
    }

    #[test]
    fn test_size_effect_fit() {
        let fit = fit_strength(&SIZES, &STRENGTHS).unwrap();

        assert_relative_eq!(fit.a, 0.809_592, epsilon = 1e-5);
        assert_relative_eq!(fit.k, 240.294, epsilon = 1e-2);
        assert!(fit.evaluate(25.0) > fit.evaluate(100.0));
    }

    #[test]
    fn test_reference_strength() {
        assert_relative_eq!(lab_strength(), 0.895_298, epsilon = 1e-5);
    }

    #[test]
    fn test_default_design() {
        let s1 = lab_strength();
        let design = solve_width(&PillarDesignParams::default(), s1).unwrap();

        assert_relative_eq!(design.width, 67.586, epsilon = 1e-3);
        assert!(design.cubic.evaluate(design.width).abs() / design.cubic.a1.abs() < 1e-3);
        assert_relative_eq!(design.cubic.a1, 107_435.733_78, max_relative = 1e-6);
    }

    #[test]
    fn test_design_balances_strength_and_load() {
        let s1 = lab_strength();
        let params = PillarDesignParams::default().with_depth(123.0);
        let w = solve_width(&params, s1).unwrap().width;

        let strength = s1 * 1e6 * (0.64 + 0.36 * w / params.pillar_height);
        let stress = params.unit_weight * params.depth * ((w + params.gallery_width) / w).powi(2);
        assert_relative_eq!(strength / stress, params.safety_factor, max_relative = 1e-6);
    }

    #[test]
    fn test_design_table() {
        let s1 = lab_strength();
        let depths = [63.0, 93.0, 123.0, 153.0, 243.0, 363.0];
        let galleries = [3.0, 3.6, 4.0, 4.2, 4.8];

        let table = design_table(&PillarDesignParams::default(), s1, &depths, &galleries).unwrap();

        assert_eq!(table.widths.len(), depths.len());
        assert!(table.widths.iter().all(|row| row.len() == galleries.len()));
        assert_relative_eq!(table.get(0, 0).unwrap(), 21.030, epsilon = 1e-3);
        assert_relative_eq!(table.get(5, 4).unwrap(), 120.464, epsilon = 1e-3);
        assert!(table.get(6, 0).is_none());

        // Wider galleries and deeper workings need wider pillars
        for row in &table.widths {
            assert!(row.windows(2).all(|pair| pair[0] < pair[1]));
        }
        for j in 0..galleries.len() {
            assert!(table.widths.windows(2).all(|rows| rows[0][j] < rows[1][j]));
        }
    }

    #[test]
    fn test_invalid_parameters() {
        let s1 = lab_strength();

        let params = PillarDesignParams::default().with_pillar_height(0.0);
        assert!(matches!(
            solve_width(&params, s1),
            Err(AnalyticsError::InvalidInput(_))
        ));
        assert!(matches!(
            solve_width(&PillarDesignParams::default(), -1.0),
            Err(AnalyticsError::InvalidInput(_))
        ));
        assert!(design_table(&PillarDesignParams::default(), s1, &[], &[4.0]).is_err());
    }

    #[test]
    fn test_design_point_failure_is_located() {
        let s1 = lab_strength();
        let params = PillarDesignParams::default().with_solver(SolverConfig::new(1e-12, 1));

        let result = design_table(&params, s1, &[150.0], &[4.0]);

        match result {
            Err(AnalyticsError::DesignPointFailed {
                depth,
                gallery_width,
                ..
            }) => {
                assert_eq!(depth, 150.0);
                assert_eq!(gallery_width, 4.0);
            }
            other => panic!("Expected DesignPointFailed, got {other:?}"),
        }
    }
}
