//! Internal rate of return.
//!
//! The IRR is the root of `r -> NPV(project, r)`, found with the generic
//! Newton-Raphson solver and the analytic rate derivative of the NPV.
//! Rates are in percent throughout.
//!
//! Running out of iterations is not an error here: the last estimate is
//! returned with [`IrrStatus::IterationLimitReached`] so the caller can
//! decide whether it is good enough.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use minekit_math::error::{MathError, NonConvergenceCause};
use minekit_math::solvers::{NewtonSolver, RootFinder, SolverConfig};

use crate::cashflows::{npv_at, npv_derivative_at, CashFlowProject};
use crate::error::{ensure_finite, AnalyticsResult};

/// Default starting rate (percent).
pub const DEFAULT_INITIAL_GUESS: f64 = 2.0;

/// Default tolerance on successive rate estimates (percentage points).
pub const DEFAULT_TOLERANCE: f64 = 0.01;

/// Default iteration budget.
pub const DEFAULT_MAX_ITERATIONS: u32 = 10_000;

/// Settings for the IRR iteration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IrrConfig {
    /// Starting rate in percent.
    pub initial_guess: f64,
    /// Stop once successive estimates differ by at most this many points.
    pub tolerance: f64,
    /// Iteration budget.
    pub max_iterations: u32,
}

impl Default for IrrConfig {
    fn default() -> Self {
        Self {
            initial_guess: DEFAULT_INITIAL_GUESS,
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl IrrConfig {
    /// Sets the starting rate.
    #[must_use]
    pub fn with_initial_guess(mut self, initial_guess: f64) -> Self {
        self.initial_guess = initial_guess;
        self
    }

    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the iteration budget.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    fn solver_config(&self) -> SolverConfig {
        SolverConfig::new(self.tolerance, self.max_iterations)
    }
}

/// How the IRR iteration ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IrrStatus {
    /// Successive estimates met the tolerance.
    Converged,
    /// The budget ran out; the rate is the last estimate.
    IterationLimitReached,
}

/// Result of an IRR calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IrrResult {
    /// Internal rate of return in percent.
    pub rate: f64,
    /// Number of Newton updates performed.
    pub iterations: u32,
    /// Whether the tolerance was met.
    pub status: IrrStatus,
}

impl IrrResult {
    /// Returns true if the iteration met its tolerance.
    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.status == IrrStatus::Converged
    }
}

/// Internal rate of return with the default settings
/// (start at 2%, tolerance 0.01, at most 10 000 iterations).
pub fn irr(project: &CashFlowProject) -> AnalyticsResult<IrrResult> {
    irr_with(project, &IrrConfig::default())
}

/// Internal rate of return with explicit settings.
///
/// # Errors
///
/// * [`AnalyticsError::InvalidInput`](crate::error::AnalyticsError::InvalidInput)
///   for a non-finite starting rate.
/// * [`AnalyticsError::Math`](crate::error::AnalyticsError::Math) if the
///   tolerance or budget is invalid, if the NPV derivative vanishes or
///   turns non-finite at an iterate (for example when every cash flow sits
///   at year 0), or if the rate runs away because the NPV never changes
///   sign.
pub fn irr_with(project: &CashFlowProject, config: &IrrConfig) -> AnalyticsResult<IrrResult> {
    ensure_finite("initial IRR guess", config.initial_guess)?;

    let solver = NewtonSolver::new(config.solver_config());
    let outcome = solver.find_root(
        |rate| npv_at(project, rate),
        |rate| npv_derivative_at(project, rate),
        config.initial_guess,
    );

    match outcome {
        Ok(result) => {
            debug!(
                "irr: converged to {:.6}% in {} iterations",
                result.root, result.iterations
            );
            Ok(IrrResult {
                rate: result.root,
                iterations: result.iterations,
                status: IrrStatus::Converged,
            })
        }
        Err(MathError::NonConvergent {
            cause: NonConvergenceCause::IterationLimit,
            iterations,
            estimate,
        }) => {
            warn!("irr: iteration limit of {iterations} reached, last estimate {estimate:.6}%");
            Ok(IrrResult {
                rate: estimate,
                iterations,
                status: IrrStatus::IterationLimitReached,
            })
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cashflows::CashFlowRow;
    use crate::error::AnalyticsError;
    use approx::assert_relative_eq;

    /// Builds a project whose NPV is exactly zero at `target` percent.
    fn project_with_irr(target: f64, inflows: &[f64], tax: f64) -> CashFlowProject {
        let base = 1.0 + target / 100.0;
        let after_tax = 1.0 - tax / 100.0;
        let investment: f64 = inflows
            .iter()
            .zip(1..)
            .map(|(cf, t)| cf * after_tax / base.powi(t))
            .sum();

        let mut rows = vec![CashFlowRow::new(0.0).with_capital_cost(investment)];
        for (t, cf) in (1_i32..).zip(inflows) {
            rows.push(CashFlowRow::new(f64::from(t)).with_revenue(*cf));
        }
        CashFlowProject::from_rows(rows, tax, 10.0).unwrap()
    }

    #[test]
    fn test_recovers_constructed_rate() {
        let project = project_with_irr(12.5, &[300.0, 400.0, 500.0, 200.0], 0.0);

        let result = irr(&project).unwrap();

        assert!(result.is_converged());
        assert_relative_eq!(result.rate, 12.5, epsilon = DEFAULT_TOLERANCE);
    }

    #[test]
    fn test_recovers_rate_with_tax() {
        let project = project_with_irr(18.0, &[1200.0, 1200.0, 1500.0, 900.0, 600.0], 30.0);

        let result = project.irr().unwrap();

        assert!(result.is_converged());
        assert_relative_eq!(result.rate, 18.0, epsilon = DEFAULT_TOLERANCE);
        assert!(npv_at(&project, result.rate).abs() < 1.0);
    }

    #[test]
    fn test_negative_rate() {
        // Pay 1000, get 900 back a year later: IRR = -10%
        let project = CashFlowProject::from_rows(
            vec![
                CashFlowRow::new(0.0).with_capital_cost(1000.0),
                CashFlowRow::new(1.0).with_revenue(900.0),
            ],
            0.0,
            5.0,
        )
        .unwrap();

        let result = irr(&project).unwrap();

        assert_relative_eq!(result.rate, -10.0, epsilon = DEFAULT_TOLERANCE);
    }

    #[test]
    fn test_iteration_limit_is_reported_not_raised() {
        let project = project_with_irr(25.0, &[500.0, 500.0, 500.0], 0.0);
        let config = IrrConfig::default()
            .with_tolerance(1e-12)
            .with_max_iterations(1);

        let result = irr_with(&project, &config).unwrap();

        assert_eq!(result.status, IrrStatus::IterationLimitReached);
        assert_eq!(result.iterations, 1);
        assert!(result.rate > DEFAULT_INITIAL_GUESS);
    }

    #[test]
    fn test_all_flows_at_year_zero() {
        let project = CashFlowProject::from_rows(
            vec![CashFlowRow::new(0.0).with_revenue(100.0)],
            0.0,
            10.0,
        )
        .unwrap();

        let result = irr(&project);

        assert!(matches!(
            result,
            Err(AnalyticsError::Math(MathError::NonConvergent {
                cause: NonConvergenceCause::ZeroDerivative,
                ..
            }))
        ));
    }

    #[test]
    fn test_no_sign_change_diverges() {
        // Revenue only: NPV stays positive and the rate estimate runs away
        let project = CashFlowProject::from_rows(
            vec![
                CashFlowRow::new(1.0).with_revenue(100.0),
                CashFlowRow::new(2.0).with_revenue(100.0),
            ],
            0.0,
            10.0,
        )
        .unwrap();

        let result = irr(&project);

        assert!(matches!(
            result,
            Err(AnalyticsError::Math(MathError::NonConvergent {
                cause: NonConvergenceCause::Diverged,
                ..
            }))
        ));
    }

    #[test]
    fn test_invalid_config() {
        let project = project_with_irr(10.0, &[600.0, 600.0], 0.0);

        let bad_guess = IrrConfig::default().with_initial_guess(f64::NAN);
        assert!(matches!(
            irr_with(&project, &bad_guess),
            Err(AnalyticsError::InvalidInput(_))
        ));

        let bad_tolerance = IrrConfig::default().with_tolerance(0.0);
        assert!(matches!(
            irr_with(&project, &bad_tolerance),
            Err(AnalyticsError::Math(MathError::InvalidInput { .. }))
        ));
    }

    #[test]
    fn test_repeatable() {
        let project = project_with_irr(9.0, &[250.0, 250.0, 250.0, 250.0], 15.0);

        let first = irr(&project).unwrap();
        let second = irr(&project).unwrap();

        assert_eq!(first, second);
    }
}
