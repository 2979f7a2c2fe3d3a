//! Root-finding algorithms.
//!
//! This module provides the Newton-Raphson solver used throughout the
//! toolkit: the pillar-width design equation and the IRR equation are both
//! solved by handing a function and its analytic derivative to
//! [`newton_raphson`].
//!
//! # Convergence
//!
//! The iteration stops as soon as two successive estimates differ by no
//! more than [`SolverConfig::tolerance`]. Unlike a textbook loop it never
//! runs forever: after [`SolverConfig::max_iterations`] updates it reports
//! [`MathError::NonConvergent`](crate::error::MathError::NonConvergent)
//! together with the last estimate.
//!
//! # Example: Cube Root
//!
//! ```rust
//! use minekit_math::solvers::{newton_raphson, SolverConfig};
//!
//! let f = |x: f64| x * x * x - 27.0;
//! let df = |x: f64| 3.0 * x * x;
//!
//! let result = newton_raphson(f, df, 2.0, &SolverConfig::default()).unwrap();
//! assert!((result.root - 3.0).abs() < 1e-9);
//! ```

mod newton;

pub use newton::newton_raphson;

use serde::{Deserialize, Serialize};

use crate::error::{MathError, MathResult};

/// Default tolerance for root-finding algorithms.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Default maximum iterations for root-finding algorithms.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Magnitude past which a Newton iterate is reported as
/// [`NonConvergenceCause::Diverged`](crate::error::NonConvergenceCause::Diverged).
pub const DIVERGENCE_LIMIT: f64 = 1e100;

/// Configuration for root-finding algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Tolerance on the distance between successive estimates.
    pub tolerance: f64,
    /// Maximum number of updates.
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration.
    #[must_use]
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Checks that the tolerance is positive and the budget non-zero.
    pub fn validate(&self) -> MathResult<()> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(MathError::invalid_input(format!(
                "tolerance must be positive and finite, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(MathError::invalid_input(
                "max_iterations must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Result of a root-finding iteration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolverResult {
    /// The root found.
    pub root: f64,
    /// Number of updates performed.
    pub iterations: u32,
    /// Function value at the root.
    pub residual: f64,
}

/// Trait for derivative-based root finders.
pub trait RootFinder {
    /// Finds a root of `f` starting from `initial_guess`.
    ///
    /// # Arguments
    ///
    /// * `f` - The function for which to find a root
    /// * `df` - The derivative of `f`
    /// * `initial_guess` - Starting point for the search
    fn find_root<F, DF>(&self, f: F, df: DF, initial_guess: f64) -> MathResult<SolverResult>
    where
        F: Fn(f64) -> f64,
        DF: Fn(f64) -> f64;

    /// Returns the name of the solver.
    fn name(&self) -> &'static str;
}

/// Newton-Raphson solver carrying its own configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NewtonSolver {
    config: SolverConfig,
}

impl NewtonSolver {
    /// Creates a solver with the given configuration.
    #[must_use]
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Returns the solver configuration.
    #[must_use]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }
}

impl RootFinder for NewtonSolver {
    fn find_root<F, DF>(&self, f: F, df: DF, initial_guess: f64) -> MathResult<SolverResult>
    where
        F: Fn(f64) -> f64,
        DF: Fn(f64) -> f64,
    {
        newton_raphson(f, df, initial_guess, &self.config)
    }

    fn name(&self) -> &'static str {
        "Newton-Raphson"
    }
}
