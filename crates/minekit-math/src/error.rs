//! Error types for numerical operations.

use std::fmt;

use thiserror::Error;

/// A specialized Result type for numerical operations.
pub type MathResult<T> = Result<T, MathError>;

/// Why an iterative solver stopped without meeting its tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonConvergenceCause {
    /// The derivative evaluated to exactly zero, so the update is undefined.
    ZeroDerivative,
    /// The function, derivative or update produced NaN or infinity.
    NonFinite,
    /// The iterates grew past [`DIVERGENCE_LIMIT`](crate::solvers::DIVERGENCE_LIMIT)
    /// in magnitude.
    Diverged,
    /// The iteration budget was exhausted.
    IterationLimit,
}

impl fmt::Display for NonConvergenceCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroDerivative => write!(f, "derivative evaluated to zero"),
            Self::NonFinite => write!(f, "non-finite value encountered"),
            Self::Diverged => write!(f, "iterates diverged"),
            Self::IterationLimit => write!(f, "iteration limit reached"),
        }
    }
}

/// Errors that can occur during numerical operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// Invalid input parameter.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },

    /// Insufficient data points for operation.
    #[error("Insufficient data: need at least {required}, got {actual}")]
    InsufficientData {
        /// Minimum required points.
        required: usize,
        /// Actual number of points.
        actual: usize,
    },

    /// Least-squares denominator is zero (all x-values identical).
    #[error("Degenerate fit: normal-equation denominator is {denominator:.2e}")]
    DegenerateFit {
        /// The offending denominator `n*Sum(x^2) - (Sum x)^2`.
        denominator: f64,
    },

    /// Root-finding iteration failed to converge.
    #[error("Solver did not converge after {iterations} iterations ({cause}), last estimate {estimate}")]
    NonConvergent {
        /// Why the iteration stopped.
        cause: NonConvergenceCause,
        /// Number of updates performed before stopping.
        iterations: u32,
        /// Last estimate of the root.
        estimate: f64,
    },
}

impl MathError {
    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Creates an insufficient data error.
    #[must_use]
    pub fn insufficient_data(required: usize, actual: usize) -> Self {
        Self::InsufficientData { required, actual }
    }

    /// Creates a non-convergence error.
    #[must_use]
    pub fn non_convergent(cause: NonConvergenceCause, iterations: u32, estimate: f64) -> Self {
        Self::NonConvergent {
            cause,
            iterations,
            estimate,
        }
    }

    /// Returns true for errors caused by the caller's arguments rather than
    /// by the numerics.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput { .. } | Self::InsufficientData { .. }
        )
    }
}
