//! Unified error types for the analytics layer.

use minekit_math::MathError;
use thiserror::Error;

/// Unified error type for all analytics operations.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Invalid input parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Column lengths of a tabular input disagree
    #[error("Length mismatch: {field} has {actual} entries, expected {expected}")]
    LengthMismatch {
        /// Name of the offending column.
        field: &'static str,
        /// Length of the reference column.
        expected: usize,
        /// Length found.
        actual: usize,
    },

    /// A point of a pillar design table could not be solved
    #[error("Pillar design failed at depth {depth} m, gallery width {gallery_width} m: {source}")]
    DesignPointFailed {
        /// Depth below surface (m).
        depth: f64,
        /// Gallery width (m).
        gallery_width: f64,
        /// Underlying solver error.
        #[source]
        source: MathError,
    },

    /// Math/solver error
    #[error("Math error: {0}")]
    Math(#[from] MathError),
}

/// Result type alias for analytics operations.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

impl AnalyticsError {
    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput(reason.into())
    }
}

/// Rejects NaN and infinities in a named scalar input.
pub(crate) fn ensure_finite(name: &str, value: f64) -> AnalyticsResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AnalyticsError::invalid_input(format!(
            "{name} must be finite, got {value}"
        )))
    }
}

/// Rejects non-positive (or non-finite) values in a named scalar input.
pub(crate) fn ensure_positive(name: &str, value: f64) -> AnalyticsResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(AnalyticsError::invalid_input(format!(
            "{name} must be positive, got {value}"
        )))
    }
}
