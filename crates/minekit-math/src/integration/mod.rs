//! Composite numerical integration.
//!
//! This module approximates `Integral_a^b f(x) dx` by splitting `[a, b]`
//! into `n` equal subintervals of width `h = (b - a) / n`:
//!
//! - [`trapezoidal`]: linear interpolation on each subinterval, error `O(h^2)`
//! - [`simpson`]: Simpson's 1/3 rule on pairs of subintervals, error `O(h^4)`,
//!   exact for cubic polynomials
//!
//! [`integrate`] dispatches on a [`QuadratureRule`].
//!
//! # Example
//!
//! ```rust
//! use minekit_math::integration::{integrate, QuadratureRule};
//!
//! let area = integrate(QuadratureRule::Simpson, |x| x * x * x, 0.0, 2.0, 2).unwrap();
//! assert!((area - 4.0).abs() < 1e-12);
//! ```

mod simpson;
mod trapezoidal;

pub use simpson::simpson;
pub use trapezoidal::trapezoidal;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MathError, MathResult};

/// Composite quadrature rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuadratureRule {
    /// Composite trapezoidal rule.
    Trapezoidal,
    /// Composite Simpson's 1/3 rule (even subinterval count).
    Simpson,
}

impl QuadratureRule {
    /// Smallest admissible subinterval count.
    #[must_use]
    pub fn min_intervals(self) -> u32 {
        match self {
            Self::Trapezoidal => 1,
            Self::Simpson => 2,
        }
    }

    /// Returns true if the rule can be applied with `n` subintervals.
    #[must_use]
    pub fn accepts(self, n: u32) -> bool {
        match self {
            Self::Trapezoidal => n >= 1,
            Self::Simpson => n >= 2 && n % 2 == 0,
        }
    }

    /// Checks `n` against the rule's requirements.
    pub fn validate(self, n: u32) -> MathResult<()> {
        if n == 0 {
            return Err(MathError::invalid_input(
                "number of subintervals must be positive",
            ));
        }
        if !self.accepts(n) {
            return Err(MathError::invalid_input(format!(
                "{self} rule requires an even number of subintervals >= {}, got {n}",
                self.min_intervals()
            )));
        }
        Ok(())
    }
}

impl fmt::Display for QuadratureRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trapezoidal => write!(f, "trapezoidal"),
            Self::Simpson => write!(f, "simpson"),
        }
    }
}

impl FromStr for QuadratureRule {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trapezoidal" | "trapezoid" | "trap" => Ok(Self::Trapezoidal),
            "simpson" | "simpsons" | "simpson13" => Ok(Self::Simpson),
            _ => Err(MathError::invalid_input(format!(
                "unknown quadrature rule: {s}"
            ))),
        }
    }
}

/// Integrates `f` over `[a, b]` with `n` subintervals using `rule`.
///
/// Returns `0.0` when `a == b`. A reversed interval (`b < a`) yields the
/// negated integral.
///
/// # Errors
///
/// [`MathError::InvalidInput`] if `n == 0`, if `n` is odd for Simpson's
/// rule, or if a bound is not finite.
pub fn integrate<F>(rule: QuadratureRule, f: F, a: f64, b: f64, n: u32) -> MathResult<f64>
where
    F: Fn(f64) -> f64,
{
    match rule {
        QuadratureRule::Trapezoidal => trapezoidal(f, a, b, n),
        QuadratureRule::Simpson => simpson(f, a, b, n),
    }
}

/// Shared argument checks; returns `true` when the interval is empty.
fn check_bounds(rule: QuadratureRule, a: f64, b: f64, n: u32) -> MathResult<bool> {
    rule.validate(n)?;
    if !a.is_finite() || !b.is_finite() {
        return Err(MathError::invalid_input(format!(
            "integration bounds must be finite, got [{a}, {b}]"
        )));
    }
    Ok(a == b)
}
