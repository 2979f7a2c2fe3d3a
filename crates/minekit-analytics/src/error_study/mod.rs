//! Accuracy studies for the composite quadrature rules.
//!
//! A [`ConvergenceStudy`] integrates a function with a fixed rule for a
//! range of subinterval counts and records the percent error against a
//! known exact value. The two [`BenchmarkFunction`]s are the classic
//! exercise integrands with closed-form antiderivatives.

use std::f64::consts::E;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use minekit_math::integration::{integrate, QuadratureRule};

use crate::error::{ensure_finite, AnalyticsError, AnalyticsResult};

/// Relative error of `estimate` in percent of `true_value`.
///
/// # Errors
///
/// [`AnalyticsError::InvalidInput`] if `true_value` is zero or either
/// argument is not finite.
pub fn percent_error(estimate: f64, true_value: f64) -> AnalyticsResult<f64> {
    ensure_finite("estimate", estimate)?;
    ensure_finite("true value", true_value)?;
    if true_value == 0.0 {
        return Err(AnalyticsError::invalid_input(
            "percent error is undefined for a true value of zero",
        ));
    }
    Ok((estimate - true_value).abs() / true_value.abs() * 100.0)
}

/// Reference integrands with exact integrals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BenchmarkFunction {
    /// `f1(x) = 4e^{4x} + 3e^{3x} + 2e^{2x} + e^x` on `[1, 2]`.
    Exponential,
    /// `f2(x) = x^3 + 2x + 1/x` on `[e, 5]`.
    Cubic,
}

impl BenchmarkFunction {
    /// Evaluates the integrand.
    #[must_use]
    pub fn eval(self, x: f64) -> f64 {
        match self {
            Self::Exponential => {
                4.0 * (4.0 * x).exp() + 3.0 * (3.0 * x).exp() + 2.0 * (2.0 * x).exp() + x.exp()
            }
            Self::Cubic => x.powi(3) + 2.0 * x + 1.0 / x,
        }
    }

    /// Antiderivative of the integrand.
    fn antiderivative(self, x: f64) -> f64 {
        match self {
            Self::Exponential => (4.0 * x).exp() + (3.0 * x).exp() + (2.0 * x).exp() + x.exp(),
            Self::Cubic => x.powi(4) / 4.0 + x * x + x.ln(),
        }
    }

    /// Integration interval.
    #[must_use]
    pub fn bounds(self) -> (f64, f64) {
        match self {
            Self::Exponential => (1.0, 2.0),
            Self::Cubic => (E, 5.0),
        }
    }

    /// Exact value of the integral over [`BenchmarkFunction::bounds`].
    #[must_use]
    pub fn true_value(self) -> f64 {
        let (a, b) = self.bounds();
        self.antiderivative(b) - self.antiderivative(a)
    }

    /// Study of this function with `rule` over its own bounds.
    #[must_use]
    pub fn study(self, rule: QuadratureRule) -> ConvergenceStudy {
        let (a, b) = self.bounds();
        ConvergenceStudy {
            rule,
            a,
            b,
            true_value: self.true_value(),
        }
    }
}

impl fmt::Display for BenchmarkFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exponential => write!(f, "f1"),
            Self::Cubic => write!(f, "f2"),
        }
    }
}

impl FromStr for BenchmarkFunction {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "f1" | "exponential" | "exp" => Ok(Self::Exponential),
            "f2" | "cubic" => Ok(Self::Cubic),
            _ => Err(AnalyticsError::invalid_input(format!(
                "unknown benchmark function: {s}"
            ))),
        }
    }
}

/// One sample of a convergence study.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ErrorPoint {
    /// Subinterval count.
    pub n: u32,
    /// Quadrature estimate.
    pub estimate: f64,
    /// Percent error against the true value.
    pub percent_error: f64,
}

/// Percent error of a quadrature rule as the subinterval count grows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConvergenceStudy {
    rule: QuadratureRule,
    a: f64,
    b: f64,
    true_value: f64,
}

impl ConvergenceStudy {
    /// Creates a study of `rule` on `[a, b]` against `true_value`.
    ///
    /// # Errors
    ///
    /// [`AnalyticsError::InvalidInput`] if a value is not finite or the
    /// true value is zero.
    pub fn new(rule: QuadratureRule, a: f64, b: f64, true_value: f64) -> AnalyticsResult<Self> {
        ensure_finite("lower bound", a)?;
        ensure_finite("upper bound", b)?;
        ensure_finite("true value", true_value)?;
        if true_value == 0.0 {
            return Err(AnalyticsError::invalid_input(
                "a convergence study needs a non-zero true value",
            ));
        }
        Ok(Self {
            rule,
            a,
            b,
            true_value,
        })
    }

    /// The rule under study.
    #[must_use]
    pub fn rule(&self) -> QuadratureRule {
        self.rule
    }

    /// The exact value errors are measured against.
    #[must_use]
    pub fn true_value(&self) -> f64 {
        self.true_value
    }

    /// Evaluates a single subinterval count.
    pub fn point<F>(&self, f: F, n: u32) -> AnalyticsResult<ErrorPoint>
    where
        F: Fn(f64) -> f64,
    {
        let estimate = integrate(self.rule, f, self.a, self.b, n)?;
        Ok(ErrorPoint {
            n,
            estimate,
            percent_error: percent_error(estimate, self.true_value)?,
        })
    }

    /// Evaluates every admissible count in `counts`; counts the rule cannot
    /// use (odd counts for Simpson's rule, zero) are skipped.
    pub fn run<F, I>(&self, f: F, counts: I) -> AnalyticsResult<Vec<ErrorPoint>>
    where
        F: Fn(f64) -> f64,
        I: IntoIterator<Item = u32>,
    {
        counts
            .into_iter()
            .filter(|&n| self.rule.accepts(n))
            .map(|n| self.point(&f, n))
            .collect()
    }
}
