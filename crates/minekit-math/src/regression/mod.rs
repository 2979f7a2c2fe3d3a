//! Ordinary least-squares regression.
//!
//! [`fit`] solves the normal equations for `y = m*x + c` in closed form
//! from the four running sums `Sum x`, `Sum y`, `Sum x^2` and `Sum xy`.
//! [`fit_power_law`] reuses it on log-transformed data to recover laws of
//! the form `y = k * x^(-a)`, the usual shape of rock size-effect curves.
//!
//! # Example
//!
//! ```rust
//! use minekit_math::regression::fit;
//!
//! let fit = fit(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).unwrap();
//! assert!((fit.slope - 2.0).abs() < 1e-12);
//! assert!(fit.intercept.abs() < 1e-12);
//! ```

use serde::Serialize;

use crate::error::{MathError, MathResult};

/// Result of a straight-line least-squares fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    /// Slope `m`.
    pub slope: f64,
    /// Intercept `c`.
    pub intercept: f64,
    /// Number of samples used.
    pub n: usize,
}

impl LinearFit {
    /// Evaluates the fitted line at `x`.
    #[must_use]
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fits `y = m*x + c` by ordinary least squares.
///
/// With `D = n*Sum(x^2) - (Sum x)^2`:
///
/// ```text
/// m = (n*Sum(xy) - Sum x * Sum y) / D
/// c = (Sum y * Sum(x^2) - Sum x * Sum(xy)) / D
/// ```
///
/// # Errors
///
/// * [`MathError::InvalidInput`] if `xs` and `ys` differ in length.
/// * [`MathError::InsufficientData`] for fewer than two samples.
/// * [`MathError::DegenerateFit`] if `D` is zero (all x-values identical)
///   or not finite.
pub fn fit(xs: &[f64], ys: &[f64]) -> MathResult<LinearFit> {
    if xs.len() != ys.len() {
        return Err(MathError::invalid_input(format!(
            "xs and ys must have same length: {} vs {}",
            xs.len(),
            ys.len()
        )));
    }
    if xs.len() < 2 {
        return Err(MathError::insufficient_data(2, xs.len()));
    }

    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_x2 = 0.0;
    let mut sum_xy = 0.0;
    for (&x, &y) in xs.iter().zip(ys) {
        sum_x += x;
        sum_y += y;
        sum_x2 += x * x;
        sum_xy += x * y;
    }

    let n = xs.len() as f64;
    let denominator = n * sum_x2 - sum_x * sum_x;
    if denominator == 0.0 || !denominator.is_finite() {
        return Err(MathError::DegenerateFit { denominator });
    }

    Ok(LinearFit {
        slope: (n * sum_xy - sum_x * sum_y) / denominator,
        intercept: (sum_y * sum_x2 - sum_x * sum_xy) / denominator,
        n: xs.len(),
    })
}

/// Result of fitting `y = k * x^(-a)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PowerLawFit {
    /// Scale coefficient `k`.
    pub k: f64,
    /// Decay exponent `a`.
    pub a: f64,
    /// The underlying fit of `ln y` against `ln x`.
    pub log_fit: LinearFit,
}

impl PowerLawFit {
    /// Evaluates `k * x^(-a)`.
    #[must_use]
    pub fn evaluate(&self, x: f64) -> f64 {
        self.k * x.powf(-self.a)
    }
}

/// Fits `y = k * x^(-a)` by regressing `ln y` on `ln x`.
///
/// `k = exp(intercept)` and `a = -slope`.
///
/// # Errors
///
/// [`MathError::InvalidInput`] if any sample is not strictly positive, plus
/// every error [`fit`] can return.
pub fn fit_power_law(xs: &[f64], ys: &[f64]) -> MathResult<PowerLawFit> {
    if let Some(bad) = xs.iter().chain(ys).find(|v| !(**v > 0.0)) {
        return Err(MathError::invalid_input(format!(
            "power-law samples must be positive, got {bad}"
        )));
    }

    let ln_x: Vec<f64> = xs.iter().map(|x| x.ln()).collect();
    let ln_y: Vec<f64> = ys.iter().map(|y| y.ln()).collect();
    let log_fit = fit(&ln_x, &ln_y)?;

    Ok(PowerLawFit {
        k: log_fit.intercept.exp(),
        a: -log_fit.slope,
        log_fit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_exact_line() {
        let result = fit(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).unwrap();

        assert_relative_eq!(result.slope, 2.0, epsilon = 1e-12);
        assert_relative_eq!(result.intercept, 0.0, epsilon = 1e-12);
        assert_eq!(result.n, 3);
    }

    #[test]
    fn test_noisy_line() {
        // Textbook example: best fit through (0,1), (1,3), (2,2), (3,5)
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [1.0, 3.0, 2.0, 5.0];

        let result = fit(&xs, &ys).unwrap();

        // Sx=6, Sy=11, Sxx=14, Sxy=22, D=20
        assert_relative_eq!(result.slope, 1.1, epsilon = 1e-12);
        assert_relative_eq!(result.intercept, 1.1, epsilon = 1e-12);
        assert_relative_eq!(result.predict(10.0), 12.1, epsilon = 1e-12);
    }

    #[test]
    fn test_length_mismatch() {
        let result = fit(&[1.0, 2.0, 3.0], &[1.0, 2.0]);
        assert!(matches!(result, Err(MathError::InvalidInput { .. })));
    }

    #[test]
    fn test_single_point() {
        let result = fit(&[1.0], &[1.0]);
        assert!(matches!(
            result,
            Err(MathError::InsufficientData {
                required: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_identical_x_values() {
        let result = fit(&[2.0, 2.0, 2.0], &[1.0, 2.0, 3.0]);
        assert!(matches!(result, Err(MathError::DegenerateFit { .. })));
    }

    #[test]
    fn test_power_law_recovery() {
        let k = 40.0;
        let a = 0.3;
        let xs = [25.0, 50.0, 75.0, 100.0];
        let ys: Vec<f64> = xs.iter().map(|x: &f64| k * x.powf(-a)).collect();

        let result = fit_power_law(&xs, &ys).unwrap();

        assert_relative_eq!(result.k, k, max_relative = 1e-10);
        assert_relative_eq!(result.a, a, max_relative = 1e-10);
        assert_relative_eq!(result.evaluate(1000.0), k * 1000f64.powf(-a), max_relative = 1e-10);
    }

    #[test]
    fn test_power_law_rejects_non_positive() {
        let result = fit_power_law(&[25.0, 0.0], &[18.0, 10.0]);
        assert!(matches!(result, Err(MathError::InvalidInput { .. })));

        let result = fit_power_law(&[25.0, 50.0], &[18.0, -1.0]);
        assert!(matches!(result, Err(MathError::InvalidInput { .. })));
    }

    #[test]
    fn test_repeatable() {
        let xs = [3.2, 4.1, 5.7, 9.0];
        let ys = [1.0, 0.4, 2.2, 3.1];

        let first = fit(&xs, &ys).unwrap();
        let second = fit(&xs, &ys).unwrap();

        assert_eq!(first.slope.to_bits(), second.slope.to_bits());
        assert_eq!(first.intercept.to_bits(), second.intercept.to_bits());
    }
}
