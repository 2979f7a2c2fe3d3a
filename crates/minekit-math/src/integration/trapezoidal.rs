//! Composite trapezoidal rule.

use crate::error::MathResult;
use crate::integration::{check_bounds, QuadratureRule};

/// Composite trapezoidal rule.
///
/// ```text
/// T = h/2 * [f(a) + f(b) + 2 * Sum_{i=1}^{n-1} f(a + i*h)],  h = (b - a) / n
/// ```
///
/// # Arguments
///
/// * `f` - The integrand
/// * `a` - Lower bound
/// * `b` - Upper bound
/// * `n` - Number of subintervals (at least 1)
///
/// # Example
///
/// ```rust
/// use minekit_math::integration::trapezoidal;
///
/// // Exact for straight lines
/// let area = trapezoidal(|x| 2.0 * x + 1.0, 0.0, 3.0, 1).unwrap();
/// assert!((area - 12.0).abs() < 1e-12);
/// ```
pub fn trapezoidal<F>(f: F, a: f64, b: f64, n: u32) -> MathResult<f64>
where
    F: Fn(f64) -> f64,
{
    if check_bounds(QuadratureRule::Trapezoidal, a, b, n)? {
        return Ok(0.0);
    }

    let h = (b - a) / f64::from(n);

    let interior: f64 = (1..n).map(|i| f(a + f64::from(i) * h)).sum();

    Ok(h / 2.0 * (f(a) + f(b) + 2.0 * interior))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MathError;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_exact() {
        let area = trapezoidal(|x| 3.0 * x - 1.0, -1.0, 2.0, 5).unwrap();
        // [1.5x^2 - x] from -1 to 2 = (6 - 2) - (1.5 + 1) = 1.5
        assert_relative_eq!(area, 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_square_converges_monotonically() {
        let exact = 1.0 / 3.0;
        let mut previous_error = f64::INFINITY;

        for n in [1, 2, 4, 8, 16, 32, 64, 128, 256] {
            let area = trapezoidal(|x| x * x, 0.0, 1.0, n).unwrap();
            let error = area - exact;

            // Convex integrand: trapezoids overestimate
            assert!(error > 0.0);
            assert!(error < previous_error);
            previous_error = error;
        }

        assert!(previous_error < 1e-5);
    }

    #[test]
    fn test_known_error_term() {
        // For x^2 on [0, 1] the error is exactly h^2 / 6
        let n = 10;
        let h = 1.0 / f64::from(n);
        let area = trapezoidal(|x| x * x, 0.0, 1.0, n).unwrap();
        assert_relative_eq!(area - 1.0 / 3.0, h * h / 6.0, max_relative = 1e-9);
    }

    #[test]
    fn test_empty_interval() {
        let area = trapezoidal(|x| x.exp(), 2.5, 2.5, 10).unwrap();
        assert_eq!(area, 0.0);
    }

    #[test]
    fn test_reversed_interval() {
        let forward = trapezoidal(|x| x * x, 0.0, 1.0, 20).unwrap();
        let backward = trapezoidal(|x| x * x, 1.0, 0.0, 20).unwrap();
        assert_relative_eq!(forward, -backward, epsilon = 1e-14);
    }

    #[test]
    fn test_zero_intervals() {
        let result = trapezoidal(|x| x, 0.0, 1.0, 0);
        assert!(matches!(result, Err(MathError::InvalidInput { .. })));
    }
}
