//! Composite Simpson's 1/3 rule.

use crate::error::MathResult;
use crate::integration::{check_bounds, QuadratureRule};

/// Composite Simpson's 1/3 rule.
///
/// ```text
/// S = h/3 * [f(a) + f(b) + 4 * Sum_odd f(a + i*h) + 2 * Sum_even f(a + i*h)],  h = (b - a) / n
/// ```
///
/// where the even sum runs over `0 < i < n`.
///
/// # Arguments
///
/// * `f` - The integrand
/// * `a` - Lower bound
/// * `b` - Upper bound
/// * `n` - Number of subintervals (even, at least 2)
///
/// # Errors
///
/// Odd `n` is rejected with
/// [`MathError::InvalidInput`](crate::error::MathError::InvalidInput)
/// instead of silently degrading accuracy.
///
/// # Example
///
/// ```rust
/// use minekit_math::integration::simpson;
///
/// let area = simpson(|x| x * x, 0.0, 3.0, 2).unwrap();
/// assert!((area - 9.0).abs() < 1e-12);
/// ```
pub fn simpson<F>(f: F, a: f64, b: f64, n: u32) -> MathResult<f64>
where
    F: Fn(f64) -> f64,
{
    if check_bounds(QuadratureRule::Simpson, a, b, n)? {
        return Ok(0.0);
    }

    let h = (b - a) / f64::from(n);

    let mut odd = 0.0;
    let mut even = 0.0;
    for i in 1..n {
        let fx = f(a + f64::from(i) * h);
        if i % 2 == 1 {
            odd += fx;
        } else {
            even += fx;
        }
    }

    Ok(h / 3.0 * (f(a) + f(b) + 4.0 * odd + 2.0 * even))
}
