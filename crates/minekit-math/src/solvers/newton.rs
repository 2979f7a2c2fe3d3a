//! Newton-Raphson root-finding algorithm.

use log::{debug, trace};

use crate::error::{MathError, MathResult, NonConvergenceCause};
use crate::solvers::{SolverConfig, SolverResult, DIVERGENCE_LIMIT};

/// Newton-Raphson root-finding algorithm.
///
/// Uses the iteration:
/// `x_{n+1} = x_n - f(x_n) / f'(x_n)`
///
/// and stops once `|x_{n+1} - x_n| <= config.tolerance`. An exact root
/// (`f(x_n) == 0`) is accepted immediately, even where the derivative
/// vanishes.
///
/// No domain checking is performed on `f` and `df`; they must be defined
/// at every iterate.
///
/// # Arguments
///
/// * `f` - The function for which to find a root
/// * `df` - The derivative of the function
/// * `initial_guess` - Starting point for the iteration
/// * `config` - Solver configuration
///
/// # Errors
///
/// * [`MathError::InvalidInput`] if the configuration is invalid.
/// * [`MathError::NonConvergent`] if the derivative is zero at an iterate,
///   a non-finite value appears, an iterate exceeds [`DIVERGENCE_LIMIT`] in
///   magnitude, or `max_iterations` updates do not meet the tolerance. The
///   error carries the last estimate.
///
/// # Example
///
/// ```rust
/// use minekit_math::solvers::{newton_raphson, SolverConfig};
///
/// // Find root of x^2 - 2 (i.e., sqrt(2))
/// let f = |x: f64| x * x - 2.0;
/// let df = |x: f64| 2.0 * x;
///
/// let result = newton_raphson(f, df, 1.0, &SolverConfig::new(1e-6, 100)).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-6);
/// ```
pub fn newton_raphson<F, DF>(
    f: F,
    df: DF,
    initial_guess: f64,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
    DF: Fn(f64) -> f64,
{
    config.validate()?;

    if !initial_guess.is_finite() {
        return Err(MathError::invalid_input(format!(
            "initial guess must be finite, got {initial_guess}"
        )));
    }

    let mut x = initial_guess;

    for iteration in 0..config.max_iterations {
        let fx = f(x);

        if fx == 0.0 {
            return Ok(SolverResult {
                root: x,
                iterations: iteration,
                residual: fx,
            });
        }

        let dfx = df(x);

        if !fx.is_finite() || !dfx.is_finite() {
            debug!("newton: non-finite evaluation at x = {x} (f = {fx}, f' = {dfx})");
            return Err(MathError::non_convergent(
                NonConvergenceCause::NonFinite,
                iteration,
                x,
            ));
        }

        if dfx == 0.0 {
            debug!("newton: zero derivative at x = {x}");
            return Err(MathError::non_convergent(
                NonConvergenceCause::ZeroDerivative,
                iteration,
                x,
            ));
        }

        let next = x - fx / dfx;
        if !next.is_finite() {
            return Err(MathError::non_convergent(
                NonConvergenceCause::NonFinite,
                iteration + 1,
                x,
            ));
        }
        if next.abs() > DIVERGENCE_LIMIT {
            debug!("newton: iterate {next:e} exceeds the divergence limit");
            return Err(MathError::non_convergent(
                NonConvergenceCause::Diverged,
                iteration + 1,
                next,
            ));
        }

        let step = (next - x).abs();
        x = next;
        trace!("newton: iteration {} x = {x} step = {step:.3e}", iteration + 1);

        if step <= config.tolerance {
            return Ok(SolverResult {
                root: x,
                iterations: iteration + 1,
                residual: f(x),
            });
        }
    }

    debug!(
        "newton: no convergence within {} iterations, last estimate {x}",
        config.max_iterations
    );
    Err(MathError::non_convergent(
        NonConvergenceCause::IterationLimit,
        config.max_iterations,
        x,
    ))
}
