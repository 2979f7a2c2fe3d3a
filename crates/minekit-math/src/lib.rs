//! # Minekit Math
//!
//! Numerical methods for the Minekit engineering toolkit.
//!
//! This crate provides:
//!
//! - **Regression**: Ordinary least squares for `y = m*x + c` and power laws
//! - **Solvers**: Newton-Raphson root finding with a bounded iteration budget
//! - **Integration**: Composite trapezoidal and Simpson's 1/3 quadrature
//!
//! ## Design Philosophy
//!
//! - **Pure Functions**: No shared state; every call depends only on its inputs
//! - **Explicit Failure**: Degenerate inputs return a [`MathError`] instead of
//!   NaN or infinity
//! - **Closures In, Numbers Out**: Functions are plain `Fn(f64) -> f64`

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::float_cmp)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]

pub mod error;
pub mod integration;
pub mod regression;
pub mod solvers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult, NonConvergenceCause};
    pub use crate::integration::{integrate, simpson, trapezoidal, QuadratureRule};
    pub use crate::regression::{fit, fit_power_law, LinearFit, PowerLawFit};
    pub use crate::solvers::{
        newton_raphson, NewtonSolver, RootFinder, SolverConfig, SolverResult,
    };
}

pub use error::{MathError, MathResult};
