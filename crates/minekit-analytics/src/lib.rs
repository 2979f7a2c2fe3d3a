//! # Minekit Analytics
//!
//! Engineering analytics built on [`minekit_math`].
//!
//! ## Modules
//!
//! - [`cashflows`]: Project NPV and IRR from per-period costs and revenues
//! - [`pillar`]: Rock size-effect fitting and square-pillar width design
//! - [`error_study`]: Percent-error studies of the quadrature rules
//!
//! ## Example
//!
//! ```rust
//! use minekit_analytics::cashflows::{CashFlowProject, CashFlowRow};
//!
//! let project = CashFlowProject::from_rows(
//!     vec![
//!         CashFlowRow::new(0.0).with_capital_cost(1000.0),
//!         CashFlowRow::new(1.0).with_revenue(600.0),
//!         CashFlowRow::new(2.0).with_revenue(600.0),
//!     ],
//!     0.0,
//!     8.0,
//! )
//! .unwrap();
//!
//! let irr = project.irr().unwrap();
//! assert!(irr.is_converged());
//! assert!((irr.rate - 13.07).abs() < 0.05);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::float_cmp)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

pub mod cashflows;
pub mod error;
pub mod error_study;
pub mod pillar;

pub use error::{AnalyticsError, AnalyticsResult};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::cashflows::{
        irr, irr_with, npv_at, CashFlowLine, CashFlowProject, CashFlowRow, IrrConfig, IrrResult,
        IrrStatus,
    };
    pub use crate::error::{AnalyticsError, AnalyticsResult};
    pub use crate::error_study::{percent_error, BenchmarkFunction, ConvergenceStudy, ErrorPoint};
    pub use crate::pillar::{
        design_table, fit_strength, reference_strength, solve_width, DesignTable, PillarCubic,
        PillarDesign, PillarDesignParams,
    };
}
