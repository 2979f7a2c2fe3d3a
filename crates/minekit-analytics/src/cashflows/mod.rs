//! Project cash-flow analysis.
//!
//! A [`CashFlowProject`] is a table of periods, each carrying an operating
//! cost, a capital cost and a revenue, plus a tax rate and a discount rate
//! (both in percent). The after-tax net cash flow of a period is
//!
//! ```text
//! cf = (revenue - operating_cost) * (1 - tax_rate / 100) - capital_cost
//! ```
//!
//! Entries may be missing (`None`): a missing entry counts as zero cash flow
//! for that column, and the period itself is still included.
//!
//! - [`npv_at`]: discounted sum of the net cash flows
//! - [`irr()`]: the discount rate at which the NPV vanishes
//!
//! # Example
//!
//! ```rust
//! use minekit_analytics::cashflows::{CashFlowProject, CashFlowRow};
//!
//! let project = CashFlowProject::from_rows(
//!     vec![
//!         CashFlowRow::new(0.0).with_capital_cost(1000.0),
//!         CashFlowRow::new(1.0).with_revenue(1210.0),
//!     ],
//!     0.0,
//!     10.0,
//! )
//! .unwrap();
//!
//! assert!(project.npv().abs() < 1e-9);
//! ```

pub mod irr;
mod npv;

pub use irr::{irr, irr_with, IrrConfig, IrrResult, IrrStatus};
pub use npv::{npv_at, npv_derivative_at};

use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, AnalyticsError, AnalyticsResult};

/// One period of a project.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CashFlowRow {
    /// Period index (years from the valuation date).
    pub year: f64,
    /// Operating cost; `None` if not defined.
    pub operating_cost: Option<f64>,
    /// Capital cost; `None` if not defined.
    pub capital_cost: Option<f64>,
    /// Revenue; `None` if not defined.
    pub revenue: Option<f64>,
}

impl CashFlowRow {
    /// Creates a row with every entry undefined.
    #[must_use]
    pub fn new(year: f64) -> Self {
        Self {
            year,
            operating_cost: None,
            capital_cost: None,
            revenue: None,
        }
    }

    /// Sets the operating cost.
    #[must_use]
    pub fn with_operating_cost(mut self, value: f64) -> Self {
        self.operating_cost = Some(value);
        self
    }

    /// Sets the capital cost.
    #[must_use]
    pub fn with_capital_cost(mut self, value: f64) -> Self {
        self.capital_cost = Some(value);
        self
    }

    /// Sets the revenue.
    #[must_use]
    pub fn with_revenue(mut self, value: f64) -> Self {
        self.revenue = Some(value);
        self
    }

    /// After-tax net cash flow, with undefined entries taken as zero.
    #[must_use]
    pub fn net_cash_flow(&self, tax_rate: f64) -> f64 {
        let revenue = self.revenue.unwrap_or(0.0);
        let operating = self.operating_cost.unwrap_or(0.0);
        let capital = self.capital_cost.unwrap_or(0.0);
        (revenue - operating) * (1.0 - tax_rate / 100.0) - capital
    }

    fn validate(&self, index: usize) -> AnalyticsResult<()> {
        ensure_finite(&format!("year of row {index}"), self.year)?;
        for (name, value) in [
            ("operating cost", self.operating_cost),
            ("capital cost", self.capital_cost),
            ("revenue", self.revenue),
        ] {
            if let Some(v) = value {
                ensure_finite(&format!("{name} of row {index}"), v)?;
            }
        }
        Ok(())
    }
}

/// A project's per-period cash flows with its tax and discount rates.
///
/// Read-only once constructed; NPV and IRR are computed on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowProject {
    rows: Vec<CashFlowRow>,
    tax_rate: f64,
    discount_rate: f64,
}

impl CashFlowProject {
    /// Builds a project from four parallel columns.
    ///
    /// # Arguments
    ///
    /// * `years` - Period index of each row
    /// * `operating_costs` - Operating cost per period
    /// * `capital_costs` - Capital cost per period
    /// * `revenues` - Revenue per period
    /// * `tax_rate` - Tax rate in percent
    /// * `discount_rate` - Discount rate in percent
    ///
    /// # Errors
    ///
    /// [`AnalyticsError::LengthMismatch`] if the columns differ in length,
    /// plus everything [`CashFlowProject::from_rows`] rejects.
    pub fn new(
        years: &[f64],
        operating_costs: &[Option<f64>],
        capital_costs: &[Option<f64>],
        revenues: &[Option<f64>],
        tax_rate: f64,
        discount_rate: f64,
    ) -> AnalyticsResult<Self> {
        for (field, column) in [
            ("operating_cost", operating_costs.len()),
            ("capital_cost", capital_costs.len()),
            ("revenue", revenues.len()),
        ] {
            if column != years.len() {
                return Err(AnalyticsError::LengthMismatch {
                    field,
                    expected: years.len(),
                    actual: column,
                });
            }
        }

        let rows = years
            .iter()
            .zip(operating_costs)
            .zip(capital_costs)
            .zip(revenues)
            .map(|(((&year, &operating_cost), &capital_cost), &revenue)| CashFlowRow {
                year,
                operating_cost,
                capital_cost,
                revenue,
            })
            .collect();

        Self::from_rows(rows, tax_rate, discount_rate)
    }

    /// Builds a project from rows.
    ///
    /// # Errors
    ///
    /// [`AnalyticsError::InvalidInput`] if there are no rows, a value is not
    /// finite, or the discount rate is not above -100%.
    pub fn from_rows(
        rows: Vec<CashFlowRow>,
        tax_rate: f64,
        discount_rate: f64,
    ) -> AnalyticsResult<Self> {
        if rows.is_empty() {
            return Err(AnalyticsError::invalid_input(
                "a project needs at least one period",
            ));
        }
        for (index, row) in rows.iter().enumerate() {
            row.validate(index)?;
        }
        ensure_finite("tax rate", tax_rate)?;
        validate_discount_rate(discount_rate)?;

        Ok(Self {
            rows,
            tax_rate,
            discount_rate,
        })
    }

    /// Returns a copy of the project valued at another discount rate.
    pub fn with_discount_rate(&self, discount_rate: f64) -> AnalyticsResult<Self> {
        validate_discount_rate(discount_rate)?;
        Ok(Self {
            discount_rate,
            ..self.clone()
        })
    }

    /// The periods of the project.
    #[must_use]
    pub fn rows(&self) -> &[CashFlowRow] {
        &self.rows
    }

    /// Number of periods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always false; a project has at least one period.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Tax rate in percent.
    #[must_use]
    pub fn tax_rate(&self) -> f64 {
        self.tax_rate
    }

    /// Discount rate in percent.
    #[must_use]
    pub fn discount_rate(&self) -> f64 {
        self.discount_rate
    }

    /// `(year, net cash flow)` for every period.
    pub fn net_cash_flows(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.rows
            .iter()
            .map(move |row| (row.year, row.net_cash_flow(self.tax_rate)))
    }

    /// Net present value at the project's own discount rate.
    #[must_use]
    pub fn npv(&self) -> f64 {
        npv_at(self, self.discount_rate)
    }

    /// Internal rate of return with the default solver settings.
    pub fn irr(&self) -> AnalyticsResult<IrrResult> {
        irr(self)
    }

    /// Per-period breakdown of the NPV at `discount_rate` (percent).
    #[must_use]
    pub fn schedule(&self, discount_rate: f64) -> Vec<CashFlowLine> {
        let base = 1.0 + discount_rate / 100.0;
        self.net_cash_flows()
            .map(|(year, net_cash_flow)| {
                let discount_factor = base.powf(-year);
                CashFlowLine {
                    year,
                    net_cash_flow,
                    discount_factor,
                    present_value: net_cash_flow * discount_factor,
                }
            })
            .collect()
    }
}

fn validate_discount_rate(discount_rate: f64) -> AnalyticsResult<f64> {
    ensure_finite("discount rate", discount_rate)?;
    if discount_rate <= -100.0 {
        return Err(AnalyticsError::invalid_input(format!(
            "discount rate must be above -100%, got {discount_rate}%"
        )));
    }
    Ok(discount_rate)
}

/// One line of a discounted cash-flow schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CashFlowLine {
    /// Period index.
    pub year: f64,
    /// After-tax net cash flow.
    pub net_cash_flow: f64,
    /// `(1 + r/100)^(-year)`.
    pub discount_factor: f64,
    /// Discounted cash flow.
    pub present_value: f64,
}
