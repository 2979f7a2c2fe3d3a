//! Net present value and its rate sensitivity.

use crate::cashflows::CashFlowProject;

/// Net present value of `project` at `discount_rate` (percent).
///
/// ```text
/// NPV(r) = Sum_i cf_i / (1 + r/100)^year_i
/// ```
///
/// The project's own discount rate is ignored; use
/// [`CashFlowProject::npv`] for that.
#[must_use]
pub fn npv_at(project: &CashFlowProject, discount_rate: f64) -> f64 {
    let base = 1.0 + discount_rate / 100.0;
    project
        .net_cash_flows()
        .map(|(year, cf)| cf / base.powf(year))
        .sum()
}

/// Derivative of [`npv_at`] with respect to the rate in percent.
///
/// ```text
/// dNPV/dr = Sum_i (-year_i) * cf_i / (100 * (1 + r/100)^(year_i + 1))
/// ```
#[must_use]
pub fn npv_derivative_at(project: &CashFlowProject, discount_rate: f64) -> f64 {
    let base = 1.0 + discount_rate / 100.0;
    project
        .net_cash_flows()
        .map(|(year, cf)| -year * cf / base.powf(year + 1.0))
        .sum::<f64>()
        / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cashflows::CashFlowRow;
    use approx::assert_relative_eq;

    fn project(rows: Vec<CashFlowRow>, tax: f64, rate: f64) -> CashFlowProject {
        CashFlowProject::from_rows(rows, tax, rate).unwrap()
    }

    #[test]
    fn test_single_period() {
        let p = project(vec![CashFlowRow::new(1.0).with_revenue(550.0)], 0.0, 10.0);

        assert_relative_eq!(p.npv(), 550.0 / 1.10, epsilon = 1e-10);
        assert_relative_eq!(npv_at(&p, 25.0), 550.0 / 1.25, epsilon = 1e-10);
    }

    #[test]
    fn test_tax_applies_to_operating_margin_only() {
        let p = project(
            vec![
                CashFlowRow::new(0.0).with_capital_cost(500.0),
                CashFlowRow::new(1.0)
                    .with_revenue(1000.0)
                    .with_operating_cost(400.0),
            ],
            35.0,
            8.0,
        );

        let expected = -500.0 + 600.0 * 0.65 / 1.08;
        assert_relative_eq!(p.npv(), expected, epsilon = 1e-10);
    }

    #[test]
    fn test_zero_rate_is_plain_sum() {
        let p = project(
            vec![
                CashFlowRow::new(0.0).with_capital_cost(100.0),
                CashFlowRow::new(1.0).with_revenue(40.0),
                CashFlowRow::new(2.0).with_revenue(70.0),
            ],
            0.0,
            0.0,
        );

        assert_relative_eq!(p.npv(), 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_derivative_matches_finite_difference() {
        let p = project(
            vec![
                CashFlowRow::new(0.0).with_capital_cost(1000.0),
                CashFlowRow::new(1.0).with_revenue(300.0),
                CashFlowRow::new(2.0).with_revenue(450.0),
                CashFlowRow::new(3.5).with_revenue(600.0),
            ],
            20.0,
            10.0,
        );

        let h = 1e-5;
        for rate in [2.0, 7.5, 15.0] {
            let numeric = (npv_at(&p, rate + h) - npv_at(&p, rate - h)) / (2.0 * h);
            assert_relative_eq!(npv_derivative_at(&p, rate), numeric, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_repeatable() {
        let p = project(
            vec![
                CashFlowRow::new(0.0).with_capital_cost(250.0),
                CashFlowRow::new(1.0).with_revenue(130.0),
                CashFlowRow::new(2.0).with_revenue(160.0),
            ],
            10.0,
            9.0,
        );

        assert_eq!(p.npv().to_bits(), p.npv().to_bits());
    }
}
