//! Profit engine: accrual profit per month and break-even detection.
//!
//! COGS is recognized against units sold in the month, valued at the average
//! variable cost per unit, so profit follows the sale rather than the
//! production cash timing. Tax applies only to months with positive
//! operating profit; losses are not carried forward to offset later months.

use crate::costs::CostComputation;
use forecast_core::{MonthlyProfit, Parameters, ProfitReport, ProfitSummary, RevenueReport};

pub(crate) fn compute_profit(
    params: &Parameters,
    revenue: &RevenueReport,
    costs: &CostComputation,
) -> ProfitReport {
    let avg_variable_cost = costs.report.summary.avg_cost_per_unit;
    let tax_rate = params.tax_rate_pct / 100.0;

    let mut monthly = Vec::with_capacity(revenue.monthly.len());
    let mut cumulative = 0.0;
    let mut break_even_month = None;
    let mut total_gross = 0.0;
    let mut total_operating = 0.0;
    let mut total_net = 0.0;

    for (i, rev_rec) in revenue.monthly.iter().enumerate() {
        let month = rev_rec.month;
        let month_revenue = rev_rec.total();
        let units_sold = revenue.monthly_units[i].total();
        let fixed_costs = costs.fixed_by_month[i];
        let cogs = units_sold * avg_variable_cost;

        let gross_profit = month_revenue - cogs;
        let operating_profit = gross_profit - fixed_costs;
        let net_profit = if operating_profit > 0.0 {
            operating_profit * (1.0 - tax_rate)
        } else {
            operating_profit
        };

        cumulative += operating_profit;
        if break_even_month.is_none() && cumulative > 0.0 {
            break_even_month = Some(month);
        }

        total_gross += gross_profit;
        total_operating += operating_profit;
        total_net += net_profit;
        monthly.push(MonthlyProfit {
            month,
            revenue: month_revenue,
            cogs,
            fixed_costs,
            gross_profit,
            operating_profit,
            net_profit,
            cumulative_operating_profit: cumulative,
        });
    }

    let total_revenue = revenue.summary.total_revenue;
    let margin = |profit: f64| {
        if total_revenue > 0.0 {
            profit / total_revenue * 100.0
        } else {
            0.0
        }
    };

    ProfitReport {
        summary: ProfitSummary {
            total_gross_profit: total_gross,
            total_operating_profit: total_operating,
            total_net_profit: total_net,
            gross_margin_pct: margin(total_gross),
            operating_margin_pct: margin(total_operating),
            net_margin_pct: margin(total_net),
            break_even_month,
            forecast_months: params.forecast_months,
        },
        monthly,
    }
}
