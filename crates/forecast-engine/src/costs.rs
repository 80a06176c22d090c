//! Cost engine: per-product variable costs split into deposit and
//! final-payment cash events, plus fixed-cost monthly timelines under the
//! four allocation schedules.

use crate::EngineError;
use forecast_core::{
    CostReport, CostSummary, CostType, EngineInput, FixedCostTotal, MonthlyRecord,
    PaymentSchedule, ProductCost,
};
use rust_decimal::prelude::ToPrimitive;

/// Column names for the two variable-cost cash events.
pub(crate) const DEPOSITS_COLUMN: &str = "Deposits";
pub(crate) const FINAL_PAYMENTS_COLUMN: &str = "Final Payments";

/// Cost report plus the timeline-aligned vectors the profit and cash-flow
/// engines consume directly, so they never have to re-split the open record
/// by column name.
pub(crate) struct CostComputation {
    pub report: CostReport,
    /// Fixed-cost cash per timeline slot (excludes deposits/final payments).
    pub fixed_by_month: Vec<f64>,
    /// All cost cash per timeline slot: fixed + deposits + final payments.
    pub cash_out_by_month: Vec<f64>,
}

pub(crate) fn compute_costs(
    input: &EngineInput,
    aggregate_weights: &[f64],
) -> Result<CostComputation, EngineError> {
    let params = &input.parameters;
    let months = params.forecast_months;
    let first = params.first_timeline_month();
    let slots = params.timeline_months().len();
    // Sales month s occupies timeline slot s - first.
    let slot_of = |sales_month: u32| (sales_month - first) as usize;

    let columns: Vec<&str> = input
        .fixed_costs
        .iter()
        .map(|c| c.name.as_str())
        .chain([DEPOSITS_COLUMN, FINAL_PAYMENTS_COLUMN])
        .collect();
    let mut monthly: Vec<MonthlyRecord> = params
        .timeline_months()
        .into_iter()
        .map(|m| MonthlyRecord::zeroed(m, columns.iter().copied()))
        .collect();
    let mut fixed_by_month = vec![0.0; slots];

    // Variable costs: deposits are due at the first timeline month (month 0
    // when pre-ordering), the balance on delivery at month 1 regardless of
    // the pre-order flag.
    let mut variable_costs = Vec::with_capacity(input.products.len());
    let mut total_variable = 0.0;
    let mut total_deposits_paid = 0.0;
    let mut total_final_payments = 0.0;
    let mut total_planned_units = 0.0;
    for product in &input.products {
        let planned = product.planned_units.unwrap_or(0) as f64;
        let unit_cost = product
            .unit_cost
            .to_f64()
            .ok_or_else(|| EngineError::Internal("unit cost out of f64 range".into()))?;
        let total_production_cost = planned * unit_cost;
        let deposit_paid = total_production_cost * product.deposit_pct / 100.0;
        let remaining_cost = total_production_cost - deposit_paid;

        monthly[0].add(DEPOSITS_COLUMN, deposit_paid);
        monthly[slot_of(1)].add(FINAL_PAYMENTS_COLUMN, remaining_cost);

        total_variable += total_production_cost;
        total_deposits_paid += deposit_paid;
        total_final_payments += remaining_cost;
        total_planned_units += planned;
        variable_costs.push(ProductCost {
            name: product.name.clone(),
            total_production_cost,
            deposit_paid,
            remaining_cost,
        });
    }

    // Fixed costs: cost-type scales the magnitude, schedule decides timing.
    let mut fixed_costs = Vec::with_capacity(input.fixed_costs.len());
    let mut total_fixed = 0.0;
    for item in &input.fixed_costs {
        let amount = item
            .amount
            .to_f64()
            .ok_or_else(|| EngineError::Internal("fixed cost amount out of f64 range".into()))?;
        let period_total = match item.cost_type {
            CostType::TotalForPeriod => amount,
            CostType::MonthlyCost => amount * months as f64,
        };

        let mut post = |sales_month: u32, amount: f64| {
            let slot = slot_of(sales_month);
            monthly[slot].add(&item.name, amount);
            fixed_by_month[slot] += amount;
        };
        match item.schedule {
            PaymentSchedule::UpFront => {
                // First timeline month, not first sales month.
                post(first, period_total);
            }
            PaymentSchedule::Monthly => {
                let per_month = period_total / months as f64;
                for s in 1..=months {
                    post(s, per_month);
                }
            }
            PaymentSchedule::Quarterly => {
                // A partial final quarter still carries a full quarterly
                // amount; see the cost-engine tests pinning this behavior.
                let quarters = months.div_ceil(3);
                let per_quarter = period_total / quarters as f64;
                for q in 0..quarters {
                    post(1 + q * 3, per_quarter);
                }
            }
            PaymentSchedule::AccordingToSales => {
                for s in 1..=months {
                    post(s, period_total * aggregate_weights[(s - 1) as usize]);
                }
            }
        }

        total_fixed += period_total;
        fixed_costs.push(FixedCostTotal {
            name: item.name.clone(),
            total: period_total,
        });
    }

    let cash_out_by_month: Vec<f64> = monthly.iter().map(MonthlyRecord::total).collect();
    let avg_cost_per_unit = if total_planned_units > 0.0 {
        total_variable / total_planned_units
    } else {
        0.0
    };

    Ok(CostComputation {
        report: CostReport {
            summary: CostSummary {
                total_fixed,
                total_variable,
                total_operating: total_fixed + total_variable,
                total_deposits_paid,
                total_final_payments,
                total_planned_units,
                avg_cost_per_unit,
                fixed_costs,
                variable_costs,
            },
            monthly,
        },
        fixed_by_month,
        cash_out_by_month,
    })
}
