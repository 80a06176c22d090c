//! Cash flow & health engine.
//!
//! Reconciles accrual profit with cash timing: inventory cash leaves on the
//! deposit/final-payment schedule while COGS follows sales, so the bridge
//! between operating profit and ending cash is the production cost of goods
//! not yet sold, plus taxes actually paid.

use crate::costs::CostComputation;
use forecast_core::{
    CashFlowReport, CashFlowSummary, CostSummary, HealthScore, MonthlyCashFlow, Parameters,
    ProfitReport, ProfitSummary, RevenueReport, RevenueSummary, Runway,
};

/// Benchmark net margin treated as full profitability health.
const NET_MARGIN_BENCHMARK_PCT: f64 = 15.0;
/// Benchmark gross margin treated as full efficiency health.
const GROSS_MARGIN_BENCHMARK_PCT: f64 = 50.0;

pub(crate) fn compute_cash_flow(
    params: &Parameters,
    revenue: &RevenueReport,
    costs: &CostComputation,
    profit: &ProfitReport,
) -> CashFlowReport {
    let mut monthly = Vec::with_capacity(revenue.monthly.len());
    let mut cumulative = 0.0;
    let mut lowest = 0.0_f64;
    for (i, rev_rec) in revenue.monthly.iter().enumerate() {
        let cash_in = rev_rec.total();
        // Taxes are paid in the month they accrue.
        let taxes = profit.monthly[i].operating_profit - profit.monthly[i].net_profit;
        let cash_out = costs.cash_out_by_month[i] + taxes;
        let net_cash = cash_in - cash_out;
        cumulative += net_cash;
        lowest = lowest.min(cumulative);
        monthly.push(MonthlyCashFlow {
            month: rev_rec.month,
            cash_in,
            cash_out,
            net_cash,
            cumulative_cash: cumulative,
        });
    }

    let cost_summary = &costs.report.summary;
    let ending_cash_balance = monthly.last().map(|m| m.cumulative_cash).unwrap_or(0.0);
    let peak_funding_need = -lowest;
    let unsold_units = cost_summary.total_planned_units - revenue.summary.total_sold_units;
    let cogs_of_unsold_goods = cost_summary.avg_cost_per_unit * unsold_units;
    let taxes_paid =
        profit.summary.total_operating_profit - profit.summary.total_net_profit;
    let runway = runway(params, cost_summary, ending_cash_balance, &monthly);

    CashFlowReport {
        summary: CashFlowSummary {
            ending_cash_balance,
            peak_funding_need,
            cogs_of_unsold_goods,
            taxes_paid,
            runway,
        },
        monthly,
    }
}

/// Months of operation left at the average fixed-cost burn rate. Infinite
/// when there is no fixed burn, or when cash ends non-negative and the final
/// month's net cash is not declining.
fn runway(
    params: &Parameters,
    costs: &CostSummary,
    ending_cash: f64,
    monthly: &[MonthlyCashFlow],
) -> Runway {
    let burn = costs.total_fixed / params.forecast_months as f64;
    if burn <= 0.0 {
        return Runway::Infinite;
    }
    if ending_cash < 0.0 {
        return Runway::Months(0.0);
    }
    let last_net = monthly.last().map(|m| m.net_cash).unwrap_or(0.0);
    if last_net >= 0.0 {
        return Runway::Infinite;
    }
    Runway::Months(ending_cash / burn)
}

/// Composite 0-100 business health score. Derived from the three summary
/// views only, so it can be recomputed from a persisted forecast without
/// re-running the engine.
pub fn health_score(
    costs: &CostSummary,
    revenue: &RevenueSummary,
    profit: &ProfitSummary,
) -> HealthScore {
    let profitability = score(profit.net_margin_pct / NET_MARGIN_BENCHMARK_PCT * 100.0);
    let liquidity = match profit.break_even_month {
        None => 0.0,
        Some(m) => {
            let elapsed = m.max(1) - 1;
            score(100.0 * (1.0 - elapsed as f64 / profit.forecast_months as f64))
        }
    };
    let efficiency = score(profit.gross_margin_pct / GROSS_MARGIN_BENCHMARK_PCT * 100.0);
    let demand = if costs.total_planned_units > 0.0 {
        score(revenue.total_sold_units / costs.total_planned_units * 100.0)
    } else {
        0.0
    };
    let overall = (profitability + liquidity + efficiency + demand) / 4.0;
    HealthScore {
        overall,
        profitability,
        liquidity,
        efficiency,
        demand,
    }
}

fn score(raw: f64) -> f64 {
    if raw.is_nan() {
        return 0.0;
    }
    raw.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::costs::compute_costs;
    use crate::curves::aggregate_sales_weights;
    use crate::profit::compute_profit;
    use crate::revenue::compute_revenue;
    use forecast_core::{
        CostType, Currency, EngineInput, FixedCostItem, PaymentSchedule, Product, ProductId,
        RealtimeSettings, SalesModel,
    };
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    const TOL: f64 = 1e-6;

    struct Scenario {
        revenue: RevenueReport,
        costs: CostComputation,
        profit: ProfitReport,
        cash: CashFlowReport,
    }

    fn run(input: &EngineInput) -> Scenario {
        let agg = aggregate_sales_weights(&input.products, input.parameters.forecast_months);
        let revenue = compute_revenue(input).unwrap();
        let costs = compute_costs(input, &agg).unwrap();
        let profit = compute_profit(&input.parameters, &revenue, &costs);
        let cash = compute_cash_flow(&input.parameters, &revenue, &costs, &profit);
        Scenario {
            revenue,
            costs,
            profit,
            cash,
        }
    }

    fn base_input() -> EngineInput {
        EngineInput {
            products: vec![Product {
                id: ProductId("p-1".to_string()),
                name: "Widget".to_string(),
                planned_units: Some(1000),
                unit_cost: Decimal::new(10, 0),
                sell_price: Decimal::new(25, 0),
                sales_model: Some(SalesModel::Even),
                sell_through_pct: Some(100.0),
                deposit_pct: 0.0,
            }],
            fixed_costs: vec![],
            parameters: Parameters {
                forecast_months: 4,
                tax_rate_pct: 0.0,
                currency: Currency::EUR,
                pre_order_mode: false,
            },
            realtime: RealtimeSettings::default(),
        }
    }

    #[test]
    fn cash_bridge_identity_holds() {
        let mut input = base_input();
        input.products[0].sell_through_pct = Some(80.0); // 200 unsold units
        input.products[0].deposit_pct = 40.0;
        input.parameters.tax_rate_pct = 20.0;
        input.fixed_costs.push(FixedCostItem {
            id: "fc-1".to_string(),
            name: "Rent".to_string(),
            amount: Decimal::new(2000, 0),
            schedule: PaymentSchedule::Monthly,
            cost_type: CostType::TotalForPeriod,
            start_month: 1,
        });
        let s = run(&input);
        let summary = &s.cash.summary;
        assert!((summary.cogs_of_unsold_goods - 2000.0).abs() < TOL);
        let bridge = s.profit.summary.total_operating_profit
            - summary.taxes_paid
            - summary.cogs_of_unsold_goods;
        assert!((summary.ending_cash_balance - bridge).abs() < TOL);
    }

    #[test]
    fn peak_funding_need_reflects_early_outflows() {
        let mut input = base_input();
        input.parameters.pre_order_mode = true;
        input.products[0].deposit_pct = 50.0;
        let s = run(&input);
        // Month 0: deposit of 5000 out, no revenue.
        assert_eq!(s.cash.monthly[0].month, 0);
        assert!((s.cash.monthly[0].net_cash + 5000.0).abs() < TOL);
        assert!(s.cash.summary.peak_funding_need >= 5000.0);
    }

    #[test]
    fn peak_funding_need_is_zero_when_cash_stays_positive() {
        let s = run(&base_input());
        // No deposits, no fixed costs: every month is cash-positive.
        assert_eq!(s.cash.summary.peak_funding_need, 0.0);
    }

    #[test]
    fn runway_infinite_without_fixed_burn() {
        let s = run(&base_input());
        assert!(s.cash.summary.runway.is_infinite());
    }

    #[test]
    fn runway_infinite_when_cash_keeps_growing() {
        let mut input = base_input();
        input.fixed_costs.push(FixedCostItem {
            id: "fc-1".to_string(),
            name: "Rent".to_string(),
            amount: Decimal::new(1000, 0),
            schedule: PaymentSchedule::Monthly,
            cost_type: CostType::TotalForPeriod,
            start_month: 1,
        });
        let s = run(&input);
        assert!(s.cash.monthly.last().unwrap().net_cash > 0.0);
        assert!(s.cash.summary.runway.is_infinite());
    }

    #[test]
    fn runway_finite_when_burn_outlasts_sales() {
        // Launch curve: revenue ends after month 3, rent keeps burning.
        let mut input = base_input();
        input.parameters.forecast_months = 6;
        input.products[0].sales_model = Some(SalesModel::Launch);
        input.fixed_costs.push(FixedCostItem {
            id: "fc-1".to_string(),
            name: "Rent".to_string(),
            amount: Decimal::new(1000, 0),
            schedule: PaymentSchedule::Monthly,
            cost_type: CostType::MonthlyCost,
            start_month: 1,
        });
        let s = run(&input);
        let last = s.cash.monthly.last().unwrap();
        assert!(last.net_cash < 0.0);
        match s.cash.summary.runway {
            Runway::Months(m) => {
                let expected = s.cash.summary.ending_cash_balance / 1000.0;
                assert!((m - expected).abs() < TOL);
            }
            Runway::Infinite => panic!("expected finite runway"),
        }
    }

    #[test]
    fn runway_zero_when_cash_ends_negative() {
        let mut input = base_input();
        input.products[0].sell_through_pct = Some(0.0);
        input.fixed_costs.push(FixedCostItem {
            id: "fc-1".to_string(),
            name: "Rent".to_string(),
            amount: Decimal::new(1000, 0),
            schedule: PaymentSchedule::Monthly,
            cost_type: CostType::TotalForPeriod,
            start_month: 1,
        });
        let s = run(&input);
        assert!(s.cash.summary.ending_cash_balance < 0.0);
        assert_eq!(s.cash.summary.runway, Runway::Months(0.0));
    }

    #[test]
    fn health_is_recomputable_from_summaries() {
        let s = run(&base_input());
        let h1 = health_score(
            &s.costs.report.summary,
            &s.revenue.summary,
            &s.profit.summary,
        );
        let h2 = health_score(
            &s.costs.report.summary,
            &s.revenue.summary,
            &s.profit.summary,
        );
        assert_eq!(h1, h2);
        // Full sell-through, 60% operating margin, break-even month 1.
        assert_eq!(h1.demand, 100.0);
        assert_eq!(h1.liquidity, 100.0);
        assert_eq!(h1.efficiency, 100.0);
        assert_eq!(h1.profitability, 100.0);
        assert_eq!(h1.overall, 100.0);
    }

    #[test]
    fn unhealthy_plan_scores_low() {
        let mut input = base_input();
        input.products[0].sell_through_pct = Some(10.0);
        input.products[0].sell_price = Decimal::new(9, 0); // below cost
        let s = run(&input);
        let h = health_score(
            &s.costs.report.summary,
            &s.revenue.summary,
            &s.profit.summary,
        );
        assert_eq!(h.profitability, 0.0);
        assert_eq!(h.liquidity, 0.0);
        assert_eq!(h.efficiency, 0.0);
        assert!((h.demand - 10.0).abs() < TOL);
        assert!(h.overall < 5.0);
    }

    proptest! {
        #[test]
        fn health_scores_stay_in_bounds(units in 0u64..10_000,
                                        unit_cost in 0i64..100,
                                        sell_price in 0i64..200,
                                        sell_through in 0.0f64..=100.0,
                                        tax in 0.0f64..=100.0,
                                        months in 1u32..=36) {
            let mut input = base_input();
            input.products[0].planned_units = Some(units);
            input.products[0].unit_cost = Decimal::new(unit_cost, 0);
            input.products[0].sell_price = Decimal::new(sell_price, 0);
            input.products[0].sell_through_pct = Some(sell_through);
            input.parameters.tax_rate_pct = tax;
            input.parameters.forecast_months = months;
            let s = run(&input);
            let h = health_score(&s.costs.report.summary, &s.revenue.summary, &s.profit.summary);
            for v in [h.overall, h.profitability, h.liquidity, h.efficiency, h.demand] {
                prop_assert!((0.0..=100.0).contains(&v));
            }
        }

        #[test]
        fn cumulative_cash_is_a_running_sum(units in 0u64..10_000,
                                            deposit in 0.0f64..=100.0,
                                            months in 1u32..=36,
                                            pre_order in proptest::bool::ANY) {
            let mut input = base_input();
            input.products[0].planned_units = Some(units);
            input.products[0].deposit_pct = deposit;
            input.parameters.forecast_months = months;
            input.parameters.pre_order_mode = pre_order;
            let s = run(&input);
            let mut sum = 0.0;
            for m in &s.cash.monthly {
                sum += m.net_cash;
                prop_assert!((m.cumulative_cash - sum).abs() < 1e-9 * sum.abs().max(1.0));
            }
        }
    }
}
