//! Computed output model: monthly series plus summary statistics.
//!
//! Every monthly series is keyed by an integer `month` (0-based when
//! pre-order mode is on, else 1-based). Cost and revenue series are open
//! records: one named column per product or cost line, so consumers can
//! discover series without compile-time knowledge of plan contents. The
//! whole output is an immutable snapshot; the engine produces it fresh on
//! every run.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// One month of named series values.
///
/// Serializes flat, e.g. `{"month": 1, "Widget": 6250.0, "Rent": 100.0}`.
/// `BTreeMap` keeps column order (and therefore serialized output)
/// deterministic.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRecord {
    /// Timeline month key.
    pub month: u32,
    /// Named column -> amount for this month, zero-filled.
    #[serde(flatten)]
    pub values: BTreeMap<String, f64>,
}

impl MonthlyRecord {
    /// A record with every given column present and zeroed.
    pub fn zeroed<'a, I: IntoIterator<Item = &'a str>>(month: u32, columns: I) -> Self {
        Self {
            month,
            values: columns.into_iter().map(|c| (c.to_string(), 0.0)).collect(),
        }
    }

    /// Sum of all columns for this month.
    pub fn total(&self) -> f64 {
        self.values.values().sum()
    }

    /// Add `amount` to a column, creating it if absent.
    pub fn add(&mut self, column: &str, amount: f64) {
        *self.values.entry(column.to_string()).or_insert(0.0) += amount;
    }
}

/// Per-product revenue totals.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductRevenue {
    pub name: String,
    pub total_revenue: f64,
    pub total_sold_units: f64,
}

/// Aggregate revenue statistics across all products.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RevenueSummary {
    pub total_revenue: f64,
    pub total_sold_units: f64,
    /// `total_revenue / total_sold_units`, 0 when nothing is sold.
    pub avg_revenue_per_unit: f64,
    pub products: Vec<ProductRevenue>,
}

/// Per-product variable-cost breakdown.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductCost {
    pub name: String,
    /// `planned_units × unit_cost`.
    pub total_production_cost: f64,
    /// Share paid to the supplier up front.
    pub deposit_paid: f64,
    /// Balance due on delivery.
    pub remaining_cost: f64,
}

/// Per-line fixed-cost period total.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FixedCostTotal {
    pub name: String,
    /// Full-period amount after the cost-type multiplier.
    pub total: f64,
}

/// Aggregate cost statistics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CostSummary {
    pub total_fixed: f64,
    pub total_variable: f64,
    /// `total_fixed + total_variable`.
    pub total_operating: f64,
    pub total_deposits_paid: f64,
    pub total_final_payments: f64,
    pub total_planned_units: f64,
    /// `total_variable / total_planned_units`, 0 when nothing is planned.
    pub avg_cost_per_unit: f64,
    pub fixed_costs: Vec<FixedCostTotal>,
    pub variable_costs: Vec<ProductCost>,
}

/// One month of profit figures. COGS is recognized against units sold this
/// month (accrual), not production cash timing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonthlyProfit {
    pub month: u32,
    pub revenue: f64,
    pub cogs: f64,
    pub fixed_costs: f64,
    pub gross_profit: f64,
    pub operating_profit: f64,
    /// Tax applies only when operating profit is positive.
    pub net_profit: f64,
    pub cumulative_operating_profit: f64,
}

/// Aggregate profit statistics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProfitSummary {
    pub total_gross_profit: f64,
    pub total_operating_profit: f64,
    pub total_net_profit: f64,
    /// Margins as a percentage of total revenue, 0 when revenue is 0.
    pub gross_margin_pct: f64,
    pub operating_margin_pct: f64,
    pub net_margin_pct: f64,
    /// First month cumulative operating profit turns strictly positive;
    /// `None` (serialized `null`) if it never does.
    pub break_even_month: Option<u32>,
    /// Horizon length, carried so derived scores need no other context.
    pub forecast_months: u32,
}

/// One month of cash movement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonthlyCashFlow {
    pub month: u32,
    pub cash_in: f64,
    pub cash_out: f64,
    pub net_cash: f64,
    pub cumulative_cash: f64,
}

/// Months of operation left at the current fixed-cost burn rate.
///
/// Serializes as the string `"infinite"` or a plain number, so an infinite
/// runway stays distinguishable from any finite value in JSON.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Runway {
    Infinite,
    Months(f64),
}

impl Runway {
    pub fn is_infinite(&self) -> bool {
        matches!(self, Runway::Infinite)
    }

    /// Numeric view; `f64::INFINITY` for the infinite case.
    pub fn as_f64(&self) -> f64 {
        match self {
            Runway::Infinite => f64::INFINITY,
            Runway::Months(m) => *m,
        }
    }
}

impl Serialize for Runway {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Runway::Infinite => serializer.serialize_str("infinite"),
            Runway::Months(m) => serializer.serialize_f64(*m),
        }
    }
}

impl<'de> Deserialize<'de> for Runway {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Num(f64),
            Str(String),
        }
        match Repr::deserialize(deserializer)? {
            Repr::Num(m) => Ok(Runway::Months(m)),
            Repr::Str(s) if s == "infinite" => Ok(Runway::Infinite),
            Repr::Str(s) => Err(D::Error::custom(format!("invalid runway value: {s:?}"))),
        }
    }
}

/// Aggregate cash statistics, including the accrual-to-cash bridge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CashFlowSummary {
    /// Final cumulative cash assuming zero starting cash.
    pub ending_cash_balance: f64,
    /// Most negative cumulative cash observed, reported as a non-negative
    /// magnitude; 0 when cash never dips below zero.
    pub peak_funding_need: f64,
    /// Production cost of units produced but not sold: cash spent that
    /// operating profit has not yet expensed.
    pub cogs_of_unsold_goods: f64,
    /// `total_operating_profit − total_net_profit`.
    pub taxes_paid: f64,
    pub runway: Runway,
}

/// Composite 0-100 business health score with sub-scores. Derived purely
/// from the cost/revenue/profit summaries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HealthScore {
    pub overall: f64,
    pub profitability: f64,
    pub liquidity: f64,
    pub efficiency: f64,
    pub demand: f64,
}

/// Revenue series and summary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RevenueReport {
    pub summary: RevenueSummary,
    /// Revenue per month, one column per product.
    pub monthly: Vec<MonthlyRecord>,
    /// Units sold per month, one column per product.
    pub monthly_units: Vec<MonthlyRecord>,
}

/// Cost series and summary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CostReport {
    pub summary: CostSummary,
    /// Cash cost per month: one column per fixed-cost line plus the
    /// `Deposits` and `Final Payments` columns.
    pub monthly: Vec<MonthlyRecord>,
}

/// Profit series and summary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProfitReport {
    pub summary: ProfitSummary,
    pub monthly: Vec<MonthlyProfit>,
}

/// Cash-flow series and summary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CashFlowReport {
    pub summary: CashFlowSummary,
    pub monthly: Vec<MonthlyCashFlow>,
}

/// The complete computed forecast.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineOutput {
    pub revenue: RevenueReport,
    pub costs: CostReport,
    pub profit: ProfitReport,
    pub cash_flow: CashFlowReport,
    pub health: HealthScore,
}
