#![deny(warnings)]

//! Deterministic forecasting engine for cashcast.
//!
//! A pure, synchronous function of a validated [`EngineInput`]: sales
//! distribution curves, revenue and cost timelines, accrual profit with
//! break-even detection, and the cash-flow reconciliation with a composite
//! health score. No I/O, no randomness, no shared state; identical input
//! always yields identical output.

pub mod curves;

mod cashflow;
mod costs;
mod profit;
mod revenue;

pub use cashflow::health_score;

use forecast_core::{validate, EngineInput, EngineOutput, ValidationError};
use thiserror::Error;
use tracing::debug;

/// Errors surfaced by a forecast run. One error, one message; the engine
/// never partially computes.
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    /// Input failed schema or cross-field business validation.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    /// Unexpected condition wrapped with a generic message rather than
    /// silently swallowed.
    #[error("forecast computation failed: {0}")]
    Internal(String),
}

/// Run the full forecast: validate, then revenue, costs, profit, cash flow,
/// and health, strictly in that order. Returns a complete [`EngineOutput`]
/// or the first error; no partial state escapes.
pub fn run_forecast(input: &EngineInput) -> Result<EngineOutput, EngineError> {
    let input = validate(input)?;
    debug!(
        products = input.products.len(),
        fixed_costs = input.fixed_costs.len(),
        months = input.parameters.forecast_months,
        pre_order = input.parameters.pre_order_mode,
        "running forecast"
    );

    let aggregate = curves::aggregate_sales_weights(&input.products, input.parameters.forecast_months);
    let revenue = revenue::compute_revenue(&input)?;
    let costs = costs::compute_costs(&input, &aggregate)?;
    let profit = profit::compute_profit(&input.parameters, &revenue, &costs);
    let cash_flow = cashflow::compute_cash_flow(&input.parameters, &revenue, &costs, &profit);
    let health = health_score(&costs.report.summary, &revenue.summary, &profit.summary);

    Ok(EngineOutput {
        revenue,
        costs: costs.report,
        profit,
        cash_flow,
        health,
    })
}
