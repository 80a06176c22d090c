//! Schema validation with first-error-wins semantics.
//!
//! Callers surface only the first violated rule's message to the user, so
//! rule order is part of the contract: products present, then parameter
//! bounds, then per-product rules in field-declaration order, then per
//! fixed-cost rules. Implausible-but-valid data (a loss-making price) is a
//! soft warning, never an error: users may intentionally model loss-leaders.

use crate::input::{DataSource, EngineInput, FixedCostItem, Product};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::warn;

/// Bounds on the forecast horizon, in months.
pub const MIN_FORECAST_MONTHS: u32 = 1;
pub const MAX_FORECAST_MONTHS: u32 = 36;

/// First violated schema rule. One error, one message; validation never
/// aggregates.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("At least one product is required")]
    NoProducts,
    #[error("Forecast Months must be between 1 and 36 (got {0})")]
    ForecastMonthsOutOfRange(u32),
    #[error("Tax Rate must be between 0 and 100 (got {0})")]
    TaxRateOutOfRange(f64),
    #[error("Product '{0}': name must not be empty")]
    EmptyProductName(String),
    #[error("Product '{0}': Unit Cost must be non-negative")]
    NegativeUnitCost(String),
    #[error("Product '{0}': Sell Price must be non-negative")]
    NegativeSellPrice(String),
    #[error("Product '{0}': Deposit Percentage must be between 0 and 100 (got {1})")]
    DepositPctOutOfRange(String, f64),
    #[error("Product '{0}': Sell-Through Percentage must be between 0 and 100 (got {1})")]
    SellThroughOutOfRange(String, f64),
    #[error("Product '{0}': Planned Units is required when the data source is Manual")]
    MissingPlannedUnits(String),
    #[error("Product '{0}': Sell-Through Percentage is required when the data source is Manual")]
    MissingSellThrough(String),
    #[error("Product '{0}': Sales Model is required when the data source is Manual")]
    MissingSalesModel(String),
    #[error("Fixed cost '{0}': Amount must be non-negative")]
    NegativeFixedCostAmount(String),
    #[error("Fixed cost '{0}': Start Month must be between 1 and the forecast horizon (got {1})")]
    StartMonthOutOfRange(String, u32),
    #[error("non-finite numeric value in '{0}'")]
    NonFinite(String),
}

/// Validate the whole input and return a defaulted, normalized copy.
///
/// Fails fast on the first violated rule; never partial-computes.
pub fn validate(input: &EngineInput) -> Result<EngineInput, ValidationError> {
    if input.products.is_empty() {
        return Err(ValidationError::NoProducts);
    }

    let months = input.parameters.forecast_months;
    if !(MIN_FORECAST_MONTHS..=MAX_FORECAST_MONTHS).contains(&months) {
        return Err(ValidationError::ForecastMonthsOutOfRange(months));
    }
    let tax = input.parameters.tax_rate_pct;
    if !tax.is_finite() {
        return Err(ValidationError::NonFinite("Tax Rate".to_string()));
    }
    if !(0.0..=100.0).contains(&tax) {
        return Err(ValidationError::TaxRateOutOfRange(tax));
    }

    let manual = matches!(input.realtime.data_source, DataSource::Manual);
    for product in &input.products {
        validate_product(product, manual)?;
    }
    for item in &input.fixed_costs {
        validate_fixed_cost(item, months)?;
    }

    Ok(input.clone())
}

fn validate_product(product: &Product, manual: bool) -> Result<(), ValidationError> {
    let name = product.name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyProductName(product.id.0.clone()));
    }
    if product.unit_cost < Decimal::ZERO {
        return Err(ValidationError::NegativeUnitCost(name.to_string()));
    }
    if product.sell_price < Decimal::ZERO {
        return Err(ValidationError::NegativeSellPrice(name.to_string()));
    }
    if !product.deposit_pct.is_finite() {
        return Err(ValidationError::NonFinite(format!("{name}: Deposit Percentage")));
    }
    if !(0.0..=100.0).contains(&product.deposit_pct) {
        return Err(ValidationError::DepositPctOutOfRange(
            name.to_string(),
            product.deposit_pct,
        ));
    }
    if let Some(st) = product.sell_through_pct {
        if !st.is_finite() {
            return Err(ValidationError::NonFinite(format!(
                "{name}: Sell-Through Percentage"
            )));
        }
        if !(0.0..=100.0).contains(&st) {
            return Err(ValidationError::SellThroughOutOfRange(name.to_string(), st));
        }
    }
    if manual {
        if product.planned_units.is_none() {
            return Err(ValidationError::MissingPlannedUnits(name.to_string()));
        }
        if product.sell_through_pct.is_none() {
            return Err(ValidationError::MissingSellThrough(name.to_string()));
        }
        if product.sales_model.is_none() {
            return Err(ValidationError::MissingSalesModel(name.to_string()));
        }
    }
    if product.unit_cost > product.sell_price {
        // Soft warning only: the plan may be a deliberate loss-leader.
        warn!(
            product = name,
            unit_cost = %product.unit_cost,
            sell_price = %product.sell_price,
            "unit cost exceeds sell price"
        );
    }
    Ok(())
}

fn validate_fixed_cost(item: &FixedCostItem, months: u32) -> Result<(), ValidationError> {
    if item.amount < Decimal::ZERO {
        return Err(ValidationError::NegativeFixedCostAmount(item.name.clone()));
    }
    if item.start_month < 1 || item.start_month > months {
        return Err(ValidationError::StartMonthOutOfRange(
            item.name.clone(),
            item.start_month,
        ));
    }
    Ok(())
}
