//! Revenue engine: sold units and revenue per product, spread across the
//! horizon by each product's own sales curve.

use crate::curves::sales_weights;
use crate::EngineError;
use forecast_core::{
    DataSource, EngineInput, MonthlyRecord, ProductRevenue, RevenueReport, RevenueSummary,
    SalesModel,
};
use rust_decimal::prelude::ToPrimitive;

/// Compute the revenue report. Sales months are 1..=N; in pre-order mode the
/// timeline additionally carries a zero-revenue month 0, since that month is
/// reserved for up-front cash events.
pub(crate) fn compute_revenue(input: &EngineInput) -> Result<RevenueReport, EngineError> {
    let params = &input.parameters;
    let months = params.forecast_months;
    let first = params.first_timeline_month();
    let columns: Vec<&str> = input.products.iter().map(|p| p.name.as_str()).collect();

    let mut monthly: Vec<MonthlyRecord> = params
        .timeline_months()
        .into_iter()
        .map(|m| MonthlyRecord::zeroed(m, columns.iter().copied()))
        .collect();
    let mut monthly_units = monthly.clone();

    let mut product_summaries = Vec::with_capacity(input.products.len());
    let mut total_revenue = 0.0;
    let mut total_sold_units = 0.0;

    match input.realtime.data_source {
        DataSource::Manual => {
            for product in &input.products {
                let planned = product.planned_units.unwrap_or(0) as f64;
                let sell_through = product.sell_through_pct.unwrap_or(0.0);
                let price = product
                    .sell_price
                    .to_f64()
                    .ok_or_else(|| EngineError::Internal("sell price out of f64 range".into()))?;
                let sold_units = planned * sell_through / 100.0;
                let revenue = sold_units * price;

                let weights =
                    sales_weights(months, product.sales_model.unwrap_or(SalesModel::Even));
                for (i, w) in weights.iter().enumerate() {
                    // Sales month i+1; its timeline slot shifts when month 0 exists.
                    let slot = i + 1 - first as usize;
                    monthly[slot].add(&product.name, revenue * w);
                    monthly_units[slot].add(&product.name, sold_units * w);
                }

                total_revenue += revenue;
                total_sold_units += sold_units;
                product_summaries.push(ProductRevenue {
                    name: product.name.clone(),
                    total_revenue: revenue,
                    total_sold_units: sold_units,
                });
            }
        }
        // Realtime sources are not computed synchronously yet: the forecast
        // carries zero revenue for them until an importer populates sales.
        // The zero-filled series and summaries still list every product so
        // consumers see a stable shape.
        DataSource::Shopify | DataSource::Csv => {
            for product in &input.products {
                product_summaries.push(ProductRevenue {
                    name: product.name.clone(),
                    total_revenue: 0.0,
                    total_sold_units: 0.0,
                });
            }
        }
    }

    let avg_revenue_per_unit = if total_sold_units > 0.0 {
        total_revenue / total_sold_units
    } else {
        0.0
    };

    Ok(RevenueReport {
        summary: RevenueSummary {
            total_revenue,
            total_sold_units,
            avg_revenue_per_unit,
            products: product_summaries,
        },
        monthly,
        monthly_units,
    })
}
