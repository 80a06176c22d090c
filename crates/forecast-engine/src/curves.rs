//! Sales distribution curves: normalized per-month weight vectors.
//!
//! Weight vectors are indexed by sales month (index 0 = sales month 1) and
//! sum to 1.0 for any positive horizon. Both the revenue spread and the
//! "Allocated According to Sales" fixed-cost schedule consume them.

use forecast_core::{Product, SalesModel};
use rust_decimal::prelude::ToPrimitive;

/// Fixed front-loaded split for the launch model with three or more months.
const LAUNCH_SPLIT: [f64; 3] = [0.6, 0.3, 0.1];

/// Per-month weights for one product's curve. Returns an all-zero (empty)
/// vector when `months` is 0 rather than dividing by zero.
pub fn sales_weights(months: u32, model: SalesModel) -> Vec<f64> {
    if months == 0 {
        return Vec::new();
    }
    let n = months as usize;
    match model {
        SalesModel::Launch => match n {
            1 => vec![1.0],
            2 => vec![0.7, 0.3],
            _ => {
                let mut w = vec![0.0; n];
                w[..3].copy_from_slice(&LAUNCH_SPLIT);
                w
            }
        },
        SalesModel::Even => vec![1.0 / months as f64; n],
        SalesModel::Seasonal => {
            let mid = (months as f64 - 1.0) / 2.0;
            let sigma = months as f64 / 4.0;
            let raw: Vec<f64> = (0..n)
                .map(|i| {
                    let d = i as f64 - mid;
                    (-(d * d) / (2.0 * sigma * sigma)).exp()
                })
                .collect();
            normalize(raw)
        }
        SalesModel::Growth => normalize((0..n).map(|i| (i + 1) as f64).collect()),
    }
}

/// One curve for all products together, weighting each product's curve by
/// its economic size (`planned_units × sell_price`). Falls back to a
/// uniform vector when the total weighted value is zero, so sales-allocated
/// fixed costs still spread over the horizon.
pub fn aggregate_sales_weights(products: &[Product], months: u32) -> Vec<f64> {
    if months == 0 {
        return Vec::new();
    }
    let n = months as usize;
    let mut acc = vec![0.0; n];
    let mut total_value = 0.0;
    for product in products {
        let units = product.planned_units.unwrap_or(0) as f64;
        let price = product.sell_price.to_f64().unwrap_or(0.0);
        let value = units * price;
        if value <= 0.0 {
            continue;
        }
        total_value += value;
        let curve = sales_weights(months, product.sales_model.unwrap_or(SalesModel::Even));
        for (a, w) in acc.iter_mut().zip(&curve) {
            *a += value * w;
        }
    }
    if total_value <= 0.0 {
        return vec![1.0 / months as f64; n];
    }
    normalize(acc)
}

fn normalize(raw: Vec<f64>) -> Vec<f64> {
    let total: f64 = raw.iter().sum();
    if total <= 0.0 {
        return vec![0.0; raw.len()];
    }
    raw.into_iter().map(|w| w / total).collect()
}
