//! Input schema: what the user enters before a forecast runs.
//!
//! Monetary fields are `Decimal`; percentages are plain `f64` in the 0..=100
//! range. Wire names match the product's display strings so persisted plans
//! deserialize unchanged.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Unique identifier for a product, stable across edits.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProductId(pub String);

/// Shape of a product's sales distribution over the forecast horizon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SalesModel {
    /// Front-loaded: most units move in the first three months.
    Launch,
    /// Uniform across every sales month.
    Even,
    /// Bell curve centered at the midpoint of the horizon.
    Seasonal,
    /// Linearly increasing ramp.
    Growth,
}

/// One sellable item. Read-only to the engine, never mutated by it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Stable identifier.
    pub id: ProductId,
    /// Display name; also the column key in monthly output records.
    pub name: String,
    /// Planned production quantity. Required only in manual data-source mode.
    #[serde(default)]
    pub planned_units: Option<u64>,
    /// Production cost per unit (>= 0).
    pub unit_cost: Decimal,
    /// Sell price per unit (>= 0).
    pub sell_price: Decimal,
    /// Sales distribution model. Required only in manual mode.
    #[serde(default)]
    pub sales_model: Option<SalesModel>,
    /// Share of planned units actually sold, 0..=100. Required only in manual mode.
    #[serde(default)]
    pub sell_through_pct: Option<f64>,
    /// Share of production cost paid to the supplier before delivery, 0..=100.
    pub deposit_pct: f64,
}

/// When a fixed cost's cash actually leaves the business.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentSchedule {
    /// Entire amount in the first timeline month.
    #[serde(rename = "Paid Up-Front")]
    UpFront,
    /// Spread evenly across every sales month.
    #[serde(rename = "Allocated Monthly")]
    Monthly,
    /// Posted once every three months, starting at the first sales month.
    #[serde(rename = "Allocated Quarterly")]
    Quarterly,
    /// Weighted by the aggregate sales curve across all products.
    #[serde(rename = "Allocated According to Sales")]
    AccordingToSales,
}

/// How a fixed cost's `amount` scales with the horizon.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CostType {
    /// `amount` is the full-period sum.
    #[default]
    #[serde(rename = "Total for Period")]
    TotalForPeriod,
    /// `amount` recurs every month; the period total is `amount × months`.
    #[serde(rename = "Monthly Cost")]
    MonthlyCost,
}

/// One recurring or one-off overhead line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FixedCostItem {
    /// Stable identifier.
    pub id: String,
    /// Display name; also the column key in monthly cost records.
    pub name: String,
    /// Amount in the forecast currency (>= 0). Meaning depends on `cost_type`.
    pub amount: Decimal,
    /// Cash timing policy.
    pub schedule: PaymentSchedule,
    /// Magnitude policy; defaults to `Total for Period`.
    #[serde(default)]
    pub cost_type: CostType,
    /// Marker for when the cost begins, 1-based; defaults to month 1.
    /// Carried through for consumers; allocation timing is fully determined
    /// by `schedule`.
    #[serde(default = "default_start_month")]
    pub start_month: u32,
}

fn default_start_month() -> u32 {
    1
}

/// Forecast currency.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    EUR,
    USD,
}

/// Global forecast configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    /// Horizon length in months, 1..=36.
    pub forecast_months: u32,
    /// Corporate tax rate percentage, 0..=100. Applied only to positive
    /// monthly operating profit.
    pub tax_rate_pct: f64,
    /// Display/reporting currency. Does not affect the math.
    pub currency: Currency,
    /// When true, a "Month 0" precedes the normal Month 1..N timeline and
    /// receives up-front costs and deposits.
    #[serde(default)]
    pub pre_order_mode: bool,
}

impl Parameters {
    /// First key on the output timeline: 0 in pre-order mode, else 1.
    pub fn first_timeline_month(&self) -> u32 {
        if self.pre_order_mode {
            0
        } else {
            1
        }
    }

    /// All timeline month keys in chronological order. Sales months are
    /// always 1..=N; pre-order mode prepends the reserved month 0.
    pub fn timeline_months(&self) -> Vec<u32> {
        (self.first_timeline_month()..=self.forecast_months).collect()
    }
}

/// Where forecast figures come from. Only `Manual` computes synchronously;
/// the other sources are documented stubs that currently yield zero revenue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    #[default]
    Manual,
    Shopify,
    #[serde(rename = "CSV")]
    Csv,
}

/// Data-source selection for the forecast.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealtimeSettings {
    #[serde(default)]
    pub data_source: DataSource,
}

/// Aggregate root handed to the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineInput {
    /// At least one product is required.
    pub products: Vec<Product>,
    /// Zero or more overhead lines.
    #[serde(default)]
    pub fixed_costs: Vec<FixedCostItem>,
    /// Global configuration.
    pub parameters: Parameters,
    /// Data-source mode; defaults to manual.
    #[serde(default)]
    pub realtime: RealtimeSettings,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn product(name: &str) -> Product {
        Product {
            id: ProductId(format!("p-{name}")),
            name: name.to_string(),
            planned_units: Some(1000),
            unit_cost: Decimal::new(10, 0),
            sell_price: Decimal::new(25, 0),
            sales_model: Some(SalesModel::Even),
            sell_through_pct: Some(100.0),
            deposit_pct: 0.0,
        }
    }

    #[test]
    fn serde_roundtrip_engine_input() {
        let input = EngineInput {
            products: vec![product("Widget")],
            fixed_costs: vec![FixedCostItem {
                id: "fc-1".to_string(),
                name: "Rent".to_string(),
                amount: Decimal::new(1200, 0),
                schedule: PaymentSchedule::Monthly,
                cost_type: CostType::MonthlyCost,
                start_month: 1,
            }],
            parameters: Parameters {
                forecast_months: 12,
                tax_rate_pct: 20.0,
                currency: Currency::EUR,
                pre_order_mode: false,
            },
            realtime: RealtimeSettings::default(),
        };
        let s = serde_json::to_string_pretty(&input).unwrap();
        let back: EngineInput = serde_json::from_str(&s).unwrap();
        assert_eq!(back, input);
    }

    #[test]
    fn schedule_wire_names_match_display_strings() {
        let s = serde_json::to_string(&PaymentSchedule::AccordingToSales).unwrap();
        assert_eq!(s, "\"Allocated According to Sales\"");
        let s = serde_json::to_string(&CostType::TotalForPeriod).unwrap();
        assert_eq!(s, "\"Total for Period\"");
        let s = serde_json::to_string(&SalesModel::Launch).unwrap();
        assert_eq!(s, "\"launch\"");
        let s = serde_json::to_string(&DataSource::Csv).unwrap();
        assert_eq!(s, "\"CSV\"");
    }

    #[test]
    fn missing_cost_type_and_start_month_default() {
        let json = r#"{
            "id": "fc-1",
            "name": "Insurance",
            "amount": "900",
            "schedule": "Paid Up-Front"
        }"#;
        let item: FixedCostItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.cost_type, CostType::TotalForPeriod);
        assert_eq!(item.start_month, 1);
    }

    #[test]
    fn timeline_months_respect_pre_order() {
        let mut params = Parameters {
            forecast_months: 3,
            tax_rate_pct: 0.0,
            currency: Currency::USD,
            pre_order_mode: false,
        };
        assert_eq!(params.timeline_months(), vec![1, 2, 3]);
        params.pre_order_mode = true;
        assert_eq!(params.timeline_months(), vec![0, 1, 2, 3]);
    }
}
