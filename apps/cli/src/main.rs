#![deny(warnings)]

//! Headless CLI: load a forecast scenario, run the engine, print the KPIs.

use anyhow::{Context, Result};
use forecast_core::{
    Currency, EngineInput, Parameters, Product, ProductId, RealtimeSettings, Runway, SalesModel,
};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

struct Args {
    scenario: Option<String>,
    json: bool,
    version: bool,
}

fn parse_args() -> Args {
    let mut args = Args {
        scenario: None,
        json: false,
        version: false,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--scenario" => args.scenario = it.next(),
            "--json" => args.json = true,
            "--version" => args.version = true,
            _ => {}
        }
    }
    args
}

fn minimal_scenario() -> EngineInput {
    EngineInput {
        products: vec![Product {
            id: ProductId("p-widget".to_string()),
            name: "Widget".to_string(),
            planned_units: Some(1000),
            unit_cost: rust_decimal::Decimal::new(10, 0),
            sell_price: rust_decimal::Decimal::new(25, 0),
            sales_model: Some(SalesModel::Even),
            sell_through_pct: Some(100.0),
            deposit_pct: 0.0,
        }],
        fixed_costs: vec![],
        parameters: Parameters {
            forecast_months: 12,
            tax_rate_pct: 20.0,
            currency: Currency::EUR,
            pre_order_mode: false,
        },
        realtime: RealtimeSettings::default(),
    }
}

fn load_scenario(path: &str) -> Result<EngineInput> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading scenario {path}"))?;
    serde_json::from_str(&text).with_context(|| format!("parsing scenario {path}"))
}

fn main() -> Result<()> {
    // Logging setup
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::INFO)
        .init();

    let args = parse_args();
    if args.version {
        println!("cashcast {} ({})", env!("CARGO_PKG_VERSION"), env!("GIT_SHA"));
        return Ok(());
    }
    info!(scenario = ?args.scenario, "starting CLI");

    let input = match &args.scenario {
        Some(path) => load_scenario(path)?,
        None => minimal_scenario(),
    };
    let output = forecast_engine::run_forecast(&input)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let currency = match input.parameters.currency {
        Currency::EUR => "EUR",
        Currency::USD => "USD",
    };
    println!(
        "Forecast OK | products: {} | fixed costs: {} | months: {} | currency: {}",
        input.products.len(),
        input.fixed_costs.len(),
        input.parameters.forecast_months,
        currency
    );
    println!(
        "Revenue | total: {:.2} | units sold: {:.0} | avg/unit: {:.2}",
        output.revenue.summary.total_revenue,
        output.revenue.summary.total_sold_units,
        output.revenue.summary.avg_revenue_per_unit
    );
    println!(
        "Costs | fixed: {:.2} | variable: {:.2} | operating: {:.2} | deposits: {:.2}",
        output.costs.summary.total_fixed,
        output.costs.summary.total_variable,
        output.costs.summary.total_operating,
        output.costs.summary.total_deposits_paid
    );
    let break_even = match output.profit.summary.break_even_month {
        Some(m) => format!("month {m}"),
        None => "never".to_string(),
    };
    println!(
        "Profit | operating: {:.2} | net: {:.2} | net margin: {:.1}% | break-even: {}",
        output.profit.summary.total_operating_profit,
        output.profit.summary.total_net_profit,
        output.profit.summary.net_margin_pct,
        break_even
    );
    let runway = match output.cash_flow.summary.runway {
        Runway::Infinite => "infinite".to_string(),
        Runway::Months(m) => format!("{m:.1} months"),
    };
    println!(
        "Cash | ending: {:.2} | peak funding need: {:.2} | runway: {}",
        output.cash_flow.summary.ending_cash_balance,
        output.cash_flow.summary.peak_funding_need,
        runway
    );
    println!(
        "Health | overall: {:.0} | profitability: {:.0} | liquidity: {:.0} | efficiency: {:.0} | demand: {:.0}",
        output.health.overall,
        output.health.profitability,
        output.health.liquidity,
        output.health.efficiency,
        output.health.demand
    );

    Ok(())
}
