#![deny(warnings)]

//! Core domain model for the cashcast forecasting engine.
//!
//! This crate defines the serializable input schema (products, fixed costs,
//! global parameters), the computed output model (monthly series and summary
//! statistics), and validation helpers that guarantee the engine's basic
//! invariants before any computation runs.

pub mod input;
pub mod output;
pub mod validate;

pub use input::{
    CostType, Currency, DataSource, EngineInput, FixedCostItem, Parameters, PaymentSchedule,
    Product, ProductId, RealtimeSettings, SalesModel,
};
pub use output::{
    CashFlowReport, CashFlowSummary, CostReport, CostSummary, EngineOutput, FixedCostTotal,
    HealthScore, MonthlyCashFlow, MonthlyProfit, MonthlyRecord, ProductCost, ProductRevenue,
    ProfitReport, ProfitSummary, RevenueReport, RevenueSummary, Runway,
};
pub use validate::{validate, ValidationError};
