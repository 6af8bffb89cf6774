//! Finance-side records: forex rates, statement figures, materiality,
//! and the quantum optimisation demo.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::common::RecordId;

/// Exchange rate row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ForexRate {
    pub pair: String,
    pub rate: Decimal,
    pub previous_rate: Decimal,
    /// As provided; not recomputed when `rate` changes
    pub change: Decimal,
    pub change_percent: Decimal,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ForexRate {
    /// `rate - previous_rate`, or `None` when it does not fit a `Decimal`.
    pub fn derived_change(&self) -> Option<Decimal> {
        self.rate.checked_sub(self.previous_rate)
    }
}

/// Headline figures a ratio dashboard is computed from
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct FinancialFigures {
    pub entity_name: String,
    pub period_end: Option<NaiveDate>,
    pub cash: Decimal,
    pub current_assets: Decimal,
    pub inventory: Decimal,
    pub total_assets: Decimal,
    pub current_liabilities: Decimal,
    pub total_liabilities: Decimal,
    pub total_equity: Decimal,
    pub revenue: Decimal,
    pub cost_of_sales: Decimal,
    pub net_income: Decimal,
}

/// Basis an overall materiality figure is derived from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MaterialityBasis {
    Revenue,
    TotalAssets,
    PreTaxIncome,
    Equity,
}

impl MaterialityBasis {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Revenue => "Revenue",
            Self::TotalAssets => "Total Assets",
            Self::PreTaxIncome => "Pre-tax Income",
            Self::Equity => "Equity",
        }
    }
}

/// A benchmark amount and the percentage applied to it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MaterialityBenchmark {
    pub basis: MaterialityBasis,
    pub amount: Decimal,
    /// Percentage of `amount`, e.g. 5 for 5%
    pub percentage: Decimal,
}

/// Kind of statement the generator produces
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StatementType {
    BalanceSheet,
    IncomeStatement,
    CashFlow,
}

/// Request to generate a financial statement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementRequest {
    pub entity_id: RecordId,
    pub statement_type: StatementType,
    pub period_end: NaiveDate,
    #[serde(default)]
    pub comparative: bool,
}

/// One line of a generated statement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatementLine {
    pub code: String,
    pub label: String,
    pub amount: Decimal,
    #[serde(default)]
    pub prior_amount: Option<Decimal>,
    #[serde(default)]
    pub level: u8,
    #[serde(default)]
    pub is_total: bool,
}

/// Asset allocation produced by the quantum optimisation demo
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuantumAllocation {
    pub symbol: String,
    pub weight: Decimal,
    pub expected_return: Decimal,
    pub risk: Decimal,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuantumPortfolio {
    pub allocations: Vec<QuantumAllocation>,
    pub expected_return: Decimal,
    pub volatility: Decimal,
    #[serde(default)]
    pub qubits: u32,
    #[serde(default)]
    pub iterations: u32,
}

impl QuantumPortfolio {
    /// Return over volatility, with no risk-free rate.
    pub fn sharpe_ratio(&self) -> Option<Decimal> {
        self.expected_return.checked_div(self.volatility)
    }
}
