//! Quantum portfolio optimisation demo

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{PageContext, SourceReport, ViewQuery, ViewState};
use crate::format::{format_percent, MISSING_AMOUNT};
use crate::services::fixtures;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantumTab {
    #[default]
    Portfolio,
    Circuit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantumModal {
    Explainer,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantumQuery {
    pub tab: Option<QuantumTab>,
    pub modal: Option<QuantumModal>,
}

fn as_percent(fraction: Decimal) -> String {
    fraction
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|p| p.to_f64())
        .map(format_percent)
        .unwrap_or_else(|| MISSING_AMOUNT.to_string())
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationRow {
    pub symbol: String,
    pub weight: String,
    pub expected_return: String,
    pub risk: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantumView {
    pub state: ViewState<QuantumTab, QuantumModal>,
    pub allocations: Vec<AllocationRow>,
    pub expected_return: String,
    pub volatility: String,
    pub sharpe_ratio: String,
    pub qubits: u32,
    pub iterations: u32,
    pub sources: Vec<SourceReport>,
}

pub async fn load(ctx: &PageContext, query: &QuantumQuery) -> QuantumView {
    let loaded = ctx
        .fetch
        .get(
            "/api/quantum/portfolio",
            Some("portfolio"),
            fixtures::quantum_portfolio(),
        )
        .await;
    let sources = vec![SourceReport::of("portfolio", &loaded)];
    let portfolio = loaded.into_value();

    let mut allocations: Vec<_> = portfolio.allocations.iter().collect();
    allocations.sort_by(|a, b| b.weight.cmp(&a.weight));

    QuantumView {
        state: ViewQuery {
            tab: query.tab,
            modal: query.modal,
            editing: None,
        }
        .restore(),
        allocations: allocations
            .into_iter()
            .map(|a| AllocationRow {
                symbol: a.symbol.clone(),
                weight: as_percent(a.weight),
                expected_return: as_percent(a.expected_return),
                risk: as_percent(a.risk),
            })
            .collect(),
        expected_return: as_percent(portfolio.expected_return),
        volatility: as_percent(portfolio.volatility),
        sharpe_ratio: portfolio
            .sharpe_ratio()
            .map(|s| format!("{:.2}", s.round_dp(2)))
            .unwrap_or_else(|| MISSING_AMOUNT.to_string()),
        qubits: portfolio.qubits,
        iterations: portfolio.iterations,
        sources,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::StaticTransport;

    #[tokio::test]
    async fn unreachable_backend_shows_sample_portfolio() {
        let ctx = PageContext::over(StaticTransport::new().fail("/api/quantum/portfolio", "refused"));

        let view = load(&ctx, &QuantumQuery::default()).await;
        assert_eq!(view.allocations[0].symbol, "AAPL");
        assert_eq!(view.allocations[0].weight, "30.0%");
        assert_eq!(view.sharpe_ratio, "0.71");
        assert_eq!(view.expected_return, "8.6%");
        assert_eq!(view.sources[0].report.state, crate::services::LoadState::Fallback);
    }
}
