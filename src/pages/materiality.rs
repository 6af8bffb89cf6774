//! Materiality calculator
//!
//! Overall materiality is a percentage of a benchmark amount. Performance
//! materiality and the clearly-trivial threshold are fixed fractions of
//! it. The recommended figure is the most conservative benchmark.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{PageContext, SourceReport, ViewQuery, ViewState};
use crate::domain::{MaterialityBasis, MaterialityBenchmark};
use crate::format::{format_currency, format_money};
use crate::services::fixtures;

const PERFORMANCE_SHARE: Decimal = dec!(0.75);
const TRIVIAL_SHARE: Decimal = dec!(0.05);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialityTab {
    #[default]
    Calculator,
    Benchmarks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialityModal {
    Rationale,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialityQuery {
    pub tab: Option<MaterialityTab>,
    pub modal: Option<MaterialityModal>,
    pub basis: Option<MaterialityBasis>,
}

impl MaterialityQuery {
    pub fn view_state(&self) -> ViewState<MaterialityTab, MaterialityModal> {
        ViewQuery {
            tab: self.tab,
            modal: self.modal,
            editing: None,
        }
        .restore()
    }
}

/// Thresholds derived from one benchmark
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialityCalculation {
    pub basis: MaterialityBasis,
    pub label: &'static str,
    pub benchmark_amount: Decimal,
    pub percentage: Decimal,
    /// `None` when the benchmark is too large to compute with
    pub overall: Option<Decimal>,
    pub performance: Option<Decimal>,
    pub trivial: Option<Decimal>,
    pub display: MaterialityDisplay,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialityDisplay {
    pub benchmark_amount: String,
    pub overall: String,
    pub performance: String,
    pub trivial: String,
}

impl MaterialityCalculation {
    pub fn of(benchmark: &MaterialityBenchmark) -> Self {
        let overall = benchmark
            .amount
            .checked_mul(benchmark.percentage)
            .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
            .map(|v| v.round_dp(2));
        let share = |fraction: Decimal| {
            overall
                .and_then(|o| o.checked_mul(fraction))
                .map(|v| v.round_dp(2))
        };
        let performance = share(PERFORMANCE_SHARE);
        let trivial = share(TRIVIAL_SHARE);
        Self {
            basis: benchmark.basis,
            label: benchmark.basis.label(),
            benchmark_amount: benchmark.amount,
            percentage: benchmark.percentage,
            overall,
            performance,
            trivial,
            display: MaterialityDisplay {
                benchmark_amount: format_money(benchmark.amount),
                overall: format_currency(overall),
                performance: format_currency(performance),
                trivial: format_currency(trivial),
            },
        }
    }
}

/// The lowest positive overall figure among `calculations`.
pub fn recommend(calculations: &[MaterialityCalculation]) -> Option<&MaterialityCalculation> {
    calculations
        .iter()
        .filter_map(|c| c.overall.filter(|o| *o > Decimal::ZERO).map(|o| (o, c)))
        .min_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, c)| c)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialityView {
    pub state: ViewState<MaterialityTab, MaterialityModal>,
    pub calculations: Vec<MaterialityCalculation>,
    pub recommended: Option<MaterialityCalculation>,
    /// The calculation for the basis the user picked, if any
    pub selected: Option<MaterialityCalculation>,
    pub sources: Vec<SourceReport>,
}

pub async fn load(ctx: &PageContext, query: &MaterialityQuery) -> MaterialityView {
    let loaded = ctx
        .fetch
        .get_list(
            "/api/audit/materiality/benchmarks",
            Some("benchmarks"),
            fixtures::materiality_benchmarks(),
        )
        .await;
    let sources = vec![SourceReport::of("benchmarks", &loaded)];

    let calculations: Vec<MaterialityCalculation> = loaded
        .into_value()
        .iter()
        .map(MaterialityCalculation::of)
        .collect();
    let recommended = recommend(&calculations).cloned();
    let selected = query
        .basis
        .and_then(|basis| calculations.iter().find(|c| c.basis == basis).cloned());

    MaterialityView {
        state: query.view_state(),
        calculations,
        recommended,
        selected,
        sources,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_follow_fixed_shares() {
        let calc = MaterialityCalculation::of(&MaterialityBenchmark {
            basis: MaterialityBasis::Revenue,
            amount: dec!(18500000),
            percentage: dec!(1),
        });
        assert_eq!(calc.overall, Some(dec!(185000)));
        assert_eq!(calc.performance, Some(dec!(138750)));
        assert_eq!(calc.trivial, Some(dec!(9250)));
        assert_eq!(calc.display.overall, "$185,000");
    }

    #[test]
    fn recommendation_is_the_lowest_overall_figure() {
        let calcs: Vec<_> = fixtures::materiality_benchmarks()
            .iter()
            .map(MaterialityCalculation::of)
            .collect();
        // revenue 185,000; total assets 248,000; pre-tax income 98,500
        let best = recommend(&calcs).unwrap();
        assert_eq!(best.basis, MaterialityBasis::PreTaxIncome);
        assert_eq!(best.overall, Some(dec!(98500)));
    }

    #[test]
    fn oversized_benchmark_shows_placeholder() {
        let calcs = vec![
            MaterialityCalculation::of(&MaterialityBenchmark {
                basis: MaterialityBasis::TotalAssets,
                amount: Decimal::MAX,
                percentage: dec!(2),
            }),
            MaterialityCalculation::of(&MaterialityBenchmark {
                basis: MaterialityBasis::Revenue,
                amount: dec!(1000000),
                percentage: dec!(1),
            }),
        ];
        assert_eq!(calcs[0].overall, None);
        assert_eq!(calcs[0].display.overall, "--");
        assert_eq!(calcs[0].display.trivial, "--");
        assert_eq!(recommend(&calcs).unwrap().basis, MaterialityBasis::Revenue);
    }

    #[test]
    fn zero_benchmarks_are_never_recommended() {
        let calcs = vec![MaterialityCalculation::of(&MaterialityBenchmark {
            basis: MaterialityBasis::Equity,
            amount: Decimal::ZERO,
            percentage: dec!(2),
        })];
        assert!(recommend(&calcs).is_none());
    }
}
