//! Financial ratio dashboard

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{PageContext, SourceReport, ViewQuery, ViewState};
use crate::domain::FinancialFigures;
use crate::format::{format_date, format_money, format_percent, MISSING_AMOUNT};
use crate::services::fixtures;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatiosTab {
    #[default]
    Liquidity,
    Leverage,
    Profitability,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatiosModal {
    Formula,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatiosQuery {
    pub tab: Option<RatiosTab>,
    pub modal: Option<RatiosModal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioKind {
    /// `12.3%`
    Percent,
    /// `1.85x`
    Times,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ratio {
    pub key: &'static str,
    pub label: &'static str,
    pub group: RatiosTab,
    pub value: Option<Decimal>,
    pub display: String,
}

/// `None` for a zero denominator or a quotient that does not fit.
fn ratio(numerator: Option<Decimal>, denominator: Decimal) -> Option<Decimal> {
    numerator?.checked_div(denominator)
}

fn display(value: Option<Decimal>, kind: RatioKind) -> String {
    match (value, kind) {
        (None, _) => MISSING_AMOUNT.to_string(),
        (Some(v), RatioKind::Times) => format!("{:.2}x", v.round_dp(2)),
        (Some(v), RatioKind::Percent) => v
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|p| p.to_f64())
            .map(format_percent)
            .unwrap_or_else(|| MISSING_AMOUNT.to_string()),
    }
}

/// Every ratio the dashboard shows, in display order.
pub fn compute_ratios(f: &FinancialFigures) -> Vec<Ratio> {
    let gross_profit = f.revenue.checked_sub(f.cost_of_sales);
    let defs = [
        (
            "current_ratio",
            "Current ratio",
            RatiosTab::Liquidity,
            RatioKind::Times,
            ratio(Some(f.current_assets), f.current_liabilities),
        ),
        (
            "quick_ratio",
            "Quick ratio",
            RatiosTab::Liquidity,
            RatioKind::Times,
            ratio(f.current_assets.checked_sub(f.inventory), f.current_liabilities),
        ),
        (
            "cash_ratio",
            "Cash ratio",
            RatiosTab::Liquidity,
            RatioKind::Times,
            ratio(Some(f.cash), f.current_liabilities),
        ),
        (
            "debt_to_equity",
            "Debt to equity",
            RatiosTab::Leverage,
            RatioKind::Times,
            ratio(Some(f.total_liabilities), f.total_equity),
        ),
        (
            "debt_ratio",
            "Debt ratio",
            RatiosTab::Leverage,
            RatioKind::Percent,
            ratio(Some(f.total_liabilities), f.total_assets),
        ),
        (
            "gross_margin",
            "Gross margin",
            RatiosTab::Profitability,
            RatioKind::Percent,
            ratio(gross_profit, f.revenue),
        ),
        (
            "net_margin",
            "Net margin",
            RatiosTab::Profitability,
            RatioKind::Percent,
            ratio(Some(f.net_income), f.revenue),
        ),
        (
            "return_on_equity",
            "Return on equity",
            RatiosTab::Profitability,
            RatioKind::Percent,
            ratio(Some(f.net_income), f.total_equity),
        ),
        (
            "return_on_assets",
            "Return on assets",
            RatiosTab::Profitability,
            RatioKind::Percent,
            ratio(Some(f.net_income), f.total_assets),
        ),
    ];

    defs.into_iter()
        .map(|(key, label, group, kind, value)| Ratio {
            key,
            label,
            group,
            value,
            display: display(value, kind),
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatiosView {
    pub state: ViewState<RatiosTab, RatiosModal>,
    pub entity_name: String,
    pub period_end: String,
    pub revenue: String,
    pub net_income: String,
    /// Ratios of the active tab
    pub ratios: Vec<Ratio>,
    pub sources: Vec<SourceReport>,
}

pub async fn load(ctx: &PageContext, query: &RatiosQuery) -> RatiosView {
    let state = ViewQuery {
        tab: query.tab,
        modal: query.modal,
        editing: None,
    }
    .restore();

    let loaded = ctx
        .fetch
        .get("/api/fst-ratios", Some("figures"), fixtures::financial_figures())
        .await;
    let sources = vec![SourceReport::of("figures", &loaded)];
    let figures = loaded.into_value();

    let ratios = compute_ratios(&figures)
        .into_iter()
        .filter(|r| r.group == state.active_tab)
        .collect();

    RatiosView {
        entity_name: figures.entity_name.clone(),
        period_end: format_date(figures.period_end),
        revenue: format_money(figures.revenue),
        net_income: format_money(figures.net_income),
        ratios,
        state,
        sources,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn find<'a>(ratios: &'a [Ratio], key: &str) -> &'a Ratio {
        ratios.iter().find(|r| r.key == key).unwrap()
    }

    #[test]
    fn sample_figures_produce_expected_ratios() {
        let ratios = compute_ratios(&fixtures::financial_figures());
        assert_eq!(find(&ratios, "current_ratio").display, "2.00x");
        assert_eq!(find(&ratios, "quick_ratio").display, "1.33x");
        assert_eq!(find(&ratios, "debt_to_equity").display, "1.00x");
        assert_eq!(find(&ratios, "gross_margin").display, "40.0%");
        assert_eq!(find(&ratios, "net_margin").display, "8.0%");
    }

    #[test]
    fn zero_denominator_shows_placeholder() {
        let figures = FinancialFigures {
            net_income: dec!(100),
            ..FinancialFigures::default()
        };
        let ratios = compute_ratios(&figures);
        let roe = find(&ratios, "return_on_equity");
        assert_eq!(roe.value, None);
        assert_eq!(roe.display, "--");
    }

    #[test]
    fn out_of_range_figures_show_placeholder() {
        let figures = FinancialFigures {
            current_assets: Decimal::MIN,
            inventory: dec!(1),
            current_liabilities: dec!(0.5),
            revenue: Decimal::MAX,
            cost_of_sales: dec!(-1),
            net_income: Decimal::MAX,
            total_assets: dec!(1),
            ..FinancialFigures::default()
        };
        let ratios = compute_ratios(&figures);
        assert_eq!(find(&ratios, "current_ratio").display, "--");
        assert_eq!(find(&ratios, "quick_ratio").display, "--");
        assert_eq!(find(&ratios, "gross_margin").display, "--");
        // quotient fits, the percentage does not
        assert_eq!(find(&ratios, "return_on_assets").display, "--");
    }
}
