//! Forex rate table

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{PageContext, SourceReport, ViewQuery, ViewState};
use crate::domain::ForexRate;
use crate::format::{format_datetime, format_signed, trend_color};
use crate::services::fixtures;

/// Tolerance when comparing a provided change with the recomputed one
const CHANGE_TOLERANCE: Decimal = dec!(0.0001);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForexTab {
    #[default]
    Rates,
    Converter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForexModal {
    History,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForexQuery {
    pub tab: Option<ForexTab>,
    pub modal: Option<ForexModal>,
    /// Currency code to filter pairs by, e.g. `USD`
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateRow {
    pub pair: String,
    pub rate: Decimal,
    pub previous_rate: Decimal,
    pub change: String,
    pub change_percent: String,
    pub trend_class: &'static str,
    pub updated_at: String,
    /// The provided change disagrees with `rate - previous_rate`
    pub change_inconsistent: bool,
}

impl From<&ForexRate> for RateRow {
    fn from(r: &ForexRate) -> Self {
        // a change that cannot be checked counts as inconsistent
        let inconsistent = r
            .derived_change()
            .and_then(|derived| r.change.checked_sub(derived))
            .map_or(true, |drift| drift.abs() > CHANGE_TOLERANCE);
        Self {
            pair: r.pair.clone(),
            rate: r.rate,
            previous_rate: r.previous_rate,
            change: format_signed(r.change, 4, ""),
            change_percent: format_signed(r.change_percent, 2, "%"),
            trend_class: trend_color(r.change),
            updated_at: format_datetime(r.updated_at),
            change_inconsistent: inconsistent,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForexView {
    pub state: ViewState<ForexTab, ForexModal>,
    pub rates: Vec<RateRow>,
    pub gainers: usize,
    pub decliners: usize,
    pub sources: Vec<SourceReport>,
}

pub async fn load(ctx: &PageContext, query: &ForexQuery) -> ForexView {
    let loaded = ctx
        .fetch
        .get_list("/api/forex/rates", Some("rates"), fixtures::forex_rates())
        .await;
    let sources = vec![SourceReport::of("rates", &loaded)];

    let currency = query
        .currency
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_uppercase);

    let rates: Vec<ForexRate> = loaded
        .into_value()
        .into_iter()
        .filter(|r| {
            currency
                .as_deref()
                .map_or(true, |c| r.pair.split('/').any(|side| side == c))
        })
        .collect();

    ForexView {
        state: ViewQuery {
            tab: query.tab,
            modal: query.modal,
            editing: None,
        }
        .restore(),
        gainers: rates.iter().filter(|r| r.change > Decimal::ZERO).count(),
        decliners: rates.iter().filter(|r| r.change < Decimal::ZERO).count(),
        rates: rates.iter().map(RateRow::from).collect(),
        sources,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::StaticTransport;

    #[test]
    fn row_signs_change_and_picks_trend_colour() {
        let rates = fixtures::forex_rates();
        let up = RateRow::from(&rates[0]);
        assert_eq!(up.change, "+0.0021");
        assert_eq!(up.change_percent, "+0.19%");
        assert_eq!(up.trend_class, "text-green-600");
        assert!(!up.change_inconsistent);

        let down = RateRow::from(&rates[1]);
        assert_eq!(down.change, "-0.0027");
        assert_eq!(down.trend_class, "text-red-600");
    }

    #[test]
    fn stale_change_is_flagged_not_rewritten() {
        let mut rate = fixtures::forex_rates().remove(0);
        rate.rate = dec!(1.0900);
        let row = RateRow::from(&rate);
        assert_eq!(row.change, "+0.0021");
        assert!(row.change_inconsistent);
    }

    fn context() -> PageContext {
        let rates = serde_json::to_value(fixtures::forex_rates()).unwrap();
        PageContext::over(
            StaticTransport::new().reply("/api/forex/rates", 200, serde_json::json!({ "rates": rates })),
        )
    }

    #[tokio::test]
    async fn currency_filter_matches_either_side_of_the_pair() {
        let ctx = context();

        let all = load(&ctx, &ForexQuery::default()).await;
        assert_eq!(all.rates.len(), 3);
        assert_eq!((all.gainers, all.decliners), (2, 1));

        let query = ForexQuery {
            currency: Some(" gbp ".into()),
            ..Default::default()
        };
        let gbp = load(&ctx, &query).await;
        let pairs: Vec<_> = gbp.rates.iter().map(|r| r.pair.as_str()).collect();
        assert_eq!(pairs, ["GBP/USD"]);
        assert_eq!((gbp.gainers, gbp.decliners), (0, 1));

        let query = ForexQuery {
            currency: Some("USD".into()),
            ..Default::default()
        };
        assert_eq!(load(&ctx, &query).await.rates.len(), 3);

        let query = ForexQuery {
            currency: Some("CHF".into()),
            ..Default::default()
        };
        let none = load(&ctx, &query).await;
        assert!(none.rates.is_empty());
        assert_eq!((none.gainers, none.decliners), (0, 0));
    }
}
