//! Financial statements generator
//!
//! The one page that does not hide a failed load behind sample data: a
//! generation failure surfaces as an error message next to the form.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{PageContext, SourceReport, ViewState};
use crate::domain::{checked_total, StatementLine, StatementRequest, StatementType};
use crate::format::{format_currency, format_date, format_money};
use crate::services::Loaded;

pub const GENERATION_FAILED: &str = "Failed to generate statement. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementsTab {
    #[default]
    Generate,
    Preview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementsModal {
    Export,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineRow {
    pub code: String,
    pub label: String,
    pub amount: String,
    pub prior_amount: String,
    pub level: u8,
    pub is_total: bool,
}

impl From<&StatementLine> for LineRow {
    fn from(l: &StatementLine) -> Self {
        Self {
            code: l.code.clone(),
            label: l.label.clone(),
            amount: format_money(l.amount),
            prior_amount: l.prior_amount.map(format_money).unwrap_or_default(),
            level: l.level,
            is_total: l.is_total,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementsView {
    pub state: ViewState<StatementsTab, StatementsModal>,
    pub statement_type: StatementType,
    pub period_end: String,
    pub lines: Vec<LineRow>,
    pub total: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub sources: Vec<SourceReport>,
}

/// Sum of the non-total lines at the top level, `None` on overflow.
pub fn top_level_total(lines: &[StatementLine]) -> Option<Decimal> {
    checked_total(
        lines
            .iter()
            .filter(|l| l.level == 0 && !l.is_total)
            .map(|l| l.amount),
    )
}

pub async fn generate(ctx: &PageContext, request: &StatementRequest) -> StatementsView {
    let loaded: Loaded<Vec<StatementLine>> = ctx
        .fetch
        .post_list("/api/fst-generate", request, Some("lines"), Vec::new())
        .await;
    let sources = vec![SourceReport::of("statement", &loaded)];

    let mut state = ViewState::default();
    let (lines, error) = match loaded {
        Loaded::Fresh(lines) => {
            state.select_tab(StatementsTab::Preview);
            (lines, None)
        }
        Loaded::Empty => (Vec::new(), None),
        Loaded::Fallback { .. } => (Vec::new(), Some(GENERATION_FAILED.to_string())),
    };

    StatementsView {
        state,
        statement_type: request.statement_type,
        period_end: format_date(Some(request.period_end)),
        lines: lines.iter().map(LineRow::from).collect(),
        total: format_currency(top_level_total(&lines)),
        error,
        sources,
    }
}
