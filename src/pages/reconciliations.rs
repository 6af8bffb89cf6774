//! Supplier reconciliation workspace

use serde::{Deserialize, Serialize};

use super::{PageContext, SourceReport, ViewQuery, ViewState};
use crate::domain::{
    checked_total, ItemType, MatchStatus, Reconciliation, ReconciliationFilter, ReconciliationItem,
    ReconciliationStatus, RecordId,
};
use crate::format::{format_currency, format_date, format_money, status_color};
use crate::reconciliation::{filter_reconciliations, MatchSummary};
use crate::services::fixtures;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconciliationTab {
    #[default]
    Open,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconciliationModal {
    Detail,
    Upload,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationQuery {
    pub tab: Option<ReconciliationTab>,
    pub modal: Option<ReconciliationModal>,
    pub editing: Option<String>,
    pub status: Option<ReconciliationStatus>,
    pub search: Option<String>,
}

impl ReconciliationQuery {
    pub fn view_state(&self) -> ViewState<ReconciliationTab, ReconciliationModal> {
        ViewQuery {
            tab: self.tab,
            modal: self.modal,
            editing: self.editing.clone(),
        }
        .restore()
    }

    pub fn filter(&self) -> ReconciliationFilter {
        ReconciliationFilter {
            status: self.status,
            search: self.search.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRow {
    pub id: RecordId,
    pub item_type: ItemType,
    pub reference: String,
    pub date: String,
    pub amount: String,
    pub description: String,
    pub status: MatchStatus,
    pub status_class: &'static str,
    pub matched_with: Option<RecordId>,
}

impl From<&ReconciliationItem> for ItemRow {
    fn from(i: &ReconciliationItem) -> Self {
        Self {
            id: i.id.clone(),
            item_type: i.item_type,
            reference: i.reference.clone(),
            date: format_date(i.date),
            amount: format_money(i.amount),
            description: i.description.clone().unwrap_or_default(),
            status: i.status,
            status_class: status_color(i.status.as_str()),
            matched_with: i.matched_with.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationCard {
    pub id: RecordId,
    pub supplier_name: String,
    pub supplier_code: String,
    pub period: String,
    pub status: ReconciliationStatus,
    pub status_class: &'static str,
    pub supplier_balance: String,
    pub internal_balance: String,
    /// The difference as reported, never recomputed
    pub difference: String,
    pub difference_inconsistent: bool,
    pub summary: MatchSummary,
    pub attachments: usize,
}

impl From<&Reconciliation> for ReconciliationCard {
    fn from(r: &Reconciliation) -> Self {
        Self {
            id: r.id.clone(),
            supplier_name: r.supplier_name.clone(),
            supplier_code: r.supplier_code.clone(),
            period: r.period.clone(),
            status: r.status,
            status_class: status_color(r.status.as_str()),
            supplier_balance: format_money(r.supplier_balance),
            internal_balance: format_money(r.internal_balance),
            difference: format_money(r.difference),
            difference_inconsistent: r.difference_is_inconsistent(),
            summary: MatchSummary::of(r),
            attachments: r.attachments.len(),
        }
    }
}

/// A reconciliation opened in the detail modal
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationDetail {
    #[serde(flatten)]
    pub card: ReconciliationCard,
    pub items: Vec<ItemRow>,
}

impl From<&Reconciliation> for ReconciliationDetail {
    fn from(r: &Reconciliation) -> Self {
        Self {
            card: ReconciliationCard::from(r),
            items: r.items.iter().map(ItemRow::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationTotals {
    pub count: usize,
    pub disputed: usize,
    pub total_difference: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationsView {
    pub state: ViewState<ReconciliationTab, ReconciliationModal>,
    pub reconciliations: Vec<ReconciliationCard>,
    pub totals: ReconciliationTotals,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<ReconciliationDetail>,
    pub sources: Vec<SourceReport>,
}

/// Build the page view from an already loaded list.
pub fn build_view(
    query: &ReconciliationQuery,
    reconciliations: &[Reconciliation],
    sources: Vec<SourceReport>,
) -> ReconciliationsView {
    let state = query.view_state();
    let shown: Vec<&Reconciliation> = filter_reconciliations(reconciliations, &query.filter())
        .into_iter()
        .filter(|r| match state.active_tab {
            ReconciliationTab::Open => r.status != ReconciliationStatus::Completed,
            ReconciliationTab::All => true,
        })
        .collect();

    let totals = ReconciliationTotals {
        count: shown.len(),
        disputed: shown
            .iter()
            .filter(|r| r.status == ReconciliationStatus::Disputed)
            .count(),
        total_difference: format_currency(checked_total(shown.iter().map(|r| r.difference))),
    };

    let detail = match (state.modal, &state.editing) {
        (Some(ReconciliationModal::Detail), Some(id)) => reconciliations
            .iter()
            .find(|r| &r.id == id)
            .map(ReconciliationDetail::from),
        _ => None,
    };

    ReconciliationsView {
        reconciliations: shown.into_iter().map(ReconciliationCard::from).collect(),
        totals,
        detail,
        state,
        sources,
    }
}

pub async fn load(ctx: &PageContext, query: &ReconciliationQuery) -> ReconciliationsView {
    let loaded = ctx
        .fetch
        .get_list(
            "/api/supplier-reconciliations",
            Some("reconciliations"),
            fixtures::reconciliations(),
        )
        .await;
    let sources = vec![SourceReport::of("reconciliations", &loaded)];
    build_view(query, &loaded.into_value(), sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn card_keeps_reported_difference_and_flags_mismatch() {
        let mut rec = fixtures::reconciliations().remove(0);
        rec.difference = dec!(999);
        let card = ReconciliationCard::from(&rec);
        assert_eq!(card.difference, "$999");
        assert!(card.difference_inconsistent);
        assert_eq!(card.supplier_balance, "$48,250");
    }

    #[test]
    fn detail_modal_expands_the_edited_reconciliation() {
        let query = ReconciliationQuery {
            modal: Some(ReconciliationModal::Detail),
            editing: Some("rec-2".into()),
            ..Default::default()
        };
        let view = build_view(&query, &fixtures::reconciliations(), Vec::new());
        let detail = view.detail.unwrap();
        assert_eq!(detail.card.supplier_code, "SUP-014");
        assert_eq!(detail.items.len(), 1);
        assert_eq!(detail.items[0].status_class, "bg-red-100 text-red-800");
    }

    #[test]
    fn status_filter_and_totals() {
        let query = ReconciliationQuery {
            status: Some(ReconciliationStatus::Disputed),
            ..Default::default()
        };
        let view = build_view(&query, &fixtures::reconciliations(), Vec::new());
        assert_eq!(view.totals.count, 1);
        assert_eq!(view.totals.disputed, 1);
        assert_eq!(view.totals.total_difference, "-$600");
        assert!(view.detail.is_none());
    }
}
