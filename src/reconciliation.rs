//! Supplier reconciliation item matching
//!
//! Toggling and disputing act on exactly one line of exactly one
//! reconciliation. The counterpart referenced by `matched_with` is left
//! alone, as are sibling lines and other reconciliations.

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::domain::{
    MatchStatus, Reconciliation, ReconciliationFilter, ReconciliationItem, RecordId,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("reconciliation {0} not found")]
    ReconciliationNotFound(RecordId),

    #[error("item {item} not found in reconciliation {reconciliation}")]
    ItemNotFound {
        reconciliation: RecordId,
        item: RecordId,
    },
}

fn find_item<'a>(
    reconciliations: &'a mut [Reconciliation],
    reconciliation_id: &RecordId,
    item_id: &RecordId,
) -> Result<&'a mut ReconciliationItem, ReconcileError> {
    let rec = reconciliations
        .iter_mut()
        .find(|r| &r.id == reconciliation_id)
        .ok_or_else(|| ReconcileError::ReconciliationNotFound(reconciliation_id.clone()))?;

    rec.items
        .iter_mut()
        .find(|i| &i.id == item_id)
        .ok_or_else(|| ReconcileError::ItemNotFound {
            reconciliation: reconciliation_id.clone(),
            item: item_id.clone(),
        })
}

/// Flip a line between matched and unmatched. A disputed line becomes matched.
pub fn toggle_item_match<'a>(
    reconciliations: &'a mut [Reconciliation],
    reconciliation_id: &RecordId,
    item_id: &RecordId,
) -> Result<&'a ReconciliationItem, ReconcileError> {
    let item = find_item(reconciliations, reconciliation_id, item_id)?;
    item.status = match item.status {
        MatchStatus::Matched => {
            item.matched_with = None;
            MatchStatus::Unmatched
        }
        MatchStatus::Unmatched | MatchStatus::Disputed => MatchStatus::Matched,
    };
    Ok(item)
}

/// Mark a line as disputed with the supplier.
pub fn dispute_item<'a>(
    reconciliations: &'a mut [Reconciliation],
    reconciliation_id: &RecordId,
    item_id: &RecordId,
) -> Result<&'a ReconciliationItem, ReconcileError> {
    let item = find_item(reconciliations, reconciliation_id, item_id)?;
    item.status = MatchStatus::Disputed;
    item.matched_with = None;
    Ok(item)
}

/// Counts and totals of a reconciliation's lines by match state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummary {
    pub matched: usize,
    pub unmatched: usize,
    pub disputed: usize,
    pub unmatched_amount: Decimal,
    pub disputed_amount: Decimal,
}

impl MatchSummary {
    pub fn of(rec: &Reconciliation) -> Self {
        rec.items.iter().fold(Self::default(), |mut s, item| {
            match item.status {
                MatchStatus::Matched => s.matched += 1,
                MatchStatus::Unmatched => {
                    s.unmatched += 1;
                    s.unmatched_amount = s.unmatched_amount.saturating_add(item.amount);
                }
                MatchStatus::Disputed => {
                    s.disputed += 1;
                    s.disputed_amount = s.disputed_amount.saturating_add(item.amount);
                }
            }
            s
        })
    }
}

/// Apply a status filter and a case-insensitive supplier search.
pub fn filter_reconciliations<'a>(
    reconciliations: &'a [Reconciliation],
    filter: &ReconciliationFilter,
) -> Vec<&'a Reconciliation> {
    let needle = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    reconciliations
        .iter()
        .filter(|r| filter.status.map_or(true, |s| r.status == s))
        .filter(|r| {
            needle.as_ref().map_or(true, |n| {
                r.supplier_name.to_lowercase().contains(n)
                    || r.supplier_code.to_lowercase().contains(n)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ReconciliationStatus;
    use crate::services::fixtures;

    fn id(s: &str) -> RecordId {
        RecordId::new(s)
    }

    #[test]
    fn toggle_touches_only_the_target_item() {
        let mut recs = fixtures::reconciliations();
        let before = recs.clone();

        let item = toggle_item_match(&mut recs, &id("rec-1"), &id("item-3")).unwrap();
        assert_eq!(item.status, MatchStatus::Matched);

        // siblings in the same reconciliation are unchanged
        assert_eq!(recs[0].items[0], before[0].items[0]);
        assert_eq!(recs[0].items[1], before[0].items[1]);
        // same item id in another reconciliation is unchanged
        assert_eq!(recs[1], before[1]);
    }

    #[test]
    fn toggling_a_matched_item_unmatches_it_but_not_its_counterpart() {
        let mut recs = fixtures::reconciliations();

        let item = toggle_item_match(&mut recs, &id("rec-1"), &id("item-1")).unwrap();
        assert_eq!(item.status, MatchStatus::Unmatched);
        assert_eq!(item.matched_with, None);

        let counterpart = recs[0].item(&id("item-2")).unwrap();
        assert_eq!(counterpart.status, MatchStatus::Matched);
        assert_eq!(counterpart.matched_with, Some(id("item-1")));
    }

    #[test]
    fn toggle_twice_restores_original_state() {
        let mut recs = fixtures::reconciliations();
        toggle_item_match(&mut recs, &id("rec-1"), &id("item-3")).unwrap();
        let item = toggle_item_match(&mut recs, &id("rec-1"), &id("item-3")).unwrap();
        assert_eq!(item.status, MatchStatus::Unmatched);
    }

    #[test]
    fn disputed_item_toggles_to_matched() {
        let mut recs = fixtures::reconciliations();
        let item = toggle_item_match(&mut recs, &id("rec-2"), &id("item-1")).unwrap();
        assert_eq!(item.status, MatchStatus::Matched);
        assert_eq!(recs[1].items[0].status, MatchStatus::Matched);
    }

    #[test]
    fn dispute_marks_only_the_target() {
        let mut recs = fixtures::reconciliations();
        let before = recs.clone();
        dispute_item(&mut recs, &id("rec-1"), &id("item-1")).unwrap();

        assert_eq!(recs[0].items[0].status, MatchStatus::Disputed);
        assert_eq!(recs[0].items[1], before[0].items[1]);
        assert_eq!(recs[0].items[2], before[0].items[2]);
        assert_eq!(recs[1], before[1]);
    }

    #[test]
    fn unknown_ids_are_reported() {
        let mut recs = fixtures::reconciliations();
        assert_eq!(
            toggle_item_match(&mut recs, &id("rec-9"), &id("item-1")).unwrap_err(),
            ReconcileError::ReconciliationNotFound(id("rec-9"))
        );
        assert!(matches!(
            dispute_item(&mut recs, &id("rec-1"), &id("item-9")).unwrap_err(),
            ReconcileError::ItemNotFound { .. }
        ));
    }

    #[test]
    fn summary_counts_lines_by_state() {
        let recs = fixtures::reconciliations();
        let summary = MatchSummary::of(&recs[0]);
        assert_eq!(summary.matched, 2);
        assert_eq!(summary.unmatched, 1);
        assert_eq!(summary.disputed, 0);
        assert_eq!(summary.unmatched_amount, Decimal::new(250000, 2));
    }

    #[test]
    fn filter_by_status_and_search() {
        let recs = fixtures::reconciliations();
        let disputed = filter_reconciliations(
            &recs,
            &ReconciliationFilter {
                status: Some(ReconciliationStatus::Disputed),
                search: None,
            },
        );
        assert_eq!(disputed.len(), 1);
        assert_eq!(disputed[0].supplier_code, "SUP-014");

        let searched = filter_reconciliations(
            &recs,
            &ReconciliationFilter {
                status: None,
                search: Some(" acme ".into()),
            },
        );
        assert_eq!(searched.len(), 1);
    }
}
