//! Supplier reconciliation domain types

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::common::RecordId;

/// Reconciliation workflow status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ReconciliationStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Disputed,
}

impl ReconciliationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Disputed => "disputed",
        }
    }
}

/// Kind of line being reconciled
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Invoice,
    Payment,
    CreditNote,
    Adjustment,
}

/// Match state of a reconciliation line
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Matched,
    #[default]
    Unmatched,
    Disputed,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Matched => "matched",
            Self::Unmatched => "unmatched",
            Self::Disputed => "disputed",
        }
    }
}

/// One invoice, payment or adjustment line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationItem {
    pub id: RecordId,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    pub amount: Decimal,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: MatchStatus,
    /// Id of the counterpart line in the same reconciliation
    #[serde(default)]
    pub matched_with: Option<RecordId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub filename: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default, rename = "type")]
    pub content_type: String,
}

/// Reconciliation of one supplier statement against internal ledgers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reconciliation {
    pub id: RecordId,
    pub supplier_name: String,
    pub supplier_code: String,
    pub period: String,
    #[serde(default)]
    pub status: ReconciliationStatus,
    pub supplier_balance: Decimal,
    pub internal_balance: Decimal,
    /// As reported by the back office; not recomputed
    pub difference: Decimal,
    #[serde(default)]
    pub items: Vec<ReconciliationItem>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl Reconciliation {
    /// Supplier balance minus internal balance, if representable.
    pub fn derived_difference(&self) -> Option<Decimal> {
        self.supplier_balance.checked_sub(self.internal_balance)
    }

    /// Whether the reported difference disagrees with the two balances.
    pub fn difference_is_inconsistent(&self) -> bool {
        self.derived_difference() != Some(self.difference)
    }

    pub fn item(&self, item_id: &RecordId) -> Option<&ReconciliationItem> {
        self.items.iter().find(|i| &i.id == item_id)
    }
}

/// Reconciliation form payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationInput {
    #[serde(default)]
    pub supplier_name: String,
    #[serde(default)]
    pub supplier_code: String,
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub supplier_balance: Option<Decimal>,
    #[serde(default)]
    pub internal_balance: Option<Decimal>,
}

/// Query filter for the reconciliation list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ReconciliationStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}
