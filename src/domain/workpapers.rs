//! Workpaper domain types
//!
//! A workpaper documents the procedures performed against one account and
//! one financial-statement assertion within an engagement.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::common::{Priority, RecordId, RiskLevel};

/// Financial-statement assertion tested by a workpaper
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Assertion {
    Existence,
    Completeness,
    Accuracy,
    Valuation,
    RightsObligations,
    PresentationDisclosure,
    Cutoff,
    Classification,
}

impl Assertion {
    pub const ALL: [Assertion; 8] = [
        Self::Existence,
        Self::Completeness,
        Self::Accuracy,
        Self::Valuation,
        Self::RightsObligations,
        Self::PresentationDisclosure,
        Self::Cutoff,
        Self::Classification,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Existence => "Existence",
            Self::Completeness => "Completeness",
            Self::Accuracy => "Accuracy",
            Self::Valuation => "Valuation",
            Self::RightsObligations => "Rights & Obligations",
            Self::PresentationDisclosure => "Presentation & Disclosure",
            Self::Cutoff => "Cutoff",
            Self::Classification => "Classification",
        }
    }
}

impl Default for Assertion {
    fn default() -> Self {
        Self::Existence
    }
}

/// Workpaper progress status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WorkpaperStatus {
    NotStarted,
    InProgress,
    Completed,
    Review,
}

impl Default for WorkpaperStatus {
    fn default() -> Self {
        Self::NotStarted
    }
}

impl WorkpaperStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Review => "review",
        }
    }
}

/// Workpaper entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workpaper {
    pub id: RecordId,
    pub engagement_id: RecordId,
    pub title: String,
    pub workpaper_number: String,
    pub account_code: String,
    #[serde(default)]
    pub account_name: Option<String>,
    #[serde(default)]
    pub assertion: Assertion,
    #[serde(default)]
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub materiality: Option<Decimal>,
    #[serde(default)]
    pub sample_size: Option<u32>,
    #[serde(default)]
    pub work_performed: Option<String>,
    #[serde(default)]
    pub findings: Option<String>,
    #[serde(default)]
    pub conclusions: Option<String>,
    #[serde(default)]
    pub recommendations: Option<String>,
    #[serde(default)]
    pub status: WorkpaperStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub reviewer: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub completed_date: Option<NaiveDate>,
    #[serde(default)]
    pub reviewed_date: Option<NaiveDate>,
}

/// Workpaper form payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkpaperInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engagement_id: Option<RecordId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub workpaper_number: String,
    #[serde(default)]
    pub account_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,
    #[serde(default)]
    pub assertion: Assertion,
    #[serde(default)]
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub materiality: Option<Decimal>,
    /// Signed so that a negative entry reaches validation instead of failing to parse
    #[serde(default)]
    pub sample_size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_performed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub findings: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conclusions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<String>,
    #[serde(default)]
    pub status: WorkpaperStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_date: Option<NaiveDate>,
}

/// Query filter for listing workpapers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkpaperFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engagement_id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<WorkpaperStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assertion: Option<Assertion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
}
