//! Findings and the smaller audit resource families
//!
//! These records are mostly passed through to the browser shell; the
//! gateway only validates findings before submission.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::common::{RecordId, RiskLevel};

/// Finding severity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// Finding resolution status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FindingStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
}

impl FindingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
        }
    }
}

/// Audit finding
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub id: RecordId,
    #[serde(default)]
    pub engagement_id: Option<RecordId>,
    pub title: String,
    pub severity: Severity,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub impact: Option<String>,
    #[serde(default)]
    pub recommendation: Option<String>,
    #[serde(default)]
    pub status: FindingStatus,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

/// Finding form payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindingInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engagement_id: Option<RecordId>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    #[serde(default)]
    pub status: FindingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

/// Query filter for findings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindingFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engagement_id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<FindingStatus>,
}

/// Query filter for records that hang off one engagement
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementScope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engagement_id: Option<RecordId>,
}

impl EngagementScope {
    pub fn of(engagement_id: &RecordId) -> Self {
        Self {
            engagement_id: Some(engagement_id.clone()),
        }
    }
}

/// Risk assessment for an account area
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub id: RecordId,
    pub engagement_id: RecordId,
    pub area: String,
    #[serde(default)]
    pub inherent_risk: RiskLevel,
    #[serde(default)]
    pub control_risk: RiskLevel,
    #[serde(default)]
    pub detection_risk: RiskLevel,
    #[serde(default)]
    pub response: Option<String>,
}

/// Scheduled audit activity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditSchedule {
    pub id: RecordId,
    pub engagement_id: RecordId,
    pub activity: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// External confirmation request (bank, receivable, payable)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Confirmation {
    pub id: RecordId,
    pub engagement_id: RecordId,
    pub confirmation_type: String,
    pub counterparty: String,
    #[serde(default)]
    pub balance_per_books: Option<Decimal>,
    #[serde(default)]
    pub balance_confirmed: Option<Decimal>,
    #[serde(default)]
    pub sent_date: Option<NaiveDate>,
    #[serde(default)]
    pub received_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Sampling plan for a population
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplingPlan {
    pub id: RecordId,
    pub engagement_id: RecordId,
    #[serde(default)]
    pub workpaper_id: Option<RecordId>,
    pub method: String,
    #[serde(default)]
    pub population_size: Option<u64>,
    #[serde(default)]
    pub population_value: Option<Decimal>,
    #[serde(default)]
    pub sample_size: Option<u32>,
    #[serde(default)]
    pub confidence_level: Option<f64>,
}

/// Time booked against an engagement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    pub id: RecordId,
    pub engagement_id: RecordId,
    pub staff_name: String,
    pub date: NaiveDate,
    pub hours: Decimal,
    #[serde(default)]
    pub description: Option<String>,
}

/// Independence declaration by a team member
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndependenceRecord {
    pub id: RecordId,
    pub engagement_id: RecordId,
    pub staff_name: String,
    #[serde(default)]
    pub declared_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_independent: bool,
    #[serde(default)]
    pub threats: Option<String>,
}

/// Document attached to an engagement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditDocument {
    pub id: RecordId,
    pub engagement_id: RecordId,
    pub filename: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub uploaded_by: Option<String>,
    #[serde(default)]
    pub uploaded_at: Option<NaiveDate>,
}

/// Headline numbers for the audit dashboard
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuditDashboardSummary {
    #[serde(default)]
    pub total_engagements: u32,
    #[serde(default)]
    pub active_engagements: u32,
    #[serde(default)]
    pub completed_engagements: u32,
    #[serde(default)]
    pub open_findings: u32,
    #[serde(default)]
    pub high_risk_engagements: u32,
    #[serde(default)]
    pub workpapers_pending_review: u32,
    #[serde(default)]
    pub hours_this_month: Decimal,
}
