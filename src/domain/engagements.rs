//! Audit engagement domain types

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::common::{RecordId, RiskLevel};

/// Kind of assignment performed for the client
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EngagementType {
    FinancialAudit,
    Review,
    Compilation,
    AgreedUponProcedures,
    TaxAudit,
    InternalAudit,
}

impl Default for EngagementType {
    fn default() -> Self {
        Self::FinancialAudit
    }
}

impl EngagementType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::FinancialAudit => "Financial Audit",
            Self::Review => "Review",
            Self::Compilation => "Compilation",
            Self::AgreedUponProcedures => "Agreed-Upon Procedures",
            Self::TaxAudit => "Tax Audit",
            Self::InternalAudit => "Internal Audit",
        }
    }
}

/// Engagement lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EngagementStatus {
    Planning,
    Fieldwork,
    Review,
    Completed,
    OnHold,
}

impl Default for EngagementStatus {
    fn default() -> Self {
        Self::Planning
    }
}

impl EngagementStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::Fieldwork => "fieldwork",
            Self::Review => "review",
            Self::Completed => "completed",
            Self::OnHold => "on_hold",
        }
    }
}

/// Engagement entity as returned by the back office
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Engagement {
    pub id: RecordId,
    pub name: String,
    pub client_name: String,
    #[serde(alias = "type")]
    pub engagement_type: EngagementType,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    #[serde(default)]
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub materiality_threshold: Option<Decimal>,
    #[serde(default)]
    pub tolerable_misstatement: Option<Decimal>,
    #[serde(default)]
    pub partner_name: Option<String>,
    #[serde(default)]
    pub manager_name: Option<String>,
    #[serde(default)]
    pub planning_date: Option<NaiveDate>,
    #[serde(default)]
    pub fieldwork_date: Option<NaiveDate>,
    #[serde(default)]
    pub review_date: Option<NaiveDate>,
    #[serde(default)]
    pub completion_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: EngagementStatus,
    #[serde(default)]
    pub progress: u8,
}

/// Engagement form payload, used for both create and edit
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub client_name: String,
    #[serde(default, alias = "type")]
    pub engagement_type: Option<EngagementType>,
    #[serde(default)]
    pub period_start: Option<NaiveDate>,
    #[serde(default)]
    pub period_end: Option<NaiveDate>,
    #[serde(default)]
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub materiality_threshold: Option<Decimal>,
    #[serde(default)]
    pub tolerable_misstatement: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planning_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fieldwork_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: EngagementStatus,
    #[serde(default)]
    pub progress: u8,
}

impl From<&Engagement> for EngagementInput {
    fn from(e: &Engagement) -> Self {
        Self {
            name: e.name.clone(),
            client_name: e.client_name.clone(),
            engagement_type: Some(e.engagement_type),
            period_start: Some(e.period_start),
            period_end: Some(e.period_end),
            risk_level: e.risk_level,
            materiality_threshold: e.materiality_threshold,
            tolerable_misstatement: e.tolerable_misstatement,
            partner_name: e.partner_name.clone(),
            manager_name: e.manager_name.clone(),
            planning_date: e.planning_date,
            fieldwork_date: e.fieldwork_date,
            review_date: e.review_date,
            completion_date: e.completion_date,
            status: e.status,
            progress: e.progress,
        }
    }
}

/// Query filter for listing engagements
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<EngagementStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<RiskLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}
