//! Audit workspace: dashboard, engagements, workpapers and findings
//!
//! All four panels are fetched concurrently. Each one falls back on its
//! own, so a failing findings endpoint does not blank the engagement list.

use serde::{Deserialize, Serialize};

use super::{PageContext, SourceReport, ViewQuery, ViewState};
use crate::domain::{
    AuditDashboardSummary, Engagement, EngagementInput, EngagementStatus, Finding, RecordId,
    RiskLevel, Workpaper,
};
use crate::format::{
    format_currency, format_date, priority_color, risk_color, severity_color, status_color,
};
use crate::services::fixtures;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditTab {
    #[default]
    Dashboard,
    Engagements,
    Workpapers,
    Findings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditModal {
    EngagementForm,
    WorkpaperForm,
    FindingForm,
    DeleteConfirm,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditQuery {
    pub tab: Option<AuditTab>,
    pub modal: Option<AuditModal>,
    pub editing: Option<String>,
    pub engagement_id: Option<String>,
    pub status: Option<EngagementStatus>,
    pub search: Option<String>,
}

impl AuditQuery {
    pub fn view_state(&self) -> ViewState<AuditTab, AuditModal> {
        ViewQuery {
            tab: self.tab,
            modal: self.modal,
            editing: self.editing.clone(),
        }
        .restore()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementRow {
    pub id: RecordId,
    pub name: String,
    pub client_name: String,
    pub engagement_type: &'static str,
    pub period: String,
    pub status: EngagementStatus,
    pub status_class: &'static str,
    pub risk_level: RiskLevel,
    pub risk_class: &'static str,
    pub materiality: String,
    pub tolerable_misstatement: String,
    pub partner_name: String,
    pub progress: u8,
}

impl From<&Engagement> for EngagementRow {
    fn from(e: &Engagement) -> Self {
        Self {
            id: e.id.clone(),
            name: e.name.clone(),
            client_name: e.client_name.clone(),
            engagement_type: e.engagement_type.label(),
            period: format!(
                "{} - {}",
                format_date(Some(e.period_start)),
                format_date(Some(e.period_end))
            ),
            status: e.status,
            status_class: status_color(e.status.as_str()),
            risk_level: e.risk_level,
            risk_class: risk_color(e.risk_level.as_str()),
            materiality: format_currency(e.materiality_threshold),
            tolerable_misstatement: format_currency(e.tolerable_misstatement),
            partner_name: e.partner_name.clone().unwrap_or_default(),
            progress: e.progress.min(100),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkpaperRow {
    pub id: RecordId,
    pub engagement_id: RecordId,
    pub workpaper_number: String,
    pub title: String,
    pub account: String,
    pub assertion: &'static str,
    pub status_class: &'static str,
    pub priority_class: &'static str,
    pub risk_class: &'static str,
    pub materiality: String,
    pub assigned_to: String,
    pub due_date: String,
}

impl From<&Workpaper> for WorkpaperRow {
    fn from(w: &Workpaper) -> Self {
        let account = match &w.account_name {
            Some(name) => format!("{} {}", w.account_code, name),
            None => w.account_code.clone(),
        };
        Self {
            id: w.id.clone(),
            engagement_id: w.engagement_id.clone(),
            workpaper_number: w.workpaper_number.clone(),
            title: w.title.clone(),
            account,
            assertion: w.assertion.label(),
            status_class: status_color(w.status.as_str()),
            priority_class: priority_color(w.priority.as_str()),
            risk_class: risk_color(w.risk_level.as_str()),
            materiality: format_currency(w.materiality),
            assigned_to: w.assigned_to.clone().unwrap_or_default(),
            due_date: format_date(w.due_date),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FindingRow {
    pub id: RecordId,
    pub title: String,
    pub severity_class: &'static str,
    pub status_class: &'static str,
    pub category: String,
    pub description: String,
    pub due_date: String,
}

impl From<&Finding> for FindingRow {
    fn from(f: &Finding) -> Self {
        Self {
            id: f.id.clone(),
            title: f.title.clone(),
            severity_class: severity_color(f.severity.as_str()),
            status_class: status_color(f.status.as_str()),
            category: f.category.clone().unwrap_or_default(),
            description: f.description.clone(),
            due_date: format_date(f.due_date),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditView {
    pub state: ViewState<AuditTab, AuditModal>,
    pub summary: AuditDashboardSummary,
    pub engagements: Vec<EngagementRow>,
    pub workpapers: Vec<WorkpaperRow>,
    pub findings: Vec<FindingRow>,
    /// Pre-filled form values when the engagement modal edits a record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engagement_form: Option<EngagementInput>,
    pub sources: Vec<SourceReport>,
}

fn matches_search(e: &Engagement, needle: Option<&str>) -> bool {
    needle.map_or(true, |n| {
        e.name.to_lowercase().contains(n) || e.client_name.to_lowercase().contains(n)
    })
}

pub async fn load(ctx: &PageContext, query: &AuditQuery) -> AuditView {
    let state = query.view_state();

    let (summary, engagements, workpapers, findings) = futures::join!(
        ctx.fetch
            .get("/api/audit/dashboard", None, fixtures::dashboard_summary()),
        ctx.fetch
            .get_list("/api/audit/engagements", Some("data"), fixtures::engagements()),
        ctx.fetch
            .get_list("/api/audit/workpapers", Some("data"), fixtures::workpapers()),
        ctx.fetch
            .get_list("/api/audit/findings", Some("data"), fixtures::findings()),
    );

    let sources = vec![
        SourceReport::of("summary", &summary),
        SourceReport::of("engagements", &engagements),
        SourceReport::of("workpapers", &workpapers),
        SourceReport::of("findings", &findings),
    ];

    let engagements = engagements.into_value();
    let needle = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let engagement_form = match (state.modal, &state.editing) {
        (Some(AuditModal::EngagementForm), Some(id)) => engagements
            .iter()
            .find(|e| &e.id == id)
            .map(EngagementInput::from),
        _ => None,
    };

    let engagement_rows = engagements
        .iter()
        .filter(|e| query.status.map_or(true, |s| e.status == s))
        .filter(|e| matches_search(e, needle.as_deref()))
        .map(EngagementRow::from)
        .collect();

    let scope = query.engagement_id.as_deref().filter(|s| !s.is_empty());
    let workpaper_rows = workpapers
        .into_value()
        .iter()
        .filter(|w| scope.map_or(true, |id| w.engagement_id == *id))
        .map(WorkpaperRow::from)
        .collect();
    let finding_rows = findings
        .into_value()
        .iter()
        .filter(|f| {
            scope.map_or(true, |id| {
                f.engagement_id.as_ref().is_some_and(|e| *e == *id)
            })
        })
        .map(FindingRow::from)
        .collect();

    AuditView {
        state,
        summary: summary.into_value(),
        engagements: engagement_rows,
        workpapers: workpaper_rows,
        findings: finding_rows,
        engagement_form,
        sources,
    }
}
