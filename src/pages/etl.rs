//! ETL pipeline monitor

use serde::{Deserialize, Serialize};

use super::{PageContext, SourceReport, ViewQuery, ViewState};
use crate::domain::{EtlPipeline, PipelineStatus, RecordId};
use crate::format::{format_datetime, format_percent, status_color};
use crate::services::fixtures;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EtlTab {
    #[default]
    Overview,
    Pipelines,
    Failures,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EtlModal {
    RunDetails,
    Schedule,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EtlQuery {
    pub tab: Option<EtlTab>,
    pub modal: Option<EtlModal>,
    pub editing: Option<String>,
    pub status: Option<PipelineStatus>,
}

impl EtlQuery {
    pub fn view_state(&self) -> ViewState<EtlTab, EtlModal> {
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
pub struct PipelineRow {
    pub id: RecordId,
    pub name: String,
    pub route: String,
    pub status: PipelineStatus,
    pub status_class: &'static str,
    pub last_run: String,
    pub records_processed: u64,
    pub records_failed: u64,
    pub success_rate: String,
    pub schedule: Option<String>,
}

impl From<&EtlPipeline> for PipelineRow {
    fn from(p: &EtlPipeline) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            route: format!("{} → {}", p.source, p.target),
            status: p.status,
            status_class: status_color(p.status.as_str()),
            last_run: format_datetime(p.last_run),
            records_processed: p.records_processed,
            records_failed: p.records_failed,
            success_rate: p
                .success_rate()
                .map(format_percent)
                .unwrap_or_else(|| "--".to_string()),
            schedule: p.schedule.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EtlTotals {
    pub pipelines: usize,
    pub running: usize,
    pub failed: usize,
    pub records_processed: u64,
    pub records_failed: u64,
}

impl EtlTotals {
    pub fn of(pipelines: &[EtlPipeline]) -> Self {
        pipelines.iter().fold(
            Self {
                pipelines: pipelines.len(),
                ..Self::default()
            },
            |mut t, p| {
                match p.status {
                    PipelineStatus::Running => t.running += 1,
                    PipelineStatus::Failed => t.failed += 1,
                    _ => {}
                }
                t.records_processed = t.records_processed.saturating_add(p.records_processed);
                t.records_failed = t.records_failed.saturating_add(p.records_failed);
                t
            },
        )
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EtlView {
    pub state: ViewState<EtlTab, EtlModal>,
    pub totals: EtlTotals,
    pub pipelines: Vec<PipelineRow>,
    pub sources: Vec<SourceReport>,
}

pub async fn load(ctx: &PageContext, query: &EtlQuery) -> EtlView {
    let state = query.view_state();
    let loaded = ctx
        .fetch
        .get_list("/api/etl/pipelines", Some("pipelines"), fixtures::pipelines())
        .await;
    let sources = vec![SourceReport::of("pipelines", &loaded)];
    let pipelines = loaded.into_value();

    let shown: Vec<PipelineRow> = pipelines
        .iter()
        .filter(|p| match state.active_tab {
            EtlTab::Failures => p.status == PipelineStatus::Failed || p.records_failed > 0,
            _ => true,
        })
        .filter(|p| query.status.map_or(true, |s| p.status == s))
        .map(PipelineRow::from)
        .collect();

    EtlView {
        totals: EtlTotals::of(&pipelines),
        pipelines: shown,
        state,
        sources,
    }
}
