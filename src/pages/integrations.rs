//! Third-party integrations console

use serde::{Deserialize, Serialize};

use super::{PageContext, SourceReport, ViewQuery, ViewState};
use crate::domain::{Integration, IntegrationStatus, RecordId};
use crate::format::{format_datetime, status_color};
use crate::services::fixtures;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationsTab {
    #[default]
    Installed,
    Available,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationsModal {
    Configure,
    Disconnect,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationsQuery {
    pub tab: Option<IntegrationsTab>,
    pub modal: Option<IntegrationsModal>,
    pub editing: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationRow {
    pub id: RecordId,
    pub name: String,
    pub provider: String,
    pub category: String,
    pub status: IntegrationStatus,
    pub status_class: &'static str,
    pub last_sync: String,
    pub records_synced: u64,
}

impl From<&Integration> for IntegrationRow {
    fn from(i: &Integration) -> Self {
        Self {
            id: i.id.clone(),
            name: i.name.clone(),
            provider: i.provider.clone(),
            category: i.category.clone().unwrap_or_default(),
            status: i.status,
            status_class: status_color(i.status.as_str()),
            last_sync: format_datetime(i.last_sync),
            records_synced: i.records_synced,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub connected: usize,
    pub disconnected: usize,
    pub error: usize,
    pub pending: usize,
}

impl StatusCounts {
    pub fn of(integrations: &[Integration]) -> Self {
        integrations.iter().fold(Self::default(), |mut c, i| {
            match i.status {
                IntegrationStatus::Connected => c.connected += 1,
                IntegrationStatus::Disconnected => c.disconnected += 1,
                IntegrationStatus::Error => c.error += 1,
                IntegrationStatus::Pending => c.pending += 1,
            }
            c
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationsView {
    pub state: ViewState<IntegrationsTab, IntegrationsModal>,
    pub counts: StatusCounts,
    pub integrations: Vec<IntegrationRow>,
    pub sources: Vec<SourceReport>,
}

pub async fn load(ctx: &PageContext, query: &IntegrationsQuery) -> IntegrationsView {
    let state = ViewQuery {
        tab: query.tab,
        modal: query.modal,
        editing: query.editing.clone(),
    }
    .restore();

    let loaded = ctx
        .fetch
        .get_list("/api/integrations", Some("integrations"), fixtures::integrations())
        .await;
    let sources = vec![SourceReport::of("integrations", &loaded)];
    let integrations = loaded.into_value();

    let category = query.category.as_deref().filter(|c| !c.is_empty());
    let rows = integrations
        .iter()
        .filter(|i| match state.active_tab {
            IntegrationsTab::Installed => i.status != IntegrationStatus::Disconnected,
            IntegrationsTab::Available => i.status == IntegrationStatus::Disconnected,
        })
        .filter(|i| {
            category.map_or(true, |c| {
                i.category.as_deref().is_some_and(|own| own.eq_ignore_ascii_case(c))
            })
        })
        .map(IntegrationRow::from)
        .collect();

    IntegrationsView {
        counts: StatusCounts::of(&integrations),
        integrations: rows,
        state,
        sources,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_every_status() {
        let counts = StatusCounts::of(&fixtures::integrations());
        assert_eq!(
            counts,
            StatusCounts {
                connected: 1,
                disconnected: 1,
                error: 1,
                pending: 0,
            }
        );
    }

    #[test]
    fn never_synced_integration_has_blank_timestamp() {
        let integrations = fixtures::integrations();
        let row = IntegrationRow::from(&integrations[2]);
        assert_eq!(row.last_sync, "");
        assert_eq!(row.status_class, "bg-gray-100 text-gray-800");
    }
}
