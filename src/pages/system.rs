//! System management: legal entities and subsystem health

use serde::{Deserialize, Serialize};

use super::{PageContext, SourceReport, ViewQuery, ViewState};
use crate::domain::{ServiceStatus, SystemEntity};
use crate::format::status_color;
use crate::services::fixtures;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemTab {
    #[default]
    Entities,
    Services,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemModal {
    EntityForm,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemQuery {
    pub tab: Option<SystemTab>,
    pub modal: Option<SystemModal>,
    pub editing: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRow {
    pub name: String,
    pub status: String,
    pub status_class: &'static str,
    pub latency: String,
}

impl From<&ServiceStatus> for ServiceRow {
    fn from(s: &ServiceStatus) -> Self {
        let key = match s.status.as_str() {
            "up" | "ok" | "healthy" => "active",
            "down" | "unhealthy" => "error",
            other => other,
        };
        Self {
            name: s.name.clone(),
            status: s.status.clone(),
            status_class: status_color(key),
            latency: s
                .latency_ms
                .map(|ms| format!("{ms} ms"))
                .unwrap_or_else(|| "--".to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemView {
    pub state: ViewState<SystemTab, SystemModal>,
    pub entities: Vec<SystemEntity>,
    pub services: Vec<ServiceRow>,
    pub sources: Vec<SourceReport>,
}

pub async fn load(ctx: &PageContext, query: &SystemQuery) -> SystemView {
    let (entities, services) = futures::join!(
        ctx.fetch
            .get_list("/api/entities", Some("entities"), fixtures::entities()),
        ctx.fetch.get_list(
            "/api/system/status",
            Some("services"),
            fixtures::service_statuses()
        ),
    );
    let sources = vec![
        SourceReport::of("entities", &entities),
        SourceReport::of("services", &services),
    ];

    SystemView {
        state: ViewQuery {
            tab: query.tab,
            modal: query.modal,
            editing: query.editing.clone(),
        }
        .restore(),
        entities: entities
            .into_value()
            .into_iter()
            .filter(|e| query.include_inactive || e.is_active)
            .collect(),
        services: services.into_value().iter().map(ServiceRow::from).collect(),
        sources,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_health_words_map_to_badges() {
        let up = ServiceRow::from(&ServiceStatus {
            name: "api".into(),
            status: "up".into(),
            latency_ms: Some(42),
        });
        assert_eq!(up.status_class, "bg-green-100 text-green-800");
        assert_eq!(up.latency, "42 ms");

        let unknown = ServiceRow::from(&fixtures::service_statuses()[0]);
        assert_eq!(unknown.status_class, "bg-gray-100 text-gray-800");
        assert_eq!(unknown.latency, "--");
    }
}
