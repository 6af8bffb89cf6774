//! Resilient fetch facade
//!
//! Page loaders call the back office through [`ResilientFetch`], which
//! never fails: on a network error, a non-2xx status, or a payload that
//! does not decode, it logs and hands back the declared fallback. The
//! outcome is reported as a [`Loaded`] so a page can still tell live data
//! from a placeholder.

use reqwest::Method;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use super::transport::{CallContext, Transport, UpstreamRequest};
use crate::error::ServiceError;

/// Outcome of a page-level load
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded<T> {
    /// Decoded from a successful response
    Fresh(T),
    /// The back office answered with an empty collection
    Empty,
    /// The call failed; `value` is the declared fallback
    Fallback { value: T, reason: String },
}

/// Wire form of [`Loaded`]'s variant, reported alongside page data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    Fresh,
    Empty,
    Fallback,
}

impl<T> Loaded<T> {
    pub fn state(&self) -> LoadState {
        match self {
            Self::Fresh(_) => LoadState::Fresh,
            Self::Empty => LoadState::Empty,
            Self::Fallback { .. } => LoadState::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Fallback { reason, .. } => Some(reason),
            _ => None,
        }
    }

}

impl<T: Default> Loaded<T> {
    /// The usable value, whichever way it was obtained.
    pub fn into_value(self) -> T {
        match self {
            Self::Fresh(v) => v,
            Self::Empty => T::default(),
            Self::Fallback { value, .. } => value,
        }
    }
}

/// Summary of how a page's panels were obtained
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    pub state: LoadState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl<T> From<&Loaded<T>> for LoadReport {
    fn from(loaded: &Loaded<T>) -> Self {
        Self {
            state: loaded.state(),
            reason: loaded.reason().map(str::to_string),
        }
    }
}

/// Non-failing loader over a [`Transport`]
#[derive(Clone)]
pub struct ResilientFetch {
    transport: Arc<dyn Transport>,
    context: CallContext,
    fallback_enabled: bool,
}

impl ResilientFetch {
    pub fn new(transport: Arc<dyn Transport>, fallback_enabled: bool) -> Self {
        Self {
            transport,
            context: CallContext::default(),
            fallback_enabled,
        }
    }

    /// Same facade, carrying the caller's cookie and request id.
    pub fn scoped(&self, context: CallContext) -> Self {
        Self {
            transport: self.transport.clone(),
            context,
            fallback_enabled: self.fallback_enabled,
        }
    }

    /// GET `path` and decode `field` (or the whole body when `None`).
    pub async fn get<T>(&self, path: &str, field: Option<&str>, fallback: T) -> Loaded<T>
    where
        T: DeserializeOwned + Default,
    {
        let request = UpstreamRequest::get(path);
        self.settle(path, self.fetch(request, field).await, fallback)
    }

    /// GET a collection; an empty list is reported as [`Loaded::Empty`].
    pub async fn get_list<T>(&self, path: &str, field: Option<&str>, fallback: Vec<T>) -> Loaded<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let request = UpstreamRequest::get(path);
        empty_if_none(self.settle(path, self.fetch(request, field).await, fallback))
    }

    /// POST `body` to `path` and decode `field` of the reply.
    pub async fn post<B, T>(&self, path: &str, body: &B, field: Option<&str>, fallback: T) -> Loaded<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Default,
    {
        let result = match UpstreamRequest::new(Method::POST, path).with_body(&body) {
            Ok(request) => self.fetch(request, field).await,
            Err(e) => Err(e),
        };
        self.settle(path, result, fallback)
    }

    /// POST for a collection; an empty list is reported as [`Loaded::Empty`].
    pub async fn post_list<B, T>(
        &self,
        path: &str,
        body: &B,
        field: Option<&str>,
        fallback: Vec<T>,
    ) -> Loaded<Vec<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        empty_if_none(self.post(path, body, field, fallback).await)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        request: UpstreamRequest,
        field: Option<&str>,
    ) -> Result<T, ServiceError> {
        let response = self
            .transport
            .send(request.with_context(&self.context))
            .await?
            .error_for_status()?;

        let body: serde_json::Value = response.json()?;
        let payload = match field {
            Some(field) => extract_field(body, field)?,
            None => body,
        };
        Ok(serde_json::from_value(payload)?)
    }

    fn settle<T: Default>(&self, path: &str, result: Result<T, ServiceError>, fallback: T) -> Loaded<T> {
        match result {
            Ok(value) => {
                debug!(path = path, "Loaded from back office");
                Loaded::Fresh(value)
            }
            Err(e) => {
                warn!(path = path, error = %e, "Back office load failed, using fallback");
                let value = if self.fallback_enabled {
                    fallback
                } else {
                    T::default()
                };
                Loaded::Fallback {
                    value,
                    reason: e.to_string(),
                }
            }
        }
    }
}

fn empty_if_none<T>(loaded: Loaded<Vec<T>>) -> Loaded<Vec<T>> {
    match loaded {
        Loaded::Fresh(items) if items.is_empty() => Loaded::Empty,
        other => other,
    }
}

/// Pull a dotted field path (`data.items`) out of a JSON body.
fn extract_field(body: serde_json::Value, field: &str) -> Result<serde_json::Value, ServiceError> {
    let mut current = body;
    for segment in field.split('.') {
        current = match current {
            serde_json::Value::Object(mut map) => map
                .remove(segment)
                .ok_or_else(|| ServiceError::Decode(format!("missing field `{field}`")))?,
            _ => return Err(ServiceError::Decode(format!("missing field `{field}`"))),
        };
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::StaticTransport;
    use serde_json::json;

    fn facade(transport: StaticTransport) -> ResilientFetch {
        ResilientFetch::new(Arc::new(transport), true)
    }

    #[tokio::test]
    async fn returns_named_payload_field_on_success() {
        let transport = StaticTransport::new().reply(
            "/api/etl/pipelines",
            200,
            json!({"pipelines": ["a", "b"], "total": 2}),
        );
        let loaded = facade(transport)
            .get_list::<String>("/api/etl/pipelines", Some("pipelines"), vec!["sample".into()])
            .await;
        assert_eq!(loaded, Loaded::Fresh(vec!["a".to_string(), "b".to_string()]));
    }

    #[tokio::test]
    async fn falls_back_on_non_ok_status() {
        let transport = StaticTransport::new().reply("/api/etl/pipelines", 503, json!({}));
        let loaded = facade(transport)
            .get_list::<String>("/api/etl/pipelines", Some("pipelines"), vec!["sample".into()])
            .await;
        assert!(loaded.is_fallback());
        assert_eq!(loaded.into_value(), vec!["sample".to_string()]);
    }

    #[tokio::test]
    async fn falls_back_when_transport_rejects() {
        let transport = StaticTransport::new().fail("/api/forex/rates", "connection refused");
        let loaded = facade(transport)
            .get::<Vec<u32>>("/api/forex/rates", None, vec![7])
            .await;
        assert_eq!(loaded.state(), LoadState::Fallback);
        assert!(loaded.reason().unwrap().contains("connection refused"));
        assert_eq!(loaded.into_value(), vec![7]);
    }

    #[tokio::test]
    async fn falls_back_when_field_is_missing() {
        let transport = StaticTransport::new().reply("/api/entities", 200, json!({"other": []}));
        let loaded = facade(transport)
            .get_list::<String>("/api/entities", Some("entities"), vec!["x".into()])
            .await;
        assert!(loaded.is_fallback());
    }

    #[tokio::test]
    async fn empty_list_is_reported_as_empty() {
        let transport = StaticTransport::new().reply("/api/entities", 200, json!({"entities": []}));
        let loaded = facade(transport)
            .get_list::<String>("/api/entities", Some("entities"), vec!["x".into()])
            .await;
        assert_eq!(loaded, Loaded::Empty);
    }

    #[tokio::test]
    async fn nested_field_path_is_followed() {
        let transport =
            StaticTransport::new().reply("/api/fst-ratios", 200, json!({"data": {"value": 3}}));
        let loaded = facade(transport)
            .get::<u32>("/api/fst-ratios", Some("data.value"), 0)
            .await;
        assert_eq!(loaded, Loaded::Fresh(3));
    }

    #[tokio::test]
    async fn disabled_fallback_yields_default() {
        let transport = StaticTransport::new().reply("/api/entities", 500, json!({}));
        let loaded = ResilientFetch::new(Arc::new(transport), false)
            .get_list::<String>("/api/entities", None, vec!["sample".into()])
            .await;
        assert!(loaded.is_fallback());
        assert!(loaded.into_value().is_empty());
    }

    #[tokio::test]
    async fn post_list_reports_empty_reply() {
        let transport = StaticTransport::new().reply("/api/fst-generate", 200, json!({"lines": []}));
        let loaded = facade(transport)
            .post_list::<_, String>("/api/fst-generate", &json!({}), Some("lines"), vec!["x".into()])
            .await;
        assert_eq!(loaded, Loaded::Empty);
    }

    #[tokio::test]
    async fn post_sends_body() {
        let transport = StaticTransport::new().reply("/api/fst-generate", 200, json!({"ok": true}));
        let handle = transport.clone();
        let loaded = facade(transport)
            .post::<_, serde_json::Value>("/api/fst-generate", &json!({"year": 2024}), None, json!(null))
            .await;
        assert_eq!(loaded, Loaded::Fresh(json!({"ok": true})));
        let sent = handle.requests();
        assert_eq!(sent[0].method, Method::POST);
        assert_eq!(sent[0].body, Some(json!({"year": 2024})));
    }
}
