//! HTTP transport to the back-office REST API
//!
//! Both the resilient fetch facade and the audit service sit on top of the
//! [`Transport`] trait, so tests can swap the network for a canned one.

use async_trait::async_trait;
use reqwest::{header, Client, Method};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

use crate::error::ServiceError;
use crate::middleware::X_REQUEST_ID;

const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Per-call context forwarded from the browser request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallContext {
    /// Raw `Cookie` header, forwarded like a browser `credentials: 'include'` fetch
    pub cookie: Option<String>,
    pub request_id: Option<String>,
}

/// A request addressed to a path on the back office
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    pub context: CallContext,
}

impl UpstreamRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            context: CallContext::default(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_body<B: Serialize>(mut self, body: &B) -> Result<Self, ServiceError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn with_context(mut self, context: &CallContext) -> Self {
        self.context = context.clone();
        self
    }
}

/// Status and raw body of a back-office response
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl UpstreamResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ServiceError> {
        if self.body.is_empty() {
            // 204 and friends decode as JSON null
            return serde_json::from_slice(b"null").map_err(ServiceError::from);
        }
        serde_json::from_slice(&self.body).map_err(ServiceError::from)
    }

    /// Turn a non-2xx response into a `ServiceError::Status`.
    pub fn error_for_status(self) -> Result<Self, ServiceError> {
        if self.is_success() {
            return Ok(self);
        }
        Err(ServiceError::Status {
            status: self.status,
            message: self.error_message(),
        })
    }

    fn error_message(&self) -> String {
        #[derive(Deserialize)]
        struct ErrorBody {
            message: Option<String>,
            error: Option<String>,
        }

        serde_json::from_slice::<ErrorBody>(&self.body)
            .ok()
            .and_then(|b| b.message.or(b.error))
            .unwrap_or_else(|| format!("back office error: {}", self.status))
    }
}

/// Something that can deliver an [`UpstreamRequest`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: UpstreamRequest) -> Result<UpstreamResponse, ServiceError>;

    /// Call the back office's health endpoint.
    async fn health_check(&self) -> Result<(), ServiceError> {
        self.send(UpstreamRequest::get("/health"))
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// `reqwest`-backed transport
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout_seconds: u64) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Url::parse(base_url)?;
        tracing::info!(base_url = base_url, "Back office transport initialized");

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url_for(&self, path: &str, query: &[(String, String)]) -> Result<Url, ServiceError> {
        // URL parsing would resolve these, letting a path climb out of /api
        let escapes = path.contains(['?', '#', '%', '\\'])
            || path.split('/').any(|segment| segment == "." || segment == "..");
        if escapes {
            return Err(ServiceError::Endpoint {
                path: path.to_string(),
                reason: "path must be plain segments".to_string(),
            });
        }

        let raw = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let mut url = Url::parse(&raw).map_err(|e| ServiceError::Endpoint {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: UpstreamRequest) -> Result<UpstreamResponse, ServiceError> {
        let url = self.url_for(&request.path, &request.query)?;

        let mut req = self
            .client
            .request(request.method.clone(), url.clone())
            .header(header::ACCEPT, "application/json");

        if let Some(cookie) = &request.context.cookie {
            req = req.header(header::COOKIE, cookie);
        }
        if let Some(rid) = &request.context.request_id {
            req = req.header(X_REQUEST_ID, rid);
        }
        if let Some(body) = &request.body {
            req = req.json(body);
        }

        debug!(method = %request.method, url = %url, "Back office request");

        let response = req.send().await.map_err(|e| {
            error!(error = %e, url = %url, "Back office request failed");
            ServiceError::from(e)
        })?;

        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        Ok(UpstreamResponse { status, body })
    }

    async fn health_check(&self) -> Result<(), ServiceError> {
        let url = self.url_for("/health", &[])?;
        self.client
            .get(url)
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// Serialize a filter struct into query-string pairs, skipping nulls.
pub fn query_pairs<F: Serialize>(filter: &F) -> Result<Vec<(String, String)>, ServiceError> {
    let value = serde_json::to_value(filter)?;
    let serde_json::Value::Object(map) = value else {
        return Err(ServiceError::Decode("query filter must be an object".to_string()));
    };

    Ok(map
        .into_iter()
        .filter_map(|(key, value)| match value {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some((key, s)),
            other => Some((key, other.to_string())),
        })
        .collect())
}
