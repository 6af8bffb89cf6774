//! Canned transport for tests
//!
//! Replies are keyed by method-less path; the query string is ignored.
//! Every request is recorded so callers can assert on what was sent.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use super::transport::{Transport, UpstreamRequest, UpstreamResponse};
use crate::error::ServiceError;

#[derive(Debug, Clone)]
enum Canned {
    Reply { status: u16, body: Vec<u8> },
    Fail(String),
}

#[derive(Clone, Default)]
pub struct StaticTransport {
    routes: Arc<Mutex<HashMap<String, Canned>>>,
    sent: Arc<Mutex<Vec<UpstreamRequest>>>,
}

impl StaticTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `path` with `status` and a JSON body.
    pub fn reply(self, path: &str, status: u16, body: serde_json::Value) -> Self {
        self.routes.lock().insert(
            path.to_string(),
            Canned::Reply {
                status,
                body: body.to_string().into_bytes(),
            },
        );
        self
    }

    /// Fail `path` at the transport level, as if the connection dropped.
    pub fn fail(self, path: &str, message: &str) -> Self {
        self.routes
            .lock()
            .insert(path.to_string(), Canned::Fail(message.to_string()));
        self
    }

    /// Requests seen so far, oldest first.
    pub fn requests(&self) -> Vec<UpstreamRequest> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl Transport for StaticTransport {
    async fn send(&self, request: UpstreamRequest) -> Result<UpstreamResponse, ServiceError> {
        let canned = self.routes.lock().get(&request.path).cloned();
        self.sent.lock().push(request);

        match canned {
            Some(Canned::Reply { status, body }) => Ok(UpstreamResponse { status, body }),
            Some(Canned::Fail(message)) => Err(ServiceError::Transport(message)),
            None => Ok(UpstreamResponse {
                status: 404,
                body: br#"{"message":"no such route"}"#.to_vec(),
            }),
        }
    }
}
