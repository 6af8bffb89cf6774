//! Caller extractor
//!
//! Collects what the gateway forwards to the back office on the browser's
//! behalf (its cookies and the request id), plus what scopes stale-load
//! tracking: the session cookie and the shell's per-view token.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, HeaderName},
    RequestPartsExt,
};
use axum_extra::{headers::Cookie, TypedHeader};
use std::convert::Infallible;

use super::request_id::forwarded_request_id;
use crate::services::CallContext;

/// Token the shell generates once per mounted view (a browser tab showing
/// one page). Loads sharing a token replace one another.
pub const X_VIEW_ID: HeaderName = HeaderName::from_static("x-view-id");

/// Cookie names that identify a browser session, in lookup order
const SESSION_COOKIES: [&str; 2] = ["session", "sid"];

const MAX_VIEW_ID_LEN: usize = 64;

#[derive(Debug, Clone, Default)]
pub struct Caller {
    pub context: CallContext,
    pub session: Option<String>,
    pub view: Option<String>,
}

impl Caller {
    /// Key for the load tracker, or `None` when this load cannot be told
    /// apart from other callers' and must not be tracked.
    pub fn load_key(&self, page: &str) -> Option<String> {
        let session = self.session.as_deref()?;
        let view = self.view.as_deref()?;
        Some(format!("{session}:{view}:{page}"))
    }
}

fn view_token(headers: &HeaderMap) -> Option<String> {
    let token = headers.get(X_VIEW_ID)?.to_str().ok()?.trim();
    let usable = !token.is_empty()
        && token.len() <= MAX_VIEW_ID_LEN
        && token.bytes().all(|b| b.is_ascii_graphic());
    usable.then(|| token.to_string())
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let request_id = forwarded_request_id(&parts.headers);
        let view = view_token(&parts.headers);
        let cookies = parts
            .extract::<Option<TypedHeader<Cookie>>>()
            .await
            .ok()
            .flatten()
            .map(|TypedHeader(cookie)| cookie);

        let (cookie, session) = match cookies {
            Some(cookie) => {
                let session = SESSION_COOKIES
                    .iter()
                    .find_map(|name| cookie.get(name))
                    .filter(|s| !s.is_empty())
                    .map(str::to_string);
                let raw = cookie
                    .iter()
                    .map(|(name, value)| format!("{name}={value}"))
                    .collect::<Vec<_>>()
                    .join("; ");
                (Some(raw).filter(|r| !r.is_empty()), session)
            }
            None => (None, None),
        };

        Ok(Self {
            context: CallContext { cookie, request_id },
            session,
            view,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, Request};

    async fn caller(headers: &[(&str, &str)]) -> Caller {
        let mut builder = Request::builder().uri("/pages/etl");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        Caller::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn session_and_view_scope_the_load_key() {
        let c = caller(&[
            (header::COOKIE.as_str(), "theme=dark; sid=abc"),
            ("x-view-id", "tab-1"),
            ("x-request-id", "req-9"),
        ])
        .await;
        assert_eq!(c.load_key("etl").as_deref(), Some("abc:tab-1:etl"));
        assert_eq!(c.context.cookie.as_deref(), Some("theme=dark; sid=abc"));
        assert_eq!(c.context.request_id.as_deref(), Some("req-9"));
    }

    #[tokio::test]
    async fn untracked_without_session_or_view() {
        let anonymous = caller(&[("x-view-id", "tab-1")]).await;
        assert_eq!(anonymous.load_key("etl"), None);
        assert_eq!(anonymous.context.cookie, None);

        let no_view = caller(&[(header::COOKIE.as_str(), "session=abc")]).await;
        assert_eq!(no_view.load_key("etl"), None);

        let blank_view = caller(&[
            (header::COOKIE.as_str(), "session=abc"),
            ("x-view-id", "   "),
        ])
        .await;
        assert_eq!(blank_view.load_key("etl"), None);
    }
}
