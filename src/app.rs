use axum::{http::HeaderValue, Router};
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::config::Settings;
use crate::middleware::{request_id_layer, Caller, X_REQUEST_ID, X_VIEW_ID};
use crate::pages::PageContext;
use crate::routes;
use crate::services::{AuditService, LoadTracker, ResilientFetch, Transport};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    /// Back-office transport shared by the facade and the service
    pub transport: Arc<dyn Transport>,
    pub fetch: ResilientFetch,
    pub audit: AuditService,
    pub tracker: LoadTracker,
}

impl AppState {
    pub fn new(settings: Settings, transport: Arc<dyn Transport>) -> Arc<Self> {
        let fetch = ResilientFetch::new(transport.clone(), settings.fallback_data_enabled);
        let audit = AuditService::new(transport.clone());
        Arc::new(Self {
            settings,
            transport,
            fetch,
            audit,
            tracker: LoadTracker::new(),
        })
    }

    /// Page dependencies scoped to one browser request.
    pub fn pages_for(&self, caller: &Caller) -> PageContext {
        PageContext {
            fetch: self.fetch.scoped(caller.context.clone()),
            tracker: self.tracker.clone(),
        }
    }

    pub fn audit_for(&self, caller: &Caller) -> AuditService {
        self.audit.scoped(caller.context.clone())
    }
}

/// Build the complete application with all middleware
pub fn create_app(state: Arc<AppState>) -> Router {
    let cors = build_cors_layer(&state.settings);

    // DEBUG spans keep INFO output to one line per event
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(DefaultOnResponse::new().level(Level::DEBUG));

    let (set_request_id, propagate_request_id) = request_id_layer();

    Router::new()
        .merge(routes::api_router())
        // Middleware stack (applied bottom-up)
        .layer(propagate_request_id)
        .layer(trace_layer)
        .layer(set_request_id)
        .layer(cors)
        .with_state(state)
}

fn build_cors_layer(settings: &Settings) -> CorsLayer {
    let origins: Vec<HeaderValue> = settings
        .cors_allow_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let max_age = if settings.env.is_dev() {
        std::time::Duration::from_secs(86400)
    } else {
        std::time::Duration::from_secs(3600)
    };

    // The shell sends its session cookie, so credentials must be allowed
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::list([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
            X_REQUEST_ID,
            X_VIEW_ID,
        ]))
        .allow_credentials(true)
        .max_age(max_age)
}
