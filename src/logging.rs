//! Tracing subscriber setup
//!
//! `RUST_LOG` wins when set. Otherwise the filter comes from the
//! environment: chatty in dev, gateway-only detail in staging, and
//! warnings from the HTTP client stack in production.

use crate::config::Environment;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn default_directives(env: &Environment) -> &'static str {
    match env {
        Environment::Dev => "auditdesk_gateway=debug,tower_http=debug,reqwest=info,info",
        Environment::Staging => "auditdesk_gateway=debug,tower_http=info,reqwest=warn,info",
        Environment::Prod => "auditdesk_gateway=info,tower_http=info,reqwest=warn,hyper=warn,warn",
    }
}

pub fn init_logging(env: &Environment) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(env)));

    // Log shippers want one flat JSON object per event
    if env.is_prod() {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(false),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_file(env.is_dev())
                    .with_line_number(env.is_dev()),
            )
            .init();
    }

    tracing::debug!(env = ?env, version = env!("CARGO_PKG_VERSION"), "Logging ready");
}
