pub mod audit;
pub mod effects;
pub mod health;
pub mod pages;
pub mod reconciliations;

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::app::AppState;

/// Build the API router with all routes
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        // Page views
        .route("/pages/etl", get(pages::etl_page))
        .route("/pages/audit", get(pages::audit_page))
        .route("/pages/materiality", get(pages::materiality_page))
        .route("/pages/ratios", get(pages::ratios_page))
        .route("/pages/forex", get(pages::forex_page))
        .route("/pages/quantum", get(pages::quantum_page))
        .route("/pages/reconciliations", get(pages::reconciliations_page))
        .route("/pages/system", get(pages::system_page))
        .route("/pages/integrations", get(pages::integrations_page))
        .route("/pages/statements", post(pages::generate_statement))
        // Audit forms
        .route("/audit/engagements", post(audit::create_engagement))
        .route(
            "/audit/engagements/:id",
            put(audit::update_engagement).delete(audit::delete_engagement),
        )
        .route("/audit/workpapers", post(audit::create_workpaper))
        .route("/audit/workpapers/:id", put(audit::update_workpaper))
        .route("/audit/findings", post(audit::create_finding))
        // Reconciliation matching
        .route(
            "/reconciliations",
            post(reconciliations::create_reconciliation),
        )
        .route(
            "/reconciliations/:id/items/:item_id/toggle",
            post(reconciliations::toggle_item),
        )
        .route(
            "/reconciliations/:id/items/:item_id/dispute",
            post(reconciliations::dispute),
        )
        // Effects
        .route("/effects/snap", get(effects::snap_timeline))
}
