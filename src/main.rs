use anyhow::Result;
use backoff::ExponentialBackoffBuilder;
use std::sync::Arc;
use std::time::Duration;

use auditdesk_gateway::services::{HttpTransport, Transport};
use auditdesk_gateway::{app, config, logging};

/// Give up checking the back office after this long; pages keep working on
/// sample data either way.
const STARTUP_CHECK_WINDOW: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = config::Settings::from_env()?;

    // Initialize logging
    logging::init_logging(&settings.env);

    tracing::info!(
        env = ?settings.env,
        server_addr = %settings.server_addr,
        backoffice = %settings.backoffice_api_url,
        fallback_data = settings.fallback_data_enabled,
        "Starting audit dashboard gateway"
    );

    let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(
        &settings.backoffice_api_url,
        settings.backoffice_timeout_seconds,
    )?);

    // Check the back office in the background; never blocks startup
    tokio::spawn({
        let transport = transport.clone();
        async move {
            let policy = ExponentialBackoffBuilder::new()
                .with_max_elapsed_time(Some(STARTUP_CHECK_WINDOW))
                .build();
            let check = backoff::future::retry(policy, || async {
                transport.health_check().await.map_err(|e| {
                    tracing::debug!(error = %e, "Back office not ready yet");
                    backoff::Error::transient(e)
                })
            });
            match check.await {
                Ok(()) => tracing::info!("Back office is healthy"),
                Err(e) => tracing::warn!(
                    error = %e,
                    "Back office unreachable - pages will serve sample data"
                ),
            }
        }
    });

    // Create application state
    let state = app::AppState::new(settings.clone(), transport);

    // Build application
    let app = app::create_app(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&settings.server_addr).await?;
    tracing::info!("Listening on {}", settings.server_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
