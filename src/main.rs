use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use qb_core::{CoreConfig, Stores};

/// Main entry point for the QualiBev server
///
/// Resolves configuration once, opens the configured stores and serves the REST API until
/// interrupted.
///
/// # Environment Variables
/// - `QB_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `QB_DATA_DIR`: Directory for product and report storage (default: "qualibev_data")
/// - `QB_STORAGE`: `file` or `memory` (default: "file")
/// - `QB_MAX_REGISTRATION_ATTEMPTS`: Identifier draws per registration (default: 5)
/// - `QB_DEFAULT_MAX_SCANS`: Scan allowance when a product sets none (default: 15)
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("qualibev_run=info".parse()?)
                .add_directive("qb_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("QB_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let cfg = Arc::new(CoreConfig::from_lookup(|key| std::env::var(key).ok())?);
    let stores = Stores::open(&cfg)?;

    tracing::info!("++ Starting QualiBev REST on {}", rest_addr);

    let app = api_rest::router(AppState::new(cfg, stores));
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("shutting down");
        })
        .await?;

    Ok(())
}
