//! shopseg HTTP server
//!
//! Serves the catalog and segment evaluation API and keeps the catalog in
//! sync with the upstream storefront.

use anyhow::Result;
use shopseg_runtime::SyncScheduler;
use shopseg_server::api;
use shopseg_server::catalog::init_catalog;
use shopseg_server::config::ServerConfig;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = ServerConfig::load()?;

    // Initialize tracing
    init_tracing(&config)?;
    info!("Loaded configuration: {:?}", config);

    // Initialize catalog services
    let services = init_catalog(&config).await?;
    info!("Catalog services initialized");

    let _scheduler = services.pipeline.clone().map(|pipeline| {
        SyncScheduler::spawn(pipeline, Duration::from_secs(config.sync_interval_secs))
    });

    let app = api::create_router(services.into());

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    info!("Starting server on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    info!("✓ Server listening on http://{}", addr);
    info!("  Health check: http://{}/health", addr);
    info!("  Products: http://{}/products", addr);
    info!("  Segment API: POST http://{}/segments/evaluate", addr);
    info!("  Manual sync: POST http://{}/sync", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Initialize tracing subscriber
fn init_tracing(config: &ServerConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "shopseg_server={level},shopseg_runtime={level},tower_http=debug",
            level = config.log_level
        )
        .into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    let result = if config.log_format.eq_ignore_ascii_case("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };

    result.map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))
}
