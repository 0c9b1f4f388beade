//! Catalog service wiring
//!
//! Builds the store, the sync pipeline and the segment evaluator from the
//! server configuration.

use crate::config::ServerConfig;
use anyhow::Result;
use shopseg_runtime::{CatalogStore, MemoryStore, SegmentEvaluator, SyncPipeline, WooCommerceClient};
use std::sync::Arc;
use tracing::{info, warn};

/// Services shared by the HTTP handlers and the scheduler
pub struct CatalogServices {
    pub store: Arc<dyn CatalogStore>,
    pub evaluator: Arc<SegmentEvaluator>,
    /// Absent when no upstream is configured
    pub pipeline: Option<Arc<SyncPipeline>>,
}

impl CatalogServices {
    /// Wire services around an existing store and optional pipeline
    pub fn new(store: Arc<dyn CatalogStore>, pipeline: Option<Arc<SyncPipeline>>) -> Self {
        Self {
            evaluator: Arc::new(SegmentEvaluator::new(store.clone())),
            store,
            pipeline,
        }
    }
}

/// Initialize catalog services
pub async fn init_catalog(config: &ServerConfig) -> Result<CatalogServices> {
    let store = init_store(config).await?;

    let pipeline = if config.sync_enabled() {
        let upstream = &config.upstream;
        let base_url = upstream.base_url.clone().unwrap_or_default();
        info!(base_url = %base_url, "✓ Upstream sync configured");

        let client = WooCommerceClient::new(
            base_url,
            upstream.consumer_key.clone(),
            upstream.consumer_secret.clone(),
        );
        Some(Arc::new(SyncPipeline::new(Arc::new(client), store.clone())))
    } else {
        warn!("Upstream base URL not configured, catalog sync is disabled");
        None
    };

    Ok(CatalogServices::new(store, pipeline))
}

#[cfg(feature = "sqlx")]
async fn init_store(config: &ServerConfig) -> Result<Arc<dyn CatalogStore>> {
    use shopseg_runtime::PostgresStore;
    use sqlx::postgres::PgPoolOptions;

    let Some(database_url) = config.database_url.as_deref() else {
        info!("Database URL not configured, using in-memory catalog store");
        return Ok(Arc::new(MemoryStore::new()));
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to catalog database: {}", e))?;
    info!("✓ Connected to catalog database");

    let store = PostgresStore::new(Arc::new(pool));
    store.ensure_schema().await?;

    Ok(Arc::new(store))
}

#[cfg(not(feature = "sqlx"))]
async fn init_store(config: &ServerConfig) -> Result<Arc<dyn CatalogStore>> {
    if config.database_url.is_some() {
        warn!("Built without database support, ignoring database URL");
    }
    Ok(Arc::new(MemoryStore::new()))
}
