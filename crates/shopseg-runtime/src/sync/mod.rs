//! Catalog sync pipeline
//!
//! One run fetches the full upstream product list, normalizes each entry and
//! upserts it into the catalog store. Record-level failures are contained: a
//! record that fails to normalize or store is reported and skipped. A failed
//! fetch aborts the run; writes already issued in that run stay in place.

mod scheduler;

pub use scheduler::SyncScheduler;

use crate::error::{Result, RuntimeError};
use crate::store::CatalogStore;
use crate::upstream::{normalize, UpstreamClient};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{error, info, warn};

/// A record left out of a sync run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRecord {
    /// Upstream id, when one could be read
    pub id: Option<i64>,
    pub reason: String,
}

/// Summary of one completed sync run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Records returned by the upstream
    pub fetched: usize,
    /// Records written to the store
    pub upserted: usize,
    pub skipped: Vec<SkippedRecord>,
}

/// Observable state of the pipeline
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncStatus {
    pub running: bool,
    pub last_report: Option<SyncReport>,
    /// Error of the most recent run, cleared by the next successful run
    pub last_error: Option<String>,
}

/// Fetch → normalize → upsert pipeline
pub struct SyncPipeline {
    upstream: Arc<dyn UpstreamClient>,
    store: Arc<dyn CatalogStore>,
    run_lock: Arc<Mutex<()>>,
    status: RwLock<SyncStatus>,
}

impl SyncPipeline {
    pub fn new(upstream: Arc<dyn UpstreamClient>, store: Arc<dyn CatalogStore>) -> Self {
        Self {
            upstream,
            store,
            run_lock: Arc::new(Mutex::new(())),
            status: RwLock::new(SyncStatus::default()),
        }
    }

    /// Run a sync unless one is already in progress.
    ///
    /// Returns [`RuntimeError::SyncInProgress`] without touching the store when
    /// another run holds the pipeline. The run itself executes on its own task,
    /// so dropping the returned future does not stop it; the outcome is still
    /// recorded in [`Self::status`].
    pub async fn run_guarded(self: &Arc<Self>) -> Result<SyncReport> {
        let Ok(guard) = Arc::clone(&self.run_lock).try_lock_owned() else {
            return Err(RuntimeError::SyncInProgress);
        };

        let pipeline = Arc::clone(self);
        let task = tokio::spawn(async move {
            let _guard = guard;
            let result = pipeline.run_sync().await;
            pipeline.record_outcome(&result).await;
            result
        });

        task.await.map_err(|e| {
            error!(error = %e, "Sync task did not complete");
            RuntimeError::SyncAborted(e.to_string())
        })?
    }

    async fn record_outcome(&self, result: &Result<SyncReport>) {
        let mut status = self.status.write().await;
        match result {
            Ok(report) => {
                status.last_report = Some(report.clone());
                status.last_error = None;
            }
            Err(e) => status.last_error = Some(e.to_string()),
        }
    }

    /// Run one sync pass without the overlap guard.
    pub async fn run_sync(&self) -> Result<SyncReport> {
        let started_at = Utc::now();
        info!("Starting catalog sync");

        let products = self.upstream.fetch_products().await.map_err(|e| {
            error!(error = %e, "Error fetching upstream products");
            e
        })?;

        let fetched = products.len();
        let mut upserted = 0;
        let mut skipped = Vec::new();

        for raw in &products {
            let id = raw.get("id").and_then(|v| v.as_i64());

            let record = match normalize(raw) {
                Ok(record) => record,
                Err(e) => {
                    warn!(record_id = ?id, error = %e, "Skipping upstream record");
                    skipped.push(SkippedRecord {
                        id,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            match self.store.upsert(record).await {
                Ok(()) => upserted += 1,
                Err(e) => {
                    warn!(record_id = ?id, error = %e, "Failed to store record");
                    skipped.push(SkippedRecord {
                        id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            fetched = fetched,
            upserted = upserted,
            skipped = skipped.len(),
            "Products ingested and stored"
        );

        Ok(SyncReport {
            started_at,
            finished_at: Utc::now(),
            fetched,
            upserted,
            skipped,
        })
    }

    /// Current run state and last outcome
    ///
    /// `running` is read from the run lock, so it cannot outlive the run.
    pub async fn status(&self) -> SyncStatus {
        let mut status = self.status.read().await.clone();
        status.running = self.is_running();
        status
    }

    pub fn is_running(&self) -> bool {
        self.run_lock.try_lock().is_err()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::upstream::StaticUpstreamClient;
    use serde_json::json;
    use std::time::Duration;

    fn product(id: i64, price: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": format!("Product {}", id),
            "price": price,
            "stock_status": "instock",
            "stock_quantity": 4,
            "categories": [{"name": "Shoes"}],
            "tags": [{"name": "new"}],
            "on_sale": false,
            "date_created": "2024-02-01T09:00:00"
        })
    }

    #[tokio::test]
    async fn test_run_sync_upserts_all() {
        let store = Arc::new(MemoryStore::new());
        let upstream = Arc::new(StaticUpstreamClient::new(vec![
            product(1, "10"),
            product(2, "20"),
        ]));
        let pipeline = SyncPipeline::new(upstream, store.clone());

        let report = pipeline.run_sync().await.unwrap();

        assert_eq!(report.fetched, 2);
        assert_eq!(report.upserted, 2);
        assert!(report.skipped.is_empty());
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_bad_record_does_not_abort_batch() {
        let store = Arc::new(MemoryStore::new());
        let upstream = Arc::new(StaticUpstreamClient::new(vec![
            product(1, "10"),
            json!({"name": "no id", "price": "5"}),
            product(3, "not a price"),
            product(4, "40"),
        ]));
        let pipeline = SyncPipeline::new(upstream, store.clone());

        let report = pipeline.run_sync().await.unwrap();

        assert_eq!(report.fetched, 4);
        assert_eq!(report.upserted, 2);
        assert_eq!(report.skipped.len(), 2);
        assert_eq!(report.skipped[0].id, None);
        assert_eq!(report.skipped[1].id, Some(3));
        assert!(store.get(1).await.unwrap().is_some());
        assert!(store.get(4).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts_and_is_recorded() {
        let store = Arc::new(MemoryStore::new());
        let upstream = Arc::new(StaticUpstreamClient::failing("connection refused"));
        let pipeline = Arc::new(SyncPipeline::new(upstream, store.clone()));

        let err = pipeline.run_guarded().await.unwrap_err();
        assert!(matches!(err, RuntimeError::UpstreamFetch(_)));
        assert!(store.is_empty().await);

        let status = pipeline.status().await;
        assert!(!status.running);
        assert!(status.last_report.is_none());
        assert!(status.last_error.unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_success_clears_last_error() {
        let store = Arc::new(MemoryStore::new());
        let upstream = Arc::new(StaticUpstreamClient::failing("timeout"));
        let pipeline = Arc::new(SyncPipeline::new(upstream.clone(), store));

        assert!(pipeline.run_guarded().await.is_err());
        upstream.set_products(vec![product(1, "10")]).await;
        pipeline.run_guarded().await.unwrap();

        let status = pipeline.status().await;
        assert!(status.last_error.is_none());
        assert_eq!(status.last_report.unwrap().upserted, 1);
    }

    #[tokio::test]
    async fn test_overlapping_run_is_skipped() {
        let store = Arc::new(MemoryStore::new());
        let upstream = Arc::new(
            StaticUpstreamClient::new(vec![product(1, "10")])
                .with_delay(Duration::from_millis(50)),
        );
        let pipeline = Arc::new(SyncPipeline::new(upstream.clone(), store));

        let (first, second) = tokio::join!(pipeline.run_guarded(), pipeline.run_guarded());

        assert!(first.is_ok());
        assert!(matches!(second, Err(RuntimeError::SyncInProgress)));
        assert_eq!(upstream.fetch_count(), 1);
        assert!(!pipeline.is_running());
    }

    #[tokio::test]
    async fn test_dropped_caller_does_not_cancel_run() {
        let store = Arc::new(MemoryStore::new());
        let upstream = Arc::new(
            StaticUpstreamClient::new(vec![product(1, "10")])
                .with_delay(Duration::from_millis(200)),
        );
        let pipeline = Arc::new(SyncPipeline::new(upstream.clone(), store.clone()));

        let abandoned =
            tokio::time::timeout(Duration::from_millis(20), pipeline.run_guarded()).await;
        assert!(abandoned.is_err());
        assert!(pipeline.status().await.running);

        tokio::time::sleep(Duration::from_millis(400)).await;

        let status = pipeline.status().await;
        assert!(!status.running);
        assert!(!pipeline.is_running());
        assert_eq!(status.last_report.unwrap().upserted, 1);
        assert!(store.get(1).await.unwrap().is_some());

        let report = pipeline.run_guarded().await.unwrap();
        assert_eq!(report.upserted, 1);
        assert_eq!(upstream.fetch_count(), 2);
    }
}
