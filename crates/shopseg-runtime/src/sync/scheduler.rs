//! Periodic sync trigger

use super::SyncPipeline;
use crate::error::RuntimeError;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Runs the sync pipeline at startup and then once per interval
pub struct SyncScheduler;

impl SyncScheduler {
    /// Spawn the scheduling loop on the current runtime.
    ///
    /// The first tick fires immediately. Ticks that land while a run is still
    /// active are skipped. The loop never exits on its own; abort the handle to
    /// stop it.
    pub fn spawn(pipeline: Arc<SyncPipeline>, every: Duration) -> JoinHandle<()> {
        let every = every.max(MIN_INTERVAL);
        info!(interval_secs = every.as_secs(), "Starting sync scheduler");

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;

                match pipeline.run_guarded().await {
                    Ok(report) => info!(
                        upserted = report.upserted,
                        skipped = report.skipped.len(),
                        "Scheduled sync completed"
                    ),
                    Err(RuntimeError::SyncInProgress) => {
                        warn!("Previous sync still running, skipping tick")
                    }
                    Err(e) => error!(error = %e, "Scheduled sync failed"),
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::upstream::StaticUpstreamClient;
    use serde_json::json;

    #[tokio::test(start_paused = true)]
    async fn test_runs_at_startup_and_every_interval() {
        let upstream = Arc::new(StaticUpstreamClient::new(vec![json!({
            "id": 1,
            "name": "Hat",
            "price": "9.50",
            "date_created": "2024-01-01T00:00:00"
        })]));
        let store = Arc::new(MemoryStore::new());
        let pipeline = Arc::new(SyncPipeline::new(upstream.clone(), store.clone()));

        let handle = SyncScheduler::spawn(pipeline, Duration::from_secs(60));
        tokio::time::sleep(Duration::from_secs(125)).await;
        handle.abort();

        assert!(upstream.fetch_count() >= 3);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_do_not_stop_the_loop() {
        let upstream = Arc::new(StaticUpstreamClient::failing("upstream down"));
        let store = Arc::new(MemoryStore::new());
        let pipeline = Arc::new(SyncPipeline::new(upstream.clone(), store));

        let handle = SyncScheduler::spawn(pipeline.clone(), Duration::from_secs(10));
        tokio::time::sleep(Duration::from_secs(35)).await;

        assert!(!handle.is_finished());
        assert!(upstream.fetch_count() >= 3);
        assert!(pipeline.status().await.last_error.is_some());
        handle.abort();
    }
}
