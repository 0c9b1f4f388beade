//! REST API type definitions

use crate::catalog::CatalogServices;
use serde::{Deserialize, Serialize};
use shopseg_runtime::{CatalogStore, SegmentEvaluator, SyncPipeline};
use std::sync::Arc;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CatalogStore>,
    pub evaluator: Arc<SegmentEvaluator>,
    pub pipeline: Option<Arc<SyncPipeline>>,
}

impl From<CatalogServices> for AppState {
    fn from(services: CatalogServices) -> Self {
        Self {
            store: services.store,
            evaluator: services.evaluator,
            pipeline: services.pipeline,
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Segment evaluation request
///
/// `conditions` stays optional so that a missing key can be told apart from
/// an empty list.
#[derive(Debug, Deserialize)]
pub struct EvaluateRequestPayload {
    #[serde(default)]
    pub conditions: Option<Vec<String>>,
}
