//! API endpoint handlers

use super::extractors::JsonExtractor;
use super::types::*;
use crate::error::ServerError;
use axum::{extract::State, Json};
use shopseg_runtime::{CatalogRecord, RuntimeError, SyncReport, SyncStatus};
use tracing::{error, info, warn};

/// Health check endpoint
pub(super) async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Full catalog listing
pub(super) async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<CatalogRecord>>, ServerError> {
    let records = state.store.all().await.map_err(|e| {
        error!(error = %e, "Error fetching products");
        ServerError::Internal("Error fetching products".to_string())
    })?;

    Ok(Json(records))
}

/// Segment evaluation endpoint
#[axum::debug_handler]
pub(super) async fn evaluate_segment(
    State(state): State<AppState>,
    JsonExtractor(payload): JsonExtractor<EvaluateRequestPayload>,
) -> Result<Json<Vec<CatalogRecord>>, ServerError> {
    let conditions = payload.conditions.as_deref();
    info!(
        conditions = conditions.map_or(0, |c| c.len()),
        "Received segment evaluation request"
    );

    let records = state
        .evaluator
        .evaluate(conditions)
        .await
        .map_err(|e| {
            match &e {
                RuntimeError::InvalidRequest(_) => warn!(error = %e, "Rejected segment request"),
                _ => error!(error = %e, "Error evaluating segment"),
            }
            ServerError::from(e)
        })?;

    info!(matched = records.len(), "Segment evaluated");
    Ok(Json(records))
}

/// Manual sync trigger
pub(super) async fn trigger_sync(
    State(state): State<AppState>,
) -> Result<Json<SyncReport>, ServerError> {
    let Some(pipeline) = state.pipeline else {
        return Err(ServerError::Unavailable(
            "Catalog sync is not configured".to_string(),
        ));
    };

    match pipeline.run_guarded().await {
        Ok(report) => Ok(Json(report)),
        Err(RuntimeError::SyncInProgress) => {
            warn!("Manual sync requested while a run is active");
            Err(RuntimeError::SyncInProgress.into())
        }
        Err(e) => Err(e.into()),
    }
}

/// Sync state and last report
pub(super) async fn sync_status(State(state): State<AppState>) -> Json<SyncStatus> {
    match state.pipeline {
        Some(pipeline) => Json(pipeline.status().await),
        None => Json(SyncStatus::default()),
    }
}
