//! Runtime error types

use crate::upstream::NormalizeError;
use thiserror::Error;

/// Runtime error
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Upstream list request failed (network, non-success status, bad payload)
    #[error("Upstream fetch failed: {0}")]
    UpstreamFetch(String),

    /// A single upstream record could not be normalized
    #[error("Normalize error: {0}")]
    Normalize(#[from] NormalizeError),

    /// Catalog store connection or query failure
    #[error("Store error: {0}")]
    Store(String),

    /// Caller supplied an unusable request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A sync run is already active
    #[error("Sync already in progress")]
    SyncInProgress,

    /// The task running a sync panicked or was cancelled
    #[error("Sync task aborted: {0}")]
    SyncAborted(String),
}

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, RuntimeError>;
