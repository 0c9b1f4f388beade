//! REST API implementation
//!
//! - types: request/response and state types
//! - extractors: JSON body extractor with `{message}` rejections
//! - handlers: endpoint handlers
//! - router: router creation and configuration

mod extractors;
mod handlers;
mod router;
pub mod types;

pub use extractors::JsonExtractor;
pub use router::create_router;
pub use types::{AppState, EvaluateRequestPayload, HealthResponse};
