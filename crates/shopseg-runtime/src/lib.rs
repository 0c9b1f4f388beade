//! shopseg Runtime - catalog sync and segment evaluation
//!
//! Write path: [`upstream`] fetches raw product records, [`upstream::normalize`]
//! maps them onto [`CatalogRecord`], and [`sync::SyncPipeline`] upserts them into
//! a [`store::CatalogStore`].
//!
//! Read path: [`segment::SegmentEvaluator`] compiles condition strings and queries
//! the same store.

pub mod error;
pub mod segment;
pub mod store;
pub mod sync;
pub mod upstream;

pub use error::{Result, RuntimeError};
pub use segment::SegmentEvaluator;
pub use shopseg_core::CatalogRecord;
pub use store::{CatalogStore, Filter, FilterOperator, MemoryStore};
pub use sync::{SkippedRecord, SyncPipeline, SyncReport, SyncScheduler, SyncStatus};
pub use upstream::{NormalizeError, StaticUpstreamClient, UpstreamClient, WooCommerceClient};

#[cfg(feature = "sqlx")]
pub use store::PostgresStore;
