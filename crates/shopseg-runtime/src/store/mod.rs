//! Catalog store implementations
//!
//! Stores hold [`CatalogRecord`]s keyed by `id` and answer conjunctive
//! filter queries.

mod memory;
pub mod query;
pub mod sql;

#[cfg(feature = "sqlx")]
mod postgres;

pub use memory::MemoryStore;
pub use query::{Filter, FilterOperator};

#[cfg(feature = "sqlx")]
pub use postgres::PostgresStore;

use crate::error::Result;
use shopseg_core::CatalogRecord;

/// Trait for catalog storage backends
#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    /// Insert the record, or overwrite every field of the existing record with the same id
    async fn upsert(&self, record: CatalogRecord) -> Result<()>;

    /// Records matching all filters, in the store's natural order
    async fn find(&self, filters: &[Filter]) -> Result<Vec<CatalogRecord>>;

    /// Look up one record by id
    async fn get(&self, id: i64) -> Result<Option<CatalogRecord>>;

    /// Every record in the store
    async fn all(&self) -> Result<Vec<CatalogRecord>> {
        self.find(&[]).await
    }
}
