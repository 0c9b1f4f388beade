//! In-memory catalog store
//!
//! Simple memory-based record storage for tests, development and deployments
//! without a database.

use super::query::{Filter, FilterMatcher};
use super::CatalogStore;
use crate::error::Result;
use shopseg_core::CatalogRecord;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// In-memory catalog store
///
/// Records are kept in id order, which is also the iteration order of
/// `find`. Data is lost when the process restarts.
pub struct MemoryStore {
    records: RwLock<BTreeMap<i64, CatalogRecord>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
        }
    }

    /// Create a store pre-populated with `records` (later duplicates win)
    pub fn with_records(records: impl IntoIterator<Item = CatalogRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|record| (record.id, record))
            .collect();
        Self {
            records: RwLock::new(records),
        }
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl CatalogStore for MemoryStore {
    async fn upsert(&self, record: CatalogRecord) -> Result<()> {
        let mut records = self.records.write().await;
        records.insert(record.id, record);
        Ok(())
    }

    async fn find(&self, filters: &[Filter]) -> Result<Vec<CatalogRecord>> {
        let matchers = filters
            .iter()
            .map(FilterMatcher::new)
            .collect::<Result<Vec<_>>>()?;

        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|record| matchers.iter().all(|m| m.matches(record)))
            .cloned()
            .collect())
    }

    async fn get(&self, id: i64) -> Result<Option<CatalogRecord>> {
        Ok(self.records.read().await.get(&id).cloned())
    }
}
