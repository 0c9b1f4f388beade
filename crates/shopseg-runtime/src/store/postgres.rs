//! PostgreSQL-based catalog store
//!
//! Default table: `products` with one column per [`CatalogField`].

use super::query::Filter;
use super::sql::{build_where, select_columns, SqlParam, PRODUCTS_TABLE};
use super::CatalogStore;
use crate::error::{Result, RuntimeError};
use shopseg_core::CatalogRecord;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::sync::Arc;

/// PostgreSQL catalog store
///
/// Uses one process-wide pool handed in by the caller.
pub struct PostgresStore {
    /// Database connection pool
    pool: Arc<PgPool>,
}

impl PostgresStore {
    /// Create a new PostgreSQL store
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Create the products table if it does not exist
    pub async fn ensure_schema(&self) -> Result<()> {
        let ddl = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id BIGINT PRIMARY KEY,
                title TEXT NOT NULL,
                price DOUBLE PRECISION NOT NULL,
                stock_status TEXT NOT NULL,
                stock_quantity BIGINT,
                category TEXT NOT NULL,
                tags TEXT[] NOT NULL DEFAULT '{{}}',
                on_sale BOOLEAN NOT NULL,
                created_at TIMESTAMPTZ NOT NULL
            )",
            PRODUCTS_TABLE
        );

        sqlx::query(&ddl)
            .execute(&*self.pool)
            .await
            .map_err(|e| RuntimeError::Store(format!("Failed to create schema: {}", e)))?;

        tracing::info!("✓ Catalog table '{}' ready", PRODUCTS_TABLE);
        Ok(())
    }

    fn row_to_record(row: &PgRow) -> Result<CatalogRecord> {
        let read_err = |e: sqlx::Error| RuntimeError::Store(format!("Failed to read row: {}", e));

        Ok(CatalogRecord {
            id: row.try_get("id").map_err(read_err)?,
            title: row.try_get("title").map_err(read_err)?,
            price: row.try_get("price").map_err(read_err)?,
            stock_status: row.try_get("stock_status").map_err(read_err)?,
            stock_quantity: row.try_get("stock_quantity").map_err(read_err)?,
            category: row.try_get("category").map_err(read_err)?,
            tags: row.try_get("tags").map_err(read_err)?,
            on_sale: row.try_get("on_sale").map_err(read_err)?,
            created_at: row.try_get("created_at").map_err(read_err)?,
        })
    }
}

#[async_trait::async_trait]
impl CatalogStore for PostgresStore {
    async fn upsert(&self, record: CatalogRecord) -> Result<()> {
        let query = format!(
            "INSERT INTO {} ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             ON CONFLICT (id) DO UPDATE SET
                title = EXCLUDED.title,
                price = EXCLUDED.price,
                stock_status = EXCLUDED.stock_status,
                stock_quantity = EXCLUDED.stock_quantity,
                category = EXCLUDED.category,
                tags = EXCLUDED.tags,
                on_sale = EXCLUDED.on_sale,
                created_at = EXCLUDED.created_at",
            PRODUCTS_TABLE,
            select_columns()
        );

        sqlx::query(&query)
            .bind(record.id)
            .bind(&record.title)
            .bind(record.price)
            .bind(&record.stock_status)
            .bind(record.stock_quantity)
            .bind(&record.category)
            .bind(&record.tags)
            .bind(record.on_sale)
            .bind(record.created_at)
            .execute(&*self.pool)
            .await
            .map_err(|e| RuntimeError::Store(format!("Database upsert failed: {}", e)))?;

        Ok(())
    }

    async fn find(&self, filters: &[Filter]) -> Result<Vec<CatalogRecord>> {
        let (where_clause, params) = build_where(filters);
        let sql = format!(
            "SELECT {} FROM {} WHERE {}",
            select_columns(),
            PRODUCTS_TABLE,
            where_clause
        );
        tracing::debug!(sql = %sql, params = params.len(), "Executing catalog query");

        let mut query = sqlx::query(&sql);
        for param in params {
            query = match param {
                SqlParam::Text(text) => query.bind(text),
                SqlParam::Float(n) => query.bind(n),
                SqlParam::Bool(b) => query.bind(b),
                SqlParam::Timestamp(ts) => query.bind(ts),
            };
        }

        let rows = query
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| RuntimeError::Store(format!("Database query failed: {}", e)))?;

        rows.iter().map(Self::row_to_record).collect()
    }

    async fn get(&self, id: i64) -> Result<Option<CatalogRecord>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = $1",
            select_columns(),
            PRODUCTS_TABLE
        );

        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| RuntimeError::Store(format!("Database query failed: {}", e)))?;

        row.as_ref().map(Self::row_to_record).transpose()
    }
}
