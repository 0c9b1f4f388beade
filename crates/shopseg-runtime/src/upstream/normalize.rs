//! Upstream record normalization
//!
//! Maps one loosely-typed upstream product object onto a [`CatalogRecord`].
//! Unknown upstream fields are ignored. The transform is pure.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use shopseg_core::{parse_timestamp, CatalogRecord};
use thiserror::Error;

/// Why a single upstream record was rejected
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NormalizeError {
    /// Record has no usable key
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Invalid price for product {id}: {raw}")]
    InvalidPrice { id: i64, raw: String },

    #[error("Invalid creation date for product {id}: {raw}")]
    InvalidDate { id: i64, raw: String },

    /// Record shape does not match the expected field types
    #[error("Malformed record: {0}")]
    Malformed(String),
}

/// Upstream product shape (WooCommerce `/products` item)
#[derive(Debug, Deserialize)]
pub struct UpstreamProduct {
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<UpstreamPrice>,
    #[serde(default)]
    pub stock_status: Option<String>,
    #[serde(default)]
    pub stock_quantity: Option<i64>,
    #[serde(default)]
    pub categories: Option<Vec<NamedTerm>>,
    #[serde(default)]
    pub tags: Option<Vec<NamedTerm>>,
    #[serde(default)]
    pub on_sale: Option<bool>,
    #[serde(default)]
    pub date_created: Option<String>,
    #[serde(default)]
    pub date_created_gmt: Option<String>,
}

/// Price as sent upstream: usually text, sometimes a JSON number
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum UpstreamPrice {
    Number(f64),
    Text(String),
}

/// Category or tag reference
#[derive(Debug, Clone, Deserialize)]
pub struct NamedTerm {
    #[serde(default)]
    pub name: Option<String>,
}

/// Normalize a raw upstream JSON object into a catalog record.
pub fn normalize(raw: &serde_json::Value) -> Result<CatalogRecord, NormalizeError> {
    let has_id = raw.get("id").is_some_and(|id| !id.is_null());
    if !has_id {
        return Err(NormalizeError::InvalidRecord("missing id".to_string()));
    }

    let product = UpstreamProduct::deserialize(raw)
        .map_err(|e| NormalizeError::Malformed(e.to_string()))?;

    product.into_record()
}

impl UpstreamProduct {
    /// Convert into the canonical record shape
    pub fn into_record(self) -> Result<CatalogRecord, NormalizeError> {
        let id = self
            .id
            .ok_or_else(|| NormalizeError::InvalidRecord("missing id".to_string()))?;

        let price = parse_price(id, self.price.as_ref())?;
        let created_at = parse_created_at(
            id,
            self.date_created.as_deref().or(self.date_created_gmt.as_deref()),
        )?;

        let category = self
            .categories
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|term| term.name)
            .unwrap_or_default();

        let tags = self
            .tags
            .unwrap_or_default()
            .into_iter()
            .filter_map(|term| term.name)
            .collect();

        Ok(CatalogRecord {
            id,
            title: self.name.unwrap_or_default(),
            price,
            stock_status: self.stock_status.unwrap_or_default(),
            stock_quantity: self.stock_quantity,
            category,
            tags,
            on_sale: self.on_sale.unwrap_or(false),
            created_at,
        })
    }
}

fn parse_price(id: i64, price: Option<&UpstreamPrice>) -> Result<f64, NormalizeError> {
    let invalid = |raw: String| NormalizeError::InvalidPrice { id, raw };

    let value = match price {
        None => return Err(invalid("<missing>".to_string())),
        Some(UpstreamPrice::Number(n)) => *n,
        Some(UpstreamPrice::Text(text)) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| invalid(text.clone()))?,
    };

    if !value.is_finite() || value < 0.0 {
        return Err(invalid(value.to_string()));
    }
    Ok(value)
}

fn parse_created_at(id: i64, raw: Option<&str>) -> Result<DateTime<Utc>, NormalizeError> {
    let raw = raw.ok_or_else(|| NormalizeError::InvalidDate {
        id,
        raw: "<missing>".to_string(),
    })?;

    parse_timestamp(raw).ok_or_else(|| NormalizeError::InvalidDate {
        id,
        raw: raw.to_string(),
    })
}
