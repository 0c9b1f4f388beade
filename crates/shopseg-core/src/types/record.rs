//! Catalog record model
//!
//! `CatalogRecord` is the canonical, normalized shape of one product. It is
//! keyed by the upstream-assigned `id`; the sync pipeline is the only writer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// One catalog item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    /// Upstream identifier, unique and stable across syncs
    pub id: i64,
    pub title: String,
    /// Always numeric, even when upstream sends text
    pub price: f64,
    /// e.g. "instock", "outofstock", "onbackorder"
    pub stock_status: String,
    /// Absent when the upstream does not track stock for the item
    pub stock_quantity: Option<i64>,
    /// First upstream category name, or empty
    pub category: String,
    /// Upstream tag names in upstream order
    pub tags: Vec<String>,
    pub on_sale: bool,
    pub created_at: DateTime<Utc>,
}

/// Queryable record fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogField {
    Id,
    Title,
    Price,
    StockStatus,
    StockQuantity,
    Category,
    Tags,
    OnSale,
    CreatedAt,
}

/// Storage kind of a field, used to decide comparison compatibility
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Decimal,
    Text,
    TextList,
    Bool,
    Timestamp,
}

impl FieldKind {
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldKind::Integer | FieldKind::Decimal)
    }
}

impl CatalogField {
    /// Every field, in declaration order
    pub const ALL: [CatalogField; 9] = [
        CatalogField::Id,
        CatalogField::Title,
        CatalogField::Price,
        CatalogField::StockStatus,
        CatalogField::StockQuantity,
        CatalogField::Category,
        CatalogField::Tags,
        CatalogField::OnSale,
        CatalogField::CreatedAt,
    ];

    /// Field name as it appears in conditions, JSON output and store columns
    pub fn name(&self) -> &'static str {
        match self {
            CatalogField::Id => "id",
            CatalogField::Title => "title",
            CatalogField::Price => "price",
            CatalogField::StockStatus => "stock_status",
            CatalogField::StockQuantity => "stock_quantity",
            CatalogField::Category => "category",
            CatalogField::Tags => "tags",
            CatalogField::OnSale => "on_sale",
            CatalogField::CreatedAt => "created_at",
        }
    }

    /// Look up a field by its exact (case-sensitive) name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            CatalogField::Id | CatalogField::StockQuantity => FieldKind::Integer,
            CatalogField::Price => FieldKind::Decimal,
            CatalogField::Title | CatalogField::StockStatus | CatalogField::Category => {
                FieldKind::Text
            }
            CatalogField::Tags => FieldKind::TextList,
            CatalogField::OnSale => FieldKind::Bool,
            CatalogField::CreatedAt => FieldKind::Timestamp,
        }
    }
}

impl fmt::Display for CatalogField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CatalogField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| CoreError::UnknownField(s.to_string()))
    }
}

/// Borrowed view of a single field's value on a record
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    Number(f64),
    Text(&'a str),
    TextList(&'a [String]),
    Bool(bool),
    Timestamp(DateTime<Utc>),
    /// Field has no value on this record (e.g. untracked stock)
    Absent,
}

impl CatalogRecord {
    /// Read one field by schema name
    pub fn field_value(&self, field: CatalogField) -> FieldValue<'_> {
        match field {
            CatalogField::Id => FieldValue::Number(self.id as f64),
            CatalogField::Title => FieldValue::Text(&self.title),
            CatalogField::Price => FieldValue::Number(self.price),
            CatalogField::StockStatus => FieldValue::Text(&self.stock_status),
            CatalogField::StockQuantity => match self.stock_quantity {
                Some(quantity) => FieldValue::Number(quantity as f64),
                None => FieldValue::Absent,
            },
            CatalogField::Category => FieldValue::Text(&self.category),
            CatalogField::Tags => FieldValue::TextList(&self.tags),
            CatalogField::OnSale => FieldValue::Bool(self.on_sale),
            CatalogField::CreatedAt => FieldValue::Timestamp(self.created_at),
        }
    }
}
