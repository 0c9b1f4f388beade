//! Type definitions for catalog records and condition values

pub mod record;
pub mod timestamp;
pub mod value;

pub use record::{CatalogField, CatalogRecord, FieldKind, FieldValue};
pub use timestamp::parse_timestamp;
pub use value::{format_number, Value};
