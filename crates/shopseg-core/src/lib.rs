//! shopseg Core - shared types for catalog sync and segment evaluation
//!
//! This crate provides the fundamental types used across the shopseg workspace:
//! - `CatalogRecord` and the closed `CatalogField` schema
//! - Condition literal values
//! - The segment condition language (operators, parsed conditions, compiler)
//! - Error types

pub mod condition;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use condition::{CompileSkip, CompiledConditions, Condition, ConditionParser, Operator};
pub use error::CoreError;
pub use types::{parse_timestamp, CatalogField, CatalogRecord, FieldKind, FieldValue, Value};
