//! Condition types produced by the compiler

use super::operator::Operator;
use crate::types::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A parsed `field operator value` clause
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Bare field name as written (word characters only)
    pub field: String,
    pub operator: Operator,
    /// Coerced value
    pub value: Value,
}

impl Condition {
    pub fn new(field: impl Into<String>, operator: Operator, value: Value) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.operator, self.value)
    }
}

/// Why a condition string was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Blank input
    Empty,
    /// Input does not start with a word-character field name
    MissingField,
    /// No recognized operator follows the field name
    NoOperator,
    /// Nothing follows the operator
    MissingValue,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            SkipReason::Empty => "empty condition",
            SkipReason::MissingField => "missing field name",
            SkipReason::NoOperator => "no operator found",
            SkipReason::MissingValue => "missing value",
        };
        f.write_str(message)
    }
}

/// A condition string that was dropped during compilation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompileSkip {
    /// Position of the string in the input sequence
    pub index: usize,
    /// The condition string as given
    pub condition: String,
    pub reason: SkipReason,
}

/// Result of compiling a sequence of condition strings
///
/// `conditions` keeps the input order of the strings that parsed.
/// Dropped strings never abort compilation; they are listed in `skipped`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledConditions {
    pub conditions: Vec<Condition>,
    pub skipped: Vec<CompileSkip>,
}

impl CompiledConditions {
    /// True when no condition survived, i.e. the segment is unfiltered
    pub fn is_unfiltered(&self) -> bool {
        self.conditions.is_empty()
    }
}
