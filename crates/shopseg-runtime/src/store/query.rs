//! Store-level filter clauses and in-process matching

use crate::error::{Result, RuntimeError};
use chrono::{DateTime, Utc};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use shopseg_core::types::format_number;
use shopseg_core::{parse_timestamp, CatalogField, CatalogRecord, FieldValue, Value};
use std::cmp::Ordering;

/// One filter clause; a query is the conjunction of its clauses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    /// Field to filter on
    pub field: String,

    /// Operator
    pub operator: FilterOperator,

    /// Value to compare against; for `Regex`, the pattern text
    pub value: Value,
}

/// Filter operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    Eq,    // =
    Gt,    // >
    Ge,    // >=
    Lt,    // <
    Le,    // <=
    Regex, // case-insensitive regex match
}

impl FilterOperator {
    /// SQL comparison token for the ordering/equality operators
    pub fn sql_token(&self) -> Option<&'static str> {
        match self {
            FilterOperator::Eq => Some("="),
            FilterOperator::Gt => Some(">"),
            FilterOperator::Ge => Some(">="),
            FilterOperator::Lt => Some("<"),
            FilterOperator::Le => Some("<="),
            FilterOperator::Regex => None,
        }
    }

    fn accepts(&self, ordering: Ordering) -> bool {
        match self {
            FilterOperator::Eq => ordering == Ordering::Equal,
            FilterOperator::Gt => ordering == Ordering::Greater,
            FilterOperator::Ge => ordering != Ordering::Less,
            FilterOperator::Lt => ordering == Ordering::Less,
            FilterOperator::Le => ordering != Ordering::Greater,
            FilterOperator::Regex => false,
        }
    }
}

impl Filter {
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: Value) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }
}

/// Pattern text both store backends evaluate the same way.
///
/// Text that is not a valid pattern, or that uses syntax outside the subset
/// shared by the `regex` crate and PostgreSQL's `~*` (inline flags and named
/// groups, POSIX bracket classes, letter escapes other than `\d \s \w` and
/// their negations), is escaped and matches literally.
pub fn portable_pattern(text: &str) -> String {
    let valid = RegexBuilder::new(text).case_insensitive(true).build().is_ok();
    if valid && is_portable(text) {
        text.to_string()
    } else {
        regex::escape(text)
    }
}

fn is_portable(text: &str) -> bool {
    let mut chars = text.chars().peekable();
    let mut in_class = false;

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('d' | 's' | 'w') => {}
                // PostgreSQL rejects the negated shorthands inside brackets
                Some('D' | 'S' | 'W') if !in_class => {}
                // `\<` and `\>` are word boundaries here but literals in PostgreSQL
                Some('<' | '>') => return false,
                Some(escaped) if escaped.is_ascii_punctuation() => {}
                _ => return false,
            },
            '(' if !in_class && chars.peek() == Some(&'?') => return false,
            '[' if in_class => return false,
            '[' => {
                in_class = true;
                if chars.peek() == Some(&'^') {
                    chars.next();
                }
                // a leading `]` is a literal member
                if chars.peek() == Some(&']') {
                    chars.next();
                }
            }
            ']' if in_class => in_class = false,
            _ => {}
        }
    }
    true
}

/// Whole-second UTC layout used when a timestamp is matched as text
const TIMESTAMP_TEXT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S+00:00";

/// A filter prepared for matching records in memory
pub(crate) struct FilterMatcher {
    field: Option<CatalogField>,
    operator: FilterOperator,
    value: Value,
    /// Parsed form of a text value, for timestamp fields
    timestamp: Option<DateTime<Utc>>,
    pattern: Option<Regex>,
}

impl FilterMatcher {
    pub(crate) fn new(filter: &Filter) -> Result<Self> {
        let pattern = match filter.operator {
            FilterOperator::Regex => Some(
                RegexBuilder::new(&filter.value.to_string())
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| RuntimeError::Store(format!("Invalid pattern: {}", e)))?,
            ),
            _ => None,
        };

        Ok(Self {
            field: CatalogField::from_name(&filter.field),
            operator: filter.operator,
            timestamp: filter.value.as_str().and_then(parse_timestamp),
            value: filter.value.clone(),
            pattern,
        })
    }

    /// Unknown fields, absent values and mismatched types never match
    pub(crate) fn matches(&self, record: &CatalogRecord) -> bool {
        let Some(field) = self.field else {
            return false;
        };

        match record.field_value(field) {
            FieldValue::TextList(items) => items
                .iter()
                .any(|item| self.matches_value(&FieldValue::Text(item))),
            other => self.matches_value(&other),
        }
    }

    fn matches_value(&self, field_value: &FieldValue<'_>) -> bool {
        if let Some(pattern) = &self.pattern {
            return text_form(field_value).is_some_and(|text| pattern.is_match(&text));
        }

        self.compare(field_value)
            .is_some_and(|ordering| self.operator.accepts(ordering))
    }

    fn compare(&self, field_value: &FieldValue<'_>) -> Option<Ordering> {
        match (field_value, &self.value) {
            (FieldValue::Number(l), Value::Number(r)) => l.partial_cmp(r),
            (FieldValue::Text(l), Value::String(r)) => Some((*l).cmp(r.as_str())),
            (FieldValue::Bool(l), Value::Bool(r)) => Some(l.cmp(r)),
            (FieldValue::Timestamp(l), Value::String(_)) => {
                self.timestamp.map(|r| l.cmp(&r))
            }
            _ => None,
        }
    }
}

fn text_form(field_value: &FieldValue<'_>) -> Option<String> {
    match field_value {
        FieldValue::Text(s) => Some((*s).to_string()),
        FieldValue::Number(n) => Some(format_number(*n)),
        FieldValue::Bool(b) => Some(b.to_string()),
        FieldValue::Timestamp(t) => Some(t.format(TIMESTAMP_TEXT_FORMAT).to_string()),
        FieldValue::TextList(_) | FieldValue::Absent => None,
    }
}
