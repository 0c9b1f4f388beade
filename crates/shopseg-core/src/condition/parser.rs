//! Condition string parser
//!
//! Parses condition strings like:
//! - `price > 10`
//! - `category |= shoe`
//! - `on_sale = true`
//! - `title = 'Trail Runner'`

use super::operator::Operator;
use super::types::{CompileSkip, CompiledConditions, Condition, SkipReason};
use crate::types::Value;

/// Compiles condition strings into [`Condition`]s
#[derive(Debug, Default, Clone, Copy)]
pub struct ConditionParser;

/// Parse error
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub reason: SkipReason,
    pub condition: String,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to parse '{}': {}", self.condition, self.reason)
    }
}

impl std::error::Error for ParseError {}

impl ConditionParser {
    /// Create a new parser
    pub fn new() -> Self {
        Self
    }

    /// Compile an ordered sequence of condition strings.
    ///
    /// Strings that fail to parse are dropped and reported in
    /// [`CompiledConditions::skipped`]; the rest keep their input order.
    pub fn compile<S: AsRef<str>>(&self, conditions: &[S]) -> CompiledConditions {
        let mut compiled = CompiledConditions::default();

        for (index, raw) in conditions.iter().enumerate() {
            match self.parse_condition(raw.as_ref()) {
                Ok(condition) => compiled.conditions.push(condition),
                Err(err) => compiled.skipped.push(CompileSkip {
                    index,
                    condition: err.condition,
                    reason: err.reason,
                }),
            }
        }

        compiled
    }

    /// Parse a single `field operator value` string.
    pub fn parse_condition(&self, condition: &str) -> Result<Condition, ParseError> {
        let fail = |reason| ParseError {
            reason,
            condition: condition.to_string(),
        };

        let input = condition.trim();
        if input.is_empty() {
            return Err(fail(SkipReason::Empty));
        }

        let field_len = input
            .find(|c: char| !is_word_char(c))
            .unwrap_or(input.len());
        if field_len == 0 {
            return Err(fail(SkipReason::MissingField));
        }
        let (field, rest) = input.split_at(field_len);

        let rest = rest.trim_start();
        let (operator, token_len) =
            Operator::match_prefix(rest).ok_or_else(|| fail(SkipReason::NoOperator))?;

        let value_str = rest[token_len..].trim();
        if value_str.is_empty() {
            return Err(fail(SkipReason::MissingValue));
        }

        Ok(Condition::new(field, operator, self.parse_value(value_str)))
    }

    /// Coerce a raw value string.
    ///
    /// Priority: `true`/`false` (any case) → boolean, full numeric parse →
    /// number, otherwise the trimmed and unquoted text.
    pub fn parse_value(&self, value_str: &str) -> Value {
        let text = unquote(value_str.trim());

        if text.eq_ignore_ascii_case("true") {
            return Value::Bool(true);
        }
        if text.eq_ignore_ascii_case("false") {
            return Value::Bool(false);
        }

        match text.parse::<f64>() {
            Ok(num) if num.is_finite() => Value::Number(num),
            _ => Value::String(text.to_string()),
        }
    }
}

/// ASCII letters, digits and underscore
fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Remove one matching pair of surrounding straight quotes
fn unquote(text: &str) -> &str {
    let bytes = text.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        if (first == b'"' || first == b'\'') && bytes[bytes.len() - 1] == first {
            return &text[1..text.len() - 1];
        }
    }
    text
}
