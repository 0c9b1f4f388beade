//! Condition operators

use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison operator of a single condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    /// Equal (=)
    Eq,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    Gte,
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    Lte,
    /// Case-insensitive pattern match (|=)
    Matches,
}

impl Operator {
    /// Operator tokens ordered so that two-character tokens are tried before
    /// their one-character prefixes.
    pub const TOKENS: [(&'static str, Operator); 6] = [
        (">=", Operator::Gte),
        ("<=", Operator::Lte),
        ("|=", Operator::Matches),
        ("=", Operator::Eq),
        (">", Operator::Gt),
        ("<", Operator::Lt),
    ];

    /// Source token for this operator
    pub fn token(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Matches => "|=",
        }
    }

    /// Match the longest operator token at the start of `input`
    pub fn match_prefix(input: &str) -> Option<(Operator, usize)> {
        Self::TOKENS
            .iter()
            .find(|(token, _)| input.starts_with(token))
            .map(|(token, op)| (*op, token.len()))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}
