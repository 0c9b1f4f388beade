//! Segment condition language
//!
//! A segment is described by an ordered list of condition strings. Each string
//! is one `field operator value` clause; all clauses are combined with AND.
//! There is no OR and no grouping.
//!
//! # Syntax
//!
//! ```text
//! price > 10
//! category |= shoe
//! on_sale = true
//! title = "Trail Runner"
//! ```
//!
//! ## Supported Operators
//! - `=` (equal)
//! - `>` (greater than)
//! - `>=` (greater than or equal)
//! - `<` (less than)
//! - `<=` (less than or equal)
//! - `|=` (case-insensitive pattern match)
//!
//! ## Values
//! The value is everything after the operator, trimmed, with one matching pair
//! of surrounding `"` or `'` removed. It is then coerced, in order, to a
//! boolean (`true`/`false`, any case), a number, or left as text.
//!
//! A string that cannot be parsed is not an error: it is dropped and reported
//! as a [`CompileSkip`] next to the conditions that did compile.

mod operator;
mod parser;
mod types;

pub use operator::Operator;
pub use parser::{ConditionParser, ParseError};
pub use types::{CompileSkip, CompiledConditions, Condition, SkipReason};
