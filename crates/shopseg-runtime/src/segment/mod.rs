//! Segment evaluation
//!
//! Compiles condition strings, turns each surviving condition into a store
//! filter and returns the records matching all of them.

use crate::error::{Result, RuntimeError};
use crate::store::query::portable_pattern;
use crate::store::{CatalogStore, Filter, FilterOperator};
use shopseg_core::{CatalogRecord, Condition, ConditionParser, Operator, Value};
use std::sync::Arc;
use tracing::debug;

/// Evaluates segment definitions against a catalog store
pub struct SegmentEvaluator {
    store: Arc<dyn CatalogStore>,
    parser: ConditionParser,
}

impl SegmentEvaluator {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self {
            store,
            parser: ConditionParser::new(),
        }
    }

    /// Evaluate a segment.
    ///
    /// `None` means the caller supplied no condition list at all and is
    /// rejected. An empty list, or one where every string was dropped, selects
    /// the whole catalog.
    pub async fn evaluate<S: AsRef<str>>(
        &self,
        conditions: Option<&[S]>,
    ) -> Result<Vec<CatalogRecord>> {
        let conditions = conditions
            .ok_or_else(|| RuntimeError::InvalidRequest("Conditions are required".to_string()))?;

        let compiled = self.parser.compile(conditions);
        for skip in &compiled.skipped {
            debug!(
                index = skip.index,
                condition = %skip.condition,
                reason = %skip.reason,
                "Dropping malformed condition"
            );
        }

        let filters: Vec<Filter> = compiled.conditions.iter().map(to_filter).collect();
        debug!(filters = filters.len(), "Evaluating segment");

        self.store.find(&filters).await
    }
}

/// Translate a compiled condition into a store filter clause
pub fn to_filter(condition: &Condition) -> Filter {
    let operator = match condition.operator {
        Operator::Eq => FilterOperator::Eq,
        Operator::Gt => FilterOperator::Gt,
        Operator::Gte => FilterOperator::Ge,
        Operator::Lt => FilterOperator::Lt,
        Operator::Lte => FilterOperator::Le,
        Operator::Matches => FilterOperator::Regex,
    };

    let value = match operator {
        FilterOperator::Regex => Value::String(portable_pattern(&condition.value.to_string())),
        _ => condition.value.clone(),
    };

    Filter::new(condition.field.clone(), operator, value)
}
