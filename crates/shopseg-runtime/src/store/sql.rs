//! SQL translation of filter clauses
//!
//! Column names come only from [`CatalogField`]; every condition value is a
//! bound parameter. Clauses that can never match (unknown field, mismatched
//! types) become `FALSE` instead of a query error.

use super::query::{portable_pattern, Filter, FilterOperator};
use chrono::{DateTime, Utc};
use shopseg_core::{parse_timestamp, CatalogField, FieldKind, Value};

/// Table holding catalog records
pub const PRODUCTS_TABLE: &str = "products";

/// `to_char` layout matching the in-memory text form of a timestamp
const TIMESTAMP_TEXT_FORMAT: &str = r#"'YYYY-MM-DD"T"HH24:MI:SS"+00:00"'"#;

/// Column list in `CatalogField::ALL` order
pub fn select_columns() -> String {
    CatalogField::ALL
        .iter()
        .map(|field| field.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A bound query parameter
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Float(f64),
    Bool(bool),
    Timestamp(DateTime<Utc>),
}

/// Build a `WHERE` clause body (without the keyword) and its parameters.
///
/// Returns `TRUE` for an empty filter list. Placeholders start at `$1`.
pub fn build_where(filters: &[Filter]) -> (String, Vec<SqlParam>) {
    let mut params = Vec::new();
    let clauses: Vec<String> = filters
        .iter()
        .map(|filter| build_clause(filter, &mut params))
        .collect();

    if clauses.is_empty() {
        ("TRUE".to_string(), params)
    } else {
        (clauses.join(" AND "), params)
    }
}

fn build_clause(filter: &Filter, params: &mut Vec<SqlParam>) -> String {
    let Some(field) = CatalogField::from_name(&filter.field) else {
        return "FALSE".to_string();
    };
    let column = field.name();
    let kind = field.kind();

    if filter.operator == FilterOperator::Regex {
        params.push(SqlParam::Text(portable_pattern(&filter.value.to_string())));
        let placeholder = format!("${}", params.len());
        return match kind {
            FieldKind::Text => format!("{} ~* {}", column, placeholder),
            FieldKind::TextList => format!(
                "EXISTS (SELECT 1 FROM unnest({}) AS t(tag) WHERE t.tag ~* {})",
                column, placeholder
            ),
            FieldKind::Timestamp => format!(
                "to_char({} AT TIME ZONE 'UTC', {}) ~* {}",
                column, TIMESTAMP_TEXT_FORMAT, placeholder
            ),
            _ => format!("{}::text ~* {}", column, placeholder),
        };
    }

    let Some(op) = filter.operator.sql_token() else {
        return "FALSE".to_string();
    };

    let param = match (kind, &filter.value) {
        (kind, Value::Number(n)) if kind.is_numeric() => SqlParam::Float(*n),
        (FieldKind::Text | FieldKind::TextList, Value::String(s)) => SqlParam::Text(s.clone()),
        (FieldKind::Bool, Value::Bool(b)) => SqlParam::Bool(*b),
        (FieldKind::Timestamp, Value::String(s)) => match parse_timestamp(s) {
            Some(ts) => SqlParam::Timestamp(ts),
            None => return "FALSE".to_string(),
        },
        _ => return "FALSE".to_string(),
    };
    params.push(param);
    let placeholder = format!("${}", params.len());

    match kind {
        FieldKind::Text => format!("{} COLLATE \"C\" {} {}", column, op, placeholder),
        FieldKind::TextList => format!(
            "EXISTS (SELECT 1 FROM unnest({}) AS t(tag) WHERE t.tag COLLATE \"C\" {} {})",
            column, op, placeholder
        ),
        _ => format!("{} {} {}", column, op, placeholder),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filters() {
        let (sql, params) = build_where(&[]);
        assert_eq!(sql, "TRUE");
        assert!(params.is_empty());
    }

    #[test]
    fn test_numeric_and_text_clauses() {
        let filters = vec![
            Filter::new("price", FilterOperator::Gt, Value::Number(10.0)),
            Filter::new("category", FilterOperator::Eq, Value::String("Shoes".into())),
        ];
        let (sql, params) = build_where(&filters);

        assert_eq!(sql, "price > $1 AND category COLLATE \"C\" = $2");
        assert_eq!(
            params,
            vec![SqlParam::Float(10.0), SqlParam::Text("Shoes".to_string())]
        );
    }

    #[test]
    fn test_regex_clauses() {
        let filters = vec![
            Filter::new("category", FilterOperator::Regex, Value::String("shoe".into())),
            Filter::new("tags", FilterOperator::Regex, Value::String("sale".into())),
            Filter::new("price", FilterOperator::Regex, Value::Number(15.0)),
        ];
        let (sql, params) = build_where(&filters);

        assert_eq!(
            sql,
            "category ~* $1 AND EXISTS (SELECT 1 FROM unnest(tags) AS t(tag) WHERE t.tag ~* $2) \
             AND price::text ~* $3"
        );
        assert_eq!(params[2], SqlParam::Text("15".to_string()));
    }

    #[test]
    fn test_regex_pattern_is_escaped_for_postgres() {
        let filters = vec![
            Filter::new("title", FilterOperator::Regex, Value::String("a\\z".into())),
            Filter::new("title", FilterOperator::Regex, Value::String("\\p{L}".into())),
            Filter::new("title", FilterOperator::Regex, Value::String("(?P<n>x)".into())),
            Filter::new("title", FilterOperator::Regex, Value::String("^sho.*s$".into())),
        ];
        let (sql, params) = build_where(&filters);

        assert_eq!(sql, "title ~* $1 AND title ~* $2 AND title ~* $3 AND title ~* $4");
        assert_eq!(
            params,
            vec![
                SqlParam::Text("a\\\\z".to_string()),
                SqlParam::Text("\\\\p\\{L\\}".to_string()),
                SqlParam::Text("\\(\\?P<n>x\\)".to_string()),
                SqlParam::Text("^sho.*s$".to_string()),
            ]
        );
    }

    #[test]
    fn test_regex_on_timestamp_uses_iso_text() {
        let filters = vec![Filter::new(
            "created_at",
            FilterOperator::Regex,
            Value::String("T08".into()),
        )];
        let (sql, params) = build_where(&filters);

        assert_eq!(
            sql,
            "to_char(created_at AT TIME ZONE 'UTC', 'YYYY-MM-DD\"T\"HH24:MI:SS\"+00:00\"') ~* $1"
        );
        assert_eq!(params, vec![SqlParam::Text("T08".to_string())]);
    }

    #[test]
    fn test_mismatch_and_unknown_become_false() {
        let filters = vec![
            Filter::new("price", FilterOperator::Gt, Value::String("cheap".into())),
            Filter::new("brand", FilterOperator::Eq, Value::String("acme".into())),
            Filter::new("on_sale", FilterOperator::Eq, Value::String("true".into())),
            Filter::new("created_at", FilterOperator::Gt, Value::String("soon".into())),
        ];
        let (sql, params) = build_where(&filters);

        assert_eq!(sql, "FALSE AND FALSE AND FALSE AND FALSE");
        assert!(params.is_empty());
    }

    #[test]
    fn test_placeholders_skip_false_clauses() {
        let filters = vec![
            Filter::new("brand", FilterOperator::Eq, Value::String("acme".into())),
            Filter::new("on_sale", FilterOperator::Eq, Value::Bool(true)),
        ];
        let (sql, params) = build_where(&filters);

        assert_eq!(sql, "FALSE AND on_sale = $1");
        assert_eq!(params, vec![SqlParam::Bool(true)]);
    }

    #[test]
    fn test_timestamp_clause() {
        let filters = vec![Filter::new(
            "created_at",
            FilterOperator::Ge,
            Value::String("2024-01-01".into()),
        )];
        let (sql, params) = build_where(&filters);

        assert_eq!(sql, "created_at >= $1");
        assert!(matches!(params[0], SqlParam::Timestamp(_)));
    }

    #[test]
    fn test_select_columns() {
        assert_eq!(
            select_columns(),
            "id, title, price, stock_status, stock_quantity, category, tags, on_sale, created_at"
        );
    }
}
