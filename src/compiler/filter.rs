//! Filter sanitization
//!
//! Every value that survives sanitization ends up as a bound parameter.
//! Integer filters fail the whole request on bad input; text filters drop
//! offending values and keep their siblings.

use serde_json::Value;
use tracing::debug;

use crate::catalog::{FilterKey, FilterKind};
use crate::plan::{Expr, Literal};
use super::error::CompileError;

/// Whether a text filter value passes the allow-list: letters, digits,
/// spaces and underscores, with at least one letter or digit.
pub fn is_allowed_text(value: &str) -> bool {
    value.chars().any(char::is_alphanumeric)
        && value
            .chars()
            .all(|c| c.is_alphanumeric() || c == ' ' || c == '_')
}

/// A scalar counts as a one-element list; null counts as absent.
fn as_list(value: &Value) -> Vec<&Value> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    }
}

/// Coerce every value to an integer, failing on the first that is not one.
pub fn sanitize_integers(key: FilterKey, value: &Value) -> Result<Vec<i64>, CompileError> {
    as_list(value)
        .into_iter()
        .map(|item| {
            let parsed = match item {
                Value::Number(n) => n.as_i64(),
                Value::String(s) => s.trim().parse::<i64>().ok(),
                _ => None,
            };
            parsed.ok_or_else(|| CompileError::invalid_value(key.name(), item))
        })
        .collect()
}

/// Keep the values that pass the allow-list, dropping the rest.
pub fn sanitize_text(key: FilterKey, value: &Value) -> Vec<String> {
    as_list(value)
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) if is_allowed_text(s) => Some(s.clone()),
            other => {
                debug!(filter = key.name(), value = %other, "dropping disallowed filter value");
                None
            }
        })
        .collect()
}

/// Build the membership condition for one recognized filter.
///
/// Returns `None` when the caller supplied no values (null or empty list).
/// When values were supplied but all were dropped, the condition matches
/// nothing.
pub fn membership_condition(key: FilterKey, value: &Value) -> Result<Option<Expr>, CompileError> {
    if as_list(value).is_empty() {
        return Ok(None);
    }

    let values: Vec<Expr> = match key.kind() {
        FilterKind::Integer => sanitize_integers(key, value)?
            .into_iter()
            .map(|id| Expr::Param(Literal::Int(id)))
            .collect(),
        FilterKind::Text => sanitize_text(key, value)
            .into_iter()
            .map(|s| Expr::Param(Literal::String(s)))
            .collect(),
    };

    Ok(Some(Expr::In {
        expr: Box::new(Expr::Column(key.column())),
        values,
    }))
}
