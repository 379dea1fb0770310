//! Compiler errors

use thiserror::Error;

/// Errors detected before any query reaches storage
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// Unknown metric and/or dimension names, every offender listed
    #[error("{}", invalid_names_message(.metrics, .dimensions))]
    InvalidNames {
        metrics: Vec<String>,
        dimensions: Vec<String>,
    },
    /// No metric and no dimension requested
    #[error("Query must request at least one metric or dimension")]
    EmptyQuery,
    /// A filter value has the wrong type or cannot be parsed
    #[error("Invalid value for filter '{key}': {value}")]
    InvalidFilterValue { key: String, value: String },
    /// Unrecognized filter keys while unknown filters are rejected
    #[error("Unknown filter key(s): {}", .0.join(", "))]
    UnknownFilter(Vec<String>),
}

impl CompileError {
    /// Unknown metric names, if this is a name error
    pub fn invalid_metrics(&self) -> &[String] {
        match self {
            CompileError::InvalidNames { metrics, .. } => metrics,
            _ => &[],
        }
    }

    /// Unknown dimension names, if this is a name error
    pub fn invalid_dimensions(&self) -> &[String] {
        match self {
            CompileError::InvalidNames { dimensions, .. } => dimensions,
            _ => &[],
        }
    }

    pub(crate) fn invalid_value(key: impl Into<String>, value: impl ToString) -> Self {
        CompileError::InvalidFilterValue {
            key: key.into(),
            value: value.to_string(),
        }
    }
}

fn invalid_names_message(metrics: &[String], dimensions: &[String]) -> String {
    let mut parts = Vec::new();
    if !metrics.is_empty() {
        parts.push(format!("InvalidMetric: [{}]", metrics.join(", ")));
    }
    if !dimensions.is_empty() {
        parts.push(format!("InvalidDimension: [{}]", dimensions.join(", ")));
    }
    parts.join("; ")
}
