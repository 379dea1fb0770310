//! Compile, execute and shape a request into a response body

use std::time::Instant;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

use crate::compiler::{compile_with, CompileOptions, CompiledQuery};
use crate::emitter::emit_sql;
use crate::error::AnalyticsError;
use crate::query::{DateRange, QueryRequest};
use super::executor::{ExecutionError, QueryExecutor};

/// Response body for an analytics query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResponse {
    /// One object per row, keys in output column order
    pub data: Vec<Map<String, Value>>,
    pub metadata: ResultMetadata,
    pub query_info: QueryInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultMetadata {
    pub total_rows: usize,
    pub columns: Vec<String>,
    pub execution_time_ms: f64,
}

/// Echo of what the caller asked for
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryInfo {
    pub metrics_requested: Vec<String>,
    pub dimensions_requested: Vec<String>,
    pub filters_applied: Map<String, Value>,
    pub date_range: Option<DateRange>,
    /// Filter keys present in the request but not recognized
    pub ignored_filters: Vec<String>,
}

/// Compile, render, execute and shape in one step.
pub fn run_query<E>(
    executor: &E,
    request: &QueryRequest,
    options: &CompileOptions,
) -> Result<QueryResponse, AnalyticsError>
where
    E: QueryExecutor + ?Sized,
{
    let compiled = compile_with(request, options)?;
    execute_compiled(executor, request, &compiled)
}

/// Execute an already compiled request.
pub fn execute_compiled<E>(
    executor: &E,
    request: &QueryRequest,
    compiled: &CompiledQuery,
) -> Result<QueryResponse, AnalyticsError>
where
    E: QueryExecutor + ?Sized,
{
    let rendered = emit_sql(&compiled.plan, executor.dialect())?;

    let started = Instant::now();
    let rows = executor.fetch(&rendered)?;
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

    let data = shape_rows(&compiled.columns, rows)?;
    info!(
        rows = data.len(),
        elapsed_ms,
        dialect = %executor.dialect(),
        "executed analytics query"
    );

    Ok(QueryResponse {
        metadata: ResultMetadata {
            total_rows: data.len(),
            columns: compiled.columns.clone(),
            execution_time_ms: elapsed_ms,
        },
        query_info: QueryInfo {
            metrics_requested: request.metrics.clone(),
            dimensions_requested: request.dimensions.clone(),
            filters_applied: request.filters.clone(),
            date_range: request.date_range.clone(),
            ignored_filters: compiled.ignored_filters.clone(),
        },
        data,
    })
}

/// Key each row by the output column names, preserving column order.
pub fn shape_rows(
    columns: &[String],
    rows: Vec<Vec<Value>>,
) -> Result<Vec<Map<String, Value>>, ExecutionError> {
    rows.into_iter()
        .map(|row| {
            if row.len() != columns.len() {
                return Err(ExecutionError::ColumnMismatch {
                    expected: columns.len(),
                    actual: row.len(),
                });
            }
            Ok(columns.iter().cloned().zip(row).collect())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use crate::emitter::{Dialect, RenderedQuery};
    use crate::plan::Literal;
    use serde_json::json;

    #[test]
    fn test_shape_rows_preserves_column_order() {
        let columns = vec!["month".to_string(), "channel".to_string(), "total".to_string()];
        let shaped = shape_rows(&columns, vec![vec![json!("2024-01-01"), json!("app"), json!(10)]]).unwrap();
        let keys: Vec<&String> = shaped[0].keys().collect();
        assert_eq!(keys, vec!["month", "channel", "total"]);
        assert_eq!(shaped[0]["total"], json!(10));
    }

    /// Records the rendered query and answers with canned rows
    struct Recording {
        seen: RefCell<Option<RenderedQuery>>,
        rows: Vec<Vec<Value>>,
    }

    impl QueryExecutor for Recording {
        fn dialect(&self) -> Dialect {
            Dialect::Postgres
        }

        fn fetch(&self, query: &RenderedQuery) -> Result<Vec<Vec<Value>>, ExecutionError> {
            *self.seen.borrow_mut() = Some(query.clone());
            Ok(self.rows.clone())
        }
    }

    #[test]
    fn test_run_query_renders_for_executor_dialect() {
        let executor = Recording {
            seen: RefCell::new(None),
            rows: vec![vec![json!("app"), json!(12)]],
        };
        let request = QueryRequest::new(["total_orders"], ["channel"])
            .with_filter("status", json!(["delivered"]))
            .with_filter("regoin", json!(["south"]));

        let response = run_query(&executor, &request, &CompileOptions::default()).unwrap();

        let seen = executor.seen.borrow().clone().unwrap();
        assert!(seen.sql.contains("o.status IN ($1)"), "{}", seen.sql);
        assert_eq!(seen.params, vec![Literal::String("delivered".into())]);

        assert_eq!(response.metadata.total_rows, 1);
        assert_eq!(response.data[0]["channel"], json!("app"));
        assert_eq!(response.query_info.ignored_filters, vec!["regoin"]);
        assert_eq!(response.query_info.filters_applied.len(), 2);
    }

    #[test]
    fn test_run_query_rejects_before_fetch() {
        let executor = Recording {
            seen: RefCell::new(None),
            rows: vec![],
        };
        let err = run_query(&executor, &QueryRequest::new(["foo"], ["bar"]), &CompileOptions::default())
            .unwrap_err();
        assert!(err.is_client_error());
        assert!(executor.seen.borrow().is_none());
    }

    #[test]
    fn test_response_serializes_in_wire_shape() {
        let executor = Recording {
            seen: RefCell::new(None),
            rows: vec![vec![json!(3)]],
        };
        let request = QueryRequest::new(["repeat_customers"], Vec::<String>::new());
        let response = run_query(&executor, &request, &CompileOptions::default()).unwrap();

        let body = serde_json::to_value(&response).unwrap();
        assert_eq!(body["data"], json!([{"repeat_customers": 3}]));
        assert_eq!(body["metadata"]["columns"], json!(["repeat_customers"]));
        assert_eq!(body["query_info"]["metrics_requested"], json!(["repeat_customers"]));
        assert!(body["query_info"]["date_range"].is_null());
    }

    #[test]
    fn test_shape_rows_rejects_width_mismatch() {
        let columns = vec!["a".to_string()];
        let err = shape_rows(&columns, vec![vec![json!(1), json!(2)]]).unwrap_err();
        assert!(matches!(err, ExecutionError::ColumnMismatch { expected: 1, actual: 2 }));
    }
}
