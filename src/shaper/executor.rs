//! Storage access seam

use serde_json::Value;
use thiserror::Error;

use crate::emitter::{Dialect, RenderedQuery};

/// Errors raised while running a rendered query against storage
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Failure reported by a non-SQLite backend
    #[error("Storage error: {0}")]
    Backend(String),
    #[error("Result row has {actual} columns, expected {expected}")]
    ColumnMismatch { expected: usize, actual: usize },
}

/// Something that can run a rendered query and hand back raw rows.
///
/// One call per request, no retries; timeouts are the backend's business.
pub trait QueryExecutor {
    /// Dialect the backend understands
    fn dialect(&self) -> Dialect;

    /// Run the query, returning each row as values in SELECT order
    fn fetch(&self, query: &RenderedQuery) -> Result<Vec<Vec<Value>>, ExecutionError>;

    /// Round-trip a trivial statement to check that storage answers
    fn ping(&self) -> Result<(), ExecutionError> {
        let rows = self.fetch(&RenderedQuery {
            sql: "SELECT 1".to_string(),
            params: Vec::new(),
        })?;
        match rows.first().and_then(|row| row.first()) {
            Some(value) if value.as_i64() == Some(1) => Ok(()),
            other => Err(ExecutionError::Backend(format!(
                "unexpected health check result: {:?}",
                other
            ))),
        }
    }
}
