//! SQLite backend

use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{params_from_iter, Connection};
use serde_json::Value;

use crate::emitter::{Dialect, RenderedQuery};
use crate::plan::{Literal, TIMESTAMP_FORMAT};
use super::executor::{ExecutionError, QueryExecutor};

impl QueryExecutor for Connection {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn fetch(&self, query: &RenderedQuery) -> Result<Vec<Vec<Value>>, ExecutionError> {
        let mut stmt = self.prepare(&query.sql)?;
        let width = stmt.column_count();
        let params: Vec<SqlValue> = query.params.iter().map(to_sql_value).collect();

        let mut rows = stmt.query(params_from_iter(params.iter()))?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut record = Vec::with_capacity(width);
            for i in 0..width {
                record.push(to_json(row.get_ref(i)?));
            }
            out.push(record);
        }
        Ok(out)
    }
}

fn to_sql_value(lit: &Literal) -> SqlValue {
    match lit {
        Literal::Int(i) => SqlValue::Integer(*i),
        Literal::String(s) => SqlValue::Text(s.clone()),
        Literal::Timestamp(ts) => SqlValue::Text(ts.format(TIMESTAMP_FORMAT).to_string()),
    }
}

fn to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Value::String(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fetch_binds_numbered_params() {
        let conn = Connection::open_in_memory().unwrap();
        let query = RenderedQuery {
            sql: "SELECT ?2 AS a, ?1 AS b, ?3 AS c".into(),
            params: vec![
                Literal::Int(1),
                Literal::String("two".into()),
                Literal::Timestamp(
                    chrono::NaiveDate::from_ymd_opt(2024, 1, 5)
                        .unwrap()
                        .and_hms_opt(12, 30, 0)
                        .unwrap(),
                ),
            ],
        };
        let rows = conn.fetch(&query).unwrap();
        assert_eq!(
            rows,
            vec![vec![json!("two"), json!(1), json!("2024-01-05 12:30:00")]]
        );
    }

    #[test]
    fn test_fetch_converts_reals() {
        let conn = Connection::open_in_memory().unwrap();
        let query = RenderedQuery {
            sql: "SELECT 2.5, 1.0 / 0.0".into(),
            params: vec![],
        };
        let rows = conn.fetch(&query).unwrap();
        assert_eq!(rows[0][0], json!(2.5));
    }

    #[test]
    fn test_fetch_surfaces_sql_errors() {
        let conn = Connection::open_in_memory().unwrap();
        let query = RenderedQuery {
            sql: "SELECT * FROM missing_table".into(),
            params: vec![],
        };
        assert!(matches!(conn.fetch(&query), Err(ExecutionError::Sqlite(_))));
    }

    #[test]
    fn test_ping_open_connection() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(conn.ping().is_ok());
    }
}
