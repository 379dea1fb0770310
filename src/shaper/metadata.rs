//! Capability discovery for UI collaborators

use serde::Serialize;
use serde_json::Value;

use crate::catalog::{Dimension, Metric, Registry};
use crate::emitter::RenderedQuery;
use super::executor::{ExecutionError, QueryExecutor};

/// What a caller may ask for, and the current values of filterable fields
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    pub metrics: Vec<&'static str>,
    pub dimensions: Vec<&'static str>,
    pub filters: FilterOptions,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FilterOptions {
    pub stores: Vec<StoreOption>,
    pub channels: Vec<String>,
    pub product_categories: Vec<String>,
    pub statuses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreOption {
    pub id: i64,
    pub name: String,
}

const STORES_SQL: &str = "SELECT id, name FROM stores ORDER BY name";
const CHANNELS_SQL: &str = "SELECT DISTINCT channel FROM orders WHERE channel IS NOT NULL ORDER BY channel";
const CATEGORIES_SQL: &str = "SELECT DISTINCT category FROM products WHERE category IS NOT NULL ORDER BY category";
const STATUSES_SQL: &str = "SELECT DISTINCT status FROM orders WHERE status IS NOT NULL ORDER BY status";

/// Catalog names only, no storage access
pub fn catalog_metadata() -> Metadata {
    Metadata {
        metrics: Metric::names(),
        dimensions: Dimension::names(),
        filters: FilterOptions::default(),
    }
}

/// Catalog names plus distinct filter values read from storage.
pub fn describe<E>(executor: &E) -> Result<Metadata, ExecutionError>
where
    E: QueryExecutor + ?Sized,
{
    let stores = fetch_fixed(executor, STORES_SQL)?
        .into_iter()
        .filter_map(|row| {
            let id = row.first().and_then(Value::as_i64)?;
            let name = row.get(1).map(text).unwrap_or_default();
            Some(StoreOption { id, name })
        })
        .collect();

    Ok(Metadata {
        filters: FilterOptions {
            stores,
            channels: distinct_values(executor, CHANNELS_SQL)?,
            product_categories: distinct_values(executor, CATEGORIES_SQL)?,
            statuses: distinct_values(executor, STATUSES_SQL)?,
        },
        ..catalog_metadata()
    })
}

fn fetch_fixed<E>(executor: &E, sql: &str) -> Result<Vec<Vec<Value>>, ExecutionError>
where
    E: QueryExecutor + ?Sized,
{
    executor.fetch(&RenderedQuery {
        sql: sql.to_string(),
        params: Vec::new(),
    })
}

fn distinct_values<E>(executor: &E, sql: &str) -> Result<Vec<String>, ExecutionError>
where
    E: QueryExecutor + ?Sized,
{
    Ok(fetch_fixed(executor, sql)?
        .into_iter()
        .filter_map(|row| row.into_iter().next())
        .filter(|v| !v.is_null())
        .map(|v| text(&v))
        .collect())
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
