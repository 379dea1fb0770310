use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::catalog::{
    item_semi_join, join_closure, Dimension, FilterKey, Metric, Registry, Relation, ORDERS,
};
use crate::plan::{AggregatePlan, Expr, ProjectExpr, Scan, SortDirection, SortKey};
use crate::query::QueryRequest;
use super::dates::date_conditions;
use super::error::CompileError;
use super::filter::membership_condition;

/// Hard ceiling on returned rows, whatever the caller or configuration asks
pub const MAX_ROWS: i64 = 10_000;

/// Limit applied when the request does not carry one
pub const DEFAULT_LIMIT: i64 = 1_000;

/// What to do with filter keys the catalog does not recognize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownFilterPolicy {
    /// Skip them, log a warning and report them on the compiled query
    #[default]
    Ignore,
    /// Fail compilation with [`CompileError::UnknownFilter`]
    Reject,
}

/// Tunables for [`compile_with`]
#[derive(Debug, Clone, PartialEq)]
pub struct CompileOptions {
    pub default_limit: i64,
    /// Row cap, itself capped at [`MAX_ROWS`]
    pub max_rows: i64,
    pub unknown_filters: UnknownFilterPolicy,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_rows: MAX_ROWS,
            unknown_filters: UnknownFilterPolicy::Ignore,
        }
    }
}

impl CompileOptions {
    /// Effective limit for a requested one
    pub fn clamp_limit(&self, requested: Option<i64>) -> i64 {
        let cap = self.max_rows.clamp(0, MAX_ROWS);
        requested.unwrap_or(self.default_limit).clamp(0, cap)
    }
}

/// A validated request, ready to render
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub plan: AggregatePlan,
    /// Output columns: dimensions then metrics, in request order
    pub columns: Vec<String>,
    /// Filter keys that were present but not recognized
    pub ignored_filters: Vec<String>,
}

impl CompiledQuery {
    pub fn limit(&self) -> Option<i64> {
        self.plan.limit
    }
}

/// Compile a request with default options.
pub fn compile(request: &QueryRequest) -> Result<CompiledQuery, CompileError> {
    compile_with(request, &CompileOptions::default())
}

/// Compile a request into a single aggregate plan.
///
/// All name errors are collected before failing, so the caller sees every
/// unknown metric and dimension at once.
pub fn compile_with(
    request: &QueryRequest,
    options: &CompileOptions,
) -> Result<CompiledQuery, CompileError> {
    // 1. Names
    let (metrics, dimensions) = resolve_names(&request.metrics, &request.dimensions)?;
    if metrics.is_empty() && dimensions.is_empty() {
        return Err(CompileError::EmptyQuery);
    }

    // 2. Joins the projected expressions need
    let mut relations = join_closure(
        metrics
            .iter()
            .flat_map(|m| m.relations())
            .chain(dimensions.iter().flat_map(|d| d.relations()))
            .copied(),
    );

    // 3. Filters
    let ignored_filters = unknown_filter_keys(&request.filters, options.unknown_filters)?;
    let mut predicate = date_conditions(request.date_range.as_ref())?;
    let mut filter_relations: Vec<Relation> = Vec::new();
    for key in FilterKey::ALL {
        let Some(value) = request.filters.get(key.name()) else {
            continue;
        };
        let Some(condition) = membership_condition(key, value)? else {
            continue;
        };
        let needed = join_closure(key.relations().iter().copied());
        if needed.iter().all(|r| relations.contains(r)) {
            predicate.push(condition);
        } else if needed.iter().all(Relation::is_item_level)
            && !relations.iter().any(Relation::is_item_level)
        {
            // Joining items here would repeat each order once per line
            predicate.push(item_semi_join(&needed, condition));
        } else {
            predicate.push(condition);
            filter_relations.extend(needed);
        }
    }
    if !filter_relations.is_empty() {
        relations = join_closure(relations.into_iter().chain(filter_relations));
    }

    // 4. Assemble
    let mut plan = AggregatePlan::new(Scan::new("orders").with_alias(ORDERS));
    plan.projections = dimensions
        .iter()
        .map(project)
        .chain(metrics.iter().map(project))
        .collect();
    plan.joins = relations.iter().map(Relation::join_clause).collect();
    plan.predicate = predicate;
    plan.group_by = dimensions.iter().map(Registry::expression).collect();
    plan.order_by = default_ordering(&metrics, &dimensions);
    plan.limit = Some(options.clamp_limit(request.limit));

    let columns = plan.output_names();
    debug!(
        columns = ?columns,
        joins = plan.joins.len(),
        conditions = plan.predicate.len(),
        limit = ?plan.limit,
        "compiled analytics query"
    );

    Ok(CompiledQuery {
        plan,
        columns,
        ignored_filters,
    })
}

fn project<R: Registry>(entry: &R) -> ProjectExpr {
    ProjectExpr {
        expr: entry.expression(),
        alias: entry.name().to_string(),
    }
}

/// First dimension ascending, otherwise first metric descending
fn default_ordering(metrics: &[Metric], dimensions: &[Dimension]) -> Vec<SortKey> {
    if let Some(dim) = dimensions.first() {
        vec![SortKey {
            column: dim.name().to_string(),
            direction: SortDirection::Ascending,
        }]
    } else if let Some(metric) = metrics.first() {
        vec![SortKey {
            column: metric.name().to_string(),
            direction: SortDirection::Descending,
        }]
    } else {
        vec![]
    }
}

/// Resolve both name lists, reporting every unknown name from both.
fn resolve_names(
    metric_names: &[String],
    dimension_names: &[String],
) -> Result<(Vec<Metric>, Vec<Dimension>), CompileError> {
    let (metrics, bad_metrics) = resolve_all::<Metric>(metric_names);
    let (dimensions, bad_dimensions) = resolve_all::<Dimension>(dimension_names);

    if !bad_metrics.is_empty() || !bad_dimensions.is_empty() {
        return Err(CompileError::InvalidNames {
            metrics: bad_metrics,
            dimensions: bad_dimensions,
        });
    }
    Ok((metrics, dimensions))
}

/// Resolve names in order; repeated names collapse to their first occurrence.
fn resolve_all<R: Registry + PartialEq>(names: &[String]) -> (Vec<R>, Vec<String>) {
    let mut found: Vec<R> = Vec::new();
    let mut missing: Vec<String> = Vec::new();
    for name in names {
        match R::lookup(name) {
            Some(entry) => {
                if !found.contains(&entry) {
                    found.push(entry);
                }
            }
            None => {
                if !missing.contains(name) {
                    missing.push(name.clone());
                }
            }
        }
    }
    (found, missing)
}

fn unknown_filter_keys(
    filters: &Map<String, Value>,
    policy: UnknownFilterPolicy,
) -> Result<Vec<String>, CompileError> {
    let unknown: Vec<String> = filters
        .keys()
        .filter(|k| FilterKey::lookup(k).is_none())
        .cloned()
        .collect();

    if unknown.is_empty() {
        return Ok(unknown);
    }
    match policy {
        UnknownFilterPolicy::Reject => Err(CompileError::UnknownFilter(unknown)),
        UnknownFilterPolicy::Ignore => {
            warn!(keys = ?unknown, "ignoring unrecognized filter keys");
            Ok(unknown)
        }
    }
}
