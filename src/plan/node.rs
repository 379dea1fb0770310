//! Plan node types

use super::expr::{Column, Expr};

/// A single aggregate SELECT statement.
///
/// The shape is fixed: one driving table, a set of joins, a conjunctive
/// predicate, optional grouping, ordering and a row limit.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatePlan {
    /// Driving table
    pub source: Scan,
    /// SELECT list, in output order
    pub projections: Vec<ProjectExpr>,
    /// Joined relations, in emission order
    pub joins: Vec<JoinClause>,
    /// Conditions combined with AND (empty means no WHERE clause)
    pub predicate: Vec<Expr>,
    /// GROUP BY expressions
    pub group_by: Vec<Expr>,
    /// ORDER BY keys
    pub order_by: Vec<SortKey>,
    /// LIMIT, if any
    pub limit: Option<i64>,
}

impl AggregatePlan {
    pub fn new(source: Scan) -> Self {
        Self {
            source,
            projections: Vec::new(),
            joins: Vec::new(),
            predicate: Vec::new(),
            group_by: Vec::new(),
            order_by: Vec::new(),
            limit: None,
        }
    }

    /// Output column names, in SELECT order
    pub fn output_names(&self) -> Vec<String> {
        self.projections.iter().map(|p| p.alias.clone()).collect()
    }

    /// Whether a join with the given alias is part of the plan
    pub fn has_join(&self, alias: &str) -> bool {
        self.joins.iter().any(|j| j.alias == alias)
    }
}

/// Scan a table
#[derive(Debug, Clone, PartialEq)]
pub struct Scan {
    /// Table name
    pub table: String,
    /// Alias for the table
    pub alias: Option<String>,
}

impl Scan {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            alias: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

/// Join type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
}

/// What a join reads from
#[derive(Debug, Clone, PartialEq)]
pub enum JoinSource {
    /// A base table
    Table(String),
    /// A derived relation
    Subquery(Box<AggregatePlan>),
}

/// One join against the driving table
#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    pub join_type: JoinType,
    pub source: JoinSource,
    /// Alias the joined relation is referenced by
    pub alias: String,
    /// Key on the already-joined side
    pub left_key: Column,
    /// Key on the joined relation
    pub right_key: Column,
}

/// A projected expression with its output alias
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectExpr {
    /// The expression to compute
    pub expr: Expr,
    /// Output column name
    pub alias: String,
}

/// A sort key with direction
#[derive(Debug, Clone, PartialEq)]
pub struct SortKey {
    /// Output column name to sort by
    pub column: String,
    /// Sort direction
    pub direction: SortDirection,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}
