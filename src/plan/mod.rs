//! Logical plan types (noun module)
//!
//! Represents one aggregate statement as data, independent of SQL dialect.

mod node;
mod expr;

pub use node::{AggregatePlan, Scan, JoinClause, JoinSource, JoinType, ProjectExpr, SortKey, SortDirection};
pub use expr::{Expr, Column, Literal, BinaryOperator, Aggregation, TimeUnit, TIMESTAMP_FORMAT};
