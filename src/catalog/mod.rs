//! Catalog of queryable names (noun module)
//!
//! Metrics and dimensions are closed enums: adding one is a code change,
//! never a runtime operation. Nothing outside this module can put an
//! expression in front of the database.

mod relation;
mod metric;
mod dimension;
mod filter_key;

pub use relation::{Relation, item_semi_join, join_closure, ORDERS};
pub use metric::Metric;
pub use dimension::Dimension;
pub use filter_key::{FilterKey, FilterKind};

use crate::plan::Expr;

/// A fixed, name-keyed table of catalog entries
pub trait Registry: Sized + Copy + 'static {
    /// Every entry, in registration order
    fn all() -> &'static [Self];

    /// Public name
    fn name(&self) -> &'static str;

    /// Projection or aggregation expression
    fn expression(&self) -> Expr;

    /// Relations that must be joined for the expression to resolve
    fn relations(&self) -> &'static [Relation];

    /// Find an entry by public name
    fn lookup(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|e| e.name() == name)
    }

    /// All public names, in registration order
    fn names() -> Vec<&'static str> {
        Self::all().iter().map(|e| e.name()).collect()
    }
}
