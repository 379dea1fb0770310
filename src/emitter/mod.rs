//! SQL emitter (verb module)
//!
//! Transforms an AggregatePlan into dialect-specific SQL with bound parameters.

mod dialect;
mod error;
mod sql;

pub use dialect::Dialect;
pub use error::EmitError;
pub use sql::{emit_sql, RenderedQuery};
