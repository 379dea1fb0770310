//! Result shaper (verb module)
//!
//! Runs a compiled query through a storage backend and turns raw rows into
//! caller-facing records. Owns no business logic beyond that projection.

mod executor;
mod metadata;
mod response;
mod sqlite;

pub use executor::{ExecutionError, QueryExecutor};
pub use metadata::{catalog_metadata, describe, FilterOptions, Metadata, StoreOption};
pub use response::{execute_compiled, run_query, shape_rows, QueryInfo, QueryResponse, ResultMetadata};
