//! ordermetrics - Compile structured analytics requests into safe aggregate SQL
//!
//! This library provides:
//! - A fixed catalog of metrics, dimensions and filter keys
//! - Request validation that reports every unknown name at once
//! - Compilation into a logical aggregate plan with a minimal join set
//! - SQL emission with bound parameters for PostgreSQL and SQLite
//! - Execution and row shaping through a pluggable storage backend
//!
//! # Architecture
//!
//! **Noun modules** (data structures):
//! - `catalog/` - Metric, Dimension, Relation, FilterKey
//! - `query/` - QueryRequest, DateRange
//! - `plan/` - AggregatePlan, Expr, Literal
//! - `config` - ServiceConfig
//!
//! **Verb modules** (transformations):
//! - `compiler/` - QueryRequest → CompiledQuery
//! - `emitter/` - AggregatePlan → SQL text + parameters
//! - `shaper/` - SQL → rows → QueryResponse
//! - `parser/` - YAML → ServiceConfig
//!
//! # Example
//!
//! ```ignore
//! use ordermetrics::{compile, emit_sql, Dialect, QueryRequest};
//!
//! let request = QueryRequest::new(["total_revenue"], ["channel"]);
//! let compiled = compile(&request)?;
//! let rendered = emit_sql(&compiled.plan, Dialect::Postgres)?;
//! println!("{}", rendered.sql);
//! ```

pub mod catalog;
pub mod query;
pub mod plan;
pub mod compiler;
pub mod emitter;
pub mod shaper;
pub mod config;
pub mod parser;
pub mod error;

// Re-export commonly used types
pub use catalog::{Metric, Dimension, FilterKey, Registry, Relation};
pub use query::{QueryRequest, DateRange};
pub use plan::{AggregatePlan, Expr, Literal};
pub use compiler::{compile, compile_with, CompileOptions, CompiledQuery, CompileError, UnknownFilterPolicy, MAX_ROWS};
pub use emitter::{emit_sql, Dialect, EmitError, RenderedQuery};
pub use shaper::{run_query, describe, QueryExecutor, QueryResponse, Metadata, ExecutionError};
pub use config::ServiceConfig;
pub use error::{AnalyticsError, ParseError};
