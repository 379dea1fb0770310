//! Query compiler (verb module)
//!
//! QueryRequest + catalog → CompiledQuery (AggregatePlan + output columns).

mod compile;
mod dates;
mod error;
pub mod filter;

pub use compile::{
    compile, compile_with, CompileOptions, CompiledQuery, UnknownFilterPolicy, DEFAULT_LIMIT,
    MAX_ROWS,
};
pub use error::CompileError;
