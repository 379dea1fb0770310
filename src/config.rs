//! Service configuration (noun module)

use serde::{Deserialize, Serialize};

use crate::compiler::{CompileOptions, UnknownFilterPolicy, DEFAULT_LIMIT, MAX_ROWS};
use crate::emitter::Dialect;
use crate::error::ParseError;

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

fn default_max_rows() -> i64 {
    MAX_ROWS
}

/// Runtime settings for compiling and executing analytics queries
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// SQL dialect of the storage backend
    #[serde(default)]
    pub dialect: Dialect,
    /// Database location for the local SQLite executor
    #[serde(default)]
    pub database: Option<String>,
    /// Limit used when a request carries none
    #[serde(default = "default_limit")]
    pub default_limit: i64,
    /// Row cap; values above the hard ceiling are lowered to it
    #[serde(default = "default_max_rows")]
    pub max_rows: i64,
    #[serde(default)]
    pub unknown_filters: UnknownFilterPolicy,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            database: None,
            default_limit: DEFAULT_LIMIT,
            max_rows: MAX_ROWS,
            unknown_filters: UnknownFilterPolicy::default(),
        }
    }
}

impl ServiceConfig {
    /// Reject settings that cannot produce a usable limit
    pub fn validate(&self) -> Result<(), ParseError> {
        if self.default_limit < 0 {
            return Err(ParseError::Invalid(format!(
                "default_limit must not be negative, got {}",
                self.default_limit
            )));
        }
        if self.max_rows <= 0 {
            return Err(ParseError::Invalid(format!(
                "max_rows must be positive, got {}",
                self.max_rows
            )));
        }
        Ok(())
    }

    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            default_limit: self.default_limit,
            max_rows: self.max_rows.min(MAX_ROWS),
            unknown_filters: self.unknown_filters,
        }
    }
}
