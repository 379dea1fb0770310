//! Error types for ordermetrics

use thiserror::Error;

use crate::compiler::CompileError;
use crate::emitter::EmitError;
use crate::shaper::ExecutionError;

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ParseError {
    /// IO error reading file
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// YAML deserialization error
    #[error("Invalid YAML: {source}")]
    Yaml {
        #[from]
        source: serde_yaml::Error,
    },
    /// Well-formed YAML with values that make no sense
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Everything that can go wrong answering one analytics request
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Caller error, detected before storage is touched
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error(transparent)]
    Emit(#[from] EmitError),
    #[error("Query execution failed: {0}")]
    Execution(#[from] ExecutionError),
}

impl AnalyticsError {
    /// HTTP-equivalent status: 400 for caller errors, 500 otherwise
    pub fn http_status(&self) -> u16 {
        match self {
            AnalyticsError::Compile(_) => 400,
            AnalyticsError::Emit(_) | AnalyticsError::Execution(_) => 500,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.http_status() == 400
    }
}
