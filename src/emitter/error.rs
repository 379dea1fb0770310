//! Emitter errors

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmitError {
    /// Invalid plan structure
    #[error("Invalid plan: {0}")]
    InvalidPlan(String),
}
