//! Workspace error type.
//!
//! Sub-crates define their own error enums and wrap `MoError` as one variant
//! via `#[from]` where they need to surface core failures.

use thiserror::Error;

use crate::AgentId;

/// The top-level error type for `mo-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum MoError {
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `mo-*` crates.
pub type MoResult<T> = Result<T, MoError>;
