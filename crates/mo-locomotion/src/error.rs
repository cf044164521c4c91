use mo_core::AgentId;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum LocomotionError {
    #[error("no locomotor for agent {0}")]
    AgentNotFound(AgentId),

    #[error("agent {0} was handed an empty path")]
    EmptyPath(AgentId),
}

pub type LocomotionResult<T> = Result<T, LocomotionError>;
