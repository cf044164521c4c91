use mo_core::{AgentId, TargetMode};
use mo_formation::FormationError;
use mo_locomotion::LocomotionError;
use thiserror::Error;

/// A request the orchestrator refused outright.
///
/// Per-agent problems (ineligible, unplaceable) are not errors; they are
/// reported in [`RequestOutcome`](crate::RequestOutcome).
#[derive(Debug, Error, PartialEq)]
pub enum RequestError {
    #[error("unknown agent {0}")]
    UnknownAgent(AgentId),

    #[error("target {0} does not exist or is not in the world")]
    InvalidTarget(AgentId),

    #[error("mode {0} requires a reference entity")]
    MissingTarget(TargetMode),

    #[error("{0} is not a carrier")]
    NotACarrier(AgentId),

    #[error("{0} is not a portal")]
    NotAPortal(AgentId),

    #[error("formation error: {0}")]
    Formation(#[from] FormationError),

    #[error("locomotion error: {0}")]
    Locomotion(#[from] LocomotionError),
}

pub type RequestResult<T> = Result<T, RequestError>;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("movement configuration error: {0}")]
    Config(String),

    #[error("request failed: {0}")]
    Request(#[from] RequestError),

    #[error("locomotion error: {0}")]
    Locomotion(#[from] LocomotionError),
}

pub type SimResult<T> = Result<T, SimError>;
