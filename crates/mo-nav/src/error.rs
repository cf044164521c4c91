//! Navigation error type.

use thiserror::Error;

use mo_core::Vec3;

/// Errors produced by `mo-nav`.
#[derive(Debug, Error)]
pub enum NavError {
    #[error("position {0} lies outside the navigable area")]
    OutOfBounds(Vec3),

    #[error("invalid terrain grid: {0}")]
    InvalidGrid(String),
}

pub type NavResult<T> = Result<T, NavError>;
