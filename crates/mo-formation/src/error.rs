use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum FormationError {
    #[error("agent radius must be a positive finite number, got {0}")]
    InvalidRadius(f32),

    #[error("formation row width must be at least 1")]
    ZeroRowWidth,
}

pub type FormationResult<T> = Result<T, FormationError>;
