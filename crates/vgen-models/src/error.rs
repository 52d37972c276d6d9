//! Validation errors for generation requests.

use thiserror::Error;

pub type ValidationResult<T> = Result<T, ValidationError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Prompt must not be empty")]
    EmptyPrompt,

    #[error("Duration must be a positive number of seconds, got {0}")]
    InvalidDuration(u32),

    #[error("FPS must be positive, got {0}")]
    InvalidFps(u32),

    #[error("Resolution must be WIDTHxHEIGHT with non-zero dimensions, got '{0}'")]
    InvalidResolution(String),

    #[error("Model identifier must not be empty")]
    EmptyModel,
}
