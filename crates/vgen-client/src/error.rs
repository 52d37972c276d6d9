//! Client error types.

use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Contract violation: {0}")]
    ContractViolation(String),

    #[error("{operation} failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        operation: String,
        attempts: u32,
        #[source]
        source: Box<ClientError>,
    },
}

impl ClientError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    pub fn contract_violation(msg: impl Into<String>) -> Self {
        Self::ContractViolation(msg.into())
    }

    /// Transient conditions worth another attempt.
    ///
    /// Every non-2xx status counts, including 4xx.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ClientError::Network(_) | ClientError::Status { .. } | ClientError::InvalidResponse(_)
        )
    }

    /// The underlying failure, unwrapping retry exhaustion.
    pub fn last_failure(&self) -> &ClientError {
        match self {
            ClientError::RetriesExhausted { source, .. } => source.last_failure(),
            other => other,
        }
    }
}
