//! Pipeline error types.

use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] vgen_models::ValidationError),

    #[error("Generation failed: {0}")]
    Client(#[from] vgen_client::ClientError),

    #[error("Download failed: {0}")]
    Media(#[from] vgen_media::MediaError),

    #[error("Storage error: {0}")]
    Storage(#[from] vgen_storage::StorageError),

    #[error("Quality check rejected the video")]
    ReviewRejected,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
