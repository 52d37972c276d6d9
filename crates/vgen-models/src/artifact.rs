//! Per-artifact metadata documents.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle marker stored alongside an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactStatus {
    #[default]
    Generated,
}

impl fmt::Display for ArtifactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactStatus::Generated => write!(f, "generated"),
        }
    }
}

/// Metadata document written next to each generated video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    /// Local path of the video
    pub video_path: PathBuf,

    /// File name component of `video_path`
    pub filename: String,

    /// Size on disk
    pub size_bytes: u64,

    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub status: ArtifactStatus,
}
