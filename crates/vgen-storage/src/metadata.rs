//! Per-artifact metadata documents.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::fs;
use tracing::info;
use vgen_models::{ArtifactMetadata, ArtifactStatus};

use crate::error::{StorageError, StorageResult};

/// Writes one JSON document per artifact, named after the artifact.
#[derive(Debug, Clone)]
pub struct MetadataStore {
    dir: PathBuf,
}

impl MetadataStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the metadata document for `video_path`.
    pub fn document_path(&self, video_path: &Path) -> StorageResult<PathBuf> {
        let stem = video_path.file_stem().ok_or_else(|| {
            StorageError::config_error(format!("{} has no file name", video_path.display()))
        })?;

        let mut name = stem.to_os_string();
        name.push(".json");
        Ok(self.dir.join(name))
    }

    /// Write `{stem}.json` describing the video at `video_path`.
    pub async fn save(&self, video_path: impl AsRef<Path>) -> StorageResult<ArtifactMetadata> {
        let video_path = video_path.as_ref();
        let document_path = self.document_path(video_path)?;
        let size_bytes = fs::metadata(video_path).await?.len();

        let metadata = ArtifactMetadata {
            video_path: video_path.to_path_buf(),
            filename: video_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            size_bytes,
            created_at: Utc::now(),
            status: ArtifactStatus::Generated,
        };

        fs::create_dir_all(&self.dir).await?;
        fs::write(&document_path, serde_json::to_vec_pretty(&metadata)?).await?;

        info!("Metadata saved: {}", document_path.display());
        Ok(metadata)
    }

    /// Load a previously saved document.
    pub async fn load(&self, video_path: impl AsRef<Path>) -> StorageResult<ArtifactMetadata> {
        let document_path = self.document_path(video_path.as_ref())?;
        let bytes = fs::read(&document_path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn test_save_writes_named_document() {
        let dir = TempDir::new().unwrap();
        let video = dir.path().join("20260219_184200_city.mp4");
        fs::write(&video, vec![0u8; 2048]).await.unwrap();

        let store = MetadataStore::new(dir.path().join("metadata"));
        let saved = store.save(&video).await.unwrap();

        let document = dir.path().join("metadata").join("20260219_184200_city.json");
        assert!(document.exists());
        assert_eq!(saved.size_bytes, 2048);
        assert_eq!(saved.filename, "20260219_184200_city.mp4");

        let raw: serde_json::Value =
            serde_json::from_slice(&fs::read(&document).await.unwrap()).unwrap();
        assert_eq!(raw["status"], "generated");
        assert_eq!(raw["size_bytes"], 2048);

        assert_eq!(store.load(&video).await.unwrap(), saved);
    }

    #[tokio::test]
    async fn test_save_missing_video_fails() {
        let dir = TempDir::new().unwrap();
        let store = MetadataStore::new(dir.path());

        let err = store.save(dir.path().join("nope.mp4")).await.unwrap_err();
        assert!(matches!(err, StorageError::Io(_)));
    }
}
