//! Artifact upload to a GitLab project's uploads API.

use std::path::Path;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use serde::Deserialize;
use tokio::fs::File;
use tokio_util::io::ReaderStream;
use tracing::{debug, info};

use crate::error::{StorageError, StorageResult};

/// Files above this size are noted in the logs.
const LARGE_FILE_BYTES: u64 = 1024 * 1024;

/// Upload target configuration.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Private access token
    pub token: Option<String>,
    /// Project id or `namespace/project` path
    pub project_id: Option<String>,
    /// REST API base, e.g. `https://gitlab.com/api/v4`
    pub api_base: String,
    /// Prefix joined with the returned path to form the public URL
    pub public_host: String,
    /// Whole-request timeout
    pub timeout: Duration,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            token: None,
            project_id: None,
            api_base: "https://gitlab.com/api/v4".to_string(),
            public_host: "https://gitlab.com".to_string(),
            timeout: Duration::from_secs(600),
        }
    }
}

impl UploadConfig {
    pub fn new(token: Option<String>, project_id: Option<String>) -> Self {
        Self {
            token,
            project_id,
            ..Default::default()
        }
    }

    /// Token and project id, or a configuration error if either is
    /// missing or blank.
    fn credentials(&self) -> StorageResult<(&str, &str)> {
        let token = self.token.as_deref().filter(|t| !t.trim().is_empty());
        let project = self.project_id.as_deref().filter(|p| !p.trim().is_empty());

        match (token, project) {
            (Some(token), Some(project)) => Ok((token, project)),
            _ => Err(StorageError::config_error(
                "GITLAB_TOKEN or GITLAB_MEDIA_PROJECT_ID not configured",
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    full_path: Option<String>,
}

/// Publishes local artifacts and returns their public URL.
#[derive(Clone)]
pub struct ArtifactUploader {
    http: Client,
    config: UploadConfig,
}

impl ArtifactUploader {
    /// Create a new uploader.
    pub fn new(config: UploadConfig) -> StorageResult<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    /// Upload the file at `path` in a single streamed multipart request.
    ///
    /// Credentials are checked before the file is opened or any request is
    /// made.
    pub async fn upload(&self, path: impl AsRef<Path>) -> StorageResult<String> {
        let path = path.as_ref();
        let (token, project) = self.config.credentials()?;

        info!("Uploading artifact: {}", path.display());

        let file = File::open(path).await?;
        let size = file.metadata().await?.len();
        if size > LARGE_FILE_BYTES {
            info!(
                "File size: {:.2} MB (over 1 MB)",
                size as f64 / (1024.0 * 1024.0)
            );
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "artifact".to_string());

        let part = Part::stream_with_length(Body::wrap_stream(ReaderStream::new(file)), size)
            .file_name(file_name)
            .mime_str(mime_for(path))
            .map_err(|e| StorageError::upload_failed(format!("Failed to build form part: {}", e)))?;
        let form = Form::new().part("file", part);

        let url = format!(
            "{}/projects/{}/uploads",
            self.config.api_base.trim_end_matches('/'),
            urlencoding::encode(project)
        );
        debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .header("PRIVATE-TOKEN", token)
            .multipart(form)
            .send()
            .await
            .map_err(|e| StorageError::upload_failed(format!("Upload request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::upload_failed(format!(
                "Upload endpoint returned {}: {}",
                status, body
            )));
        }

        let parsed: UploadResponse = response.json().await.map_err(|e| {
            StorageError::upload_failed(format!("Failed to parse upload response: {}", e))
        })?;

        let full_path = parsed
            .full_path
            .filter(|p| !p.is_empty())
            .ok_or_else(|| StorageError::contract_violation("No full_path in upload response"))?;

        let public_url = join_public_url(&self.config.public_host, &full_path);
        info!("Uploaded artifact: {}", public_url);
        Ok(public_url)
    }
}

fn join_public_url(host: &str, full_path: &str) -> String {
    format!(
        "{}/{}",
        host.trim_end_matches('/'),
        full_path.trim_start_matches('/')
    )
}

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("mov") => "video/quicktime",
        _ => "application/octet-stream",
    }
}
