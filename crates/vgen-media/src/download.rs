//! Streaming download of generated media.
//!
//! Videos can run to hundreds of megabytes at 4K, so the body is written to
//! disk chunk by chunk as it arrives and never buffered whole in memory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::StreamExt;
use reqwest::Client;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::error::{MediaError, MediaResult};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest gap between two received chunks.
const READ_TIMEOUT: Duration = Duration::from_secs(60);

/// Downloads remote media to local files.
#[derive(Clone)]
pub struct MediaDownloader {
    http: Client,
}

impl MediaDownloader {
    /// Create a downloader.
    ///
    /// Connecting and each individual read are time-limited, the transfer as
    /// a whole is not: a large file may take as long as it needs, a stalled
    /// one fails once no data arrives for the read timeout.
    pub fn new() -> MediaResult<Self> {
        Self::with_timeouts(CONNECT_TIMEOUT, READ_TIMEOUT)
    }

    /// Create a downloader with explicit connect and idle-read timeouts.
    pub fn with_timeouts(connect: Duration, read: Duration) -> MediaResult<Self> {
        let http = Client::builder()
            .connect_timeout(connect)
            .read_timeout(read)
            .build()?;

        Ok(Self { http })
    }

    /// Create a downloader sharing an existing HTTP client.
    pub fn with_client(http: Client) -> Self {
        Self { http }
    }

    /// Stream `source_url` into `destination`, returning the bytes written.
    ///
    /// The parent directory is created if missing. Data lands in a `.part`
    /// file next to `destination` and is renamed into place once complete,
    /// so a failed download never leaves a truncated file at `destination`.
    pub async fn download(
        &self,
        source_url: &str,
        destination: impl AsRef<Path>,
    ) -> MediaResult<u64> {
        let destination = destination.as_ref();
        info!("Downloading video to: {}", destination.display());

        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| MediaError::write(parent, e))?;
            }
        }

        let response = self.http.get(source_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(MediaError::BadStatus {
                url: source_url.to_string(),
                status: status.as_u16(),
            });
        }

        let part_path = part_path(destination);
        let written = match stream_to_file(response, &part_path).await {
            Ok(written) => written,
            Err(e) => {
                if let Err(cleanup) = fs::remove_file(&part_path).await {
                    warn!(
                        "Failed to remove partial download {}: {}",
                        part_path.display(),
                        cleanup
                    );
                }
                return Err(e);
            }
        };

        fs::rename(&part_path, destination)
            .await
            .map_err(|e| MediaError::write(destination, e))?;

        info!(
            "Download complete: {:.2} MB",
            written as f64 / (1024.0 * 1024.0)
        );
        Ok(written)
    }
}

async fn stream_to_file(response: reqwest::Response, path: &Path) -> MediaResult<u64> {
    let mut file = fs::File::create(path)
        .await
        .map_err(|e| MediaError::write(path, e))?;

    let mut stream = response.bytes_stream();
    let mut written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk
            .map_err(|e| MediaError::download_failed(format!("Stream interrupted: {}", e)))?;
        file.write_all(&chunk)
            .await
            .map_err(|e| MediaError::write(path, e))?;
        written += chunk.len() as u64;
    }

    file.flush().await.map_err(|e| MediaError::write(path, e))?;
    debug!("Wrote {} bytes to {}", written, path.display());
    Ok(written)
}

fn part_path(destination: &Path) -> PathBuf {
    let mut name = destination.as_os_str().to_os_string();
    name.push(".part");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn test_download_writes_file() {
        let server = MockServer::start().await;
        let body = vec![7u8; 64 * 1024 + 13];
        Mock::given(method("GET"))
            .and(path("/y.mp4"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("nested").join("videos").join("y.mp4");

        let written = MediaDownloader::new()
            .unwrap()
            .download(&format!("{}/y.mp4", server.uri()), &dest)
            .await
            .unwrap();

        assert_eq!(written, body.len() as u64);
        assert_eq!(fs::read(&dest).await.unwrap(), body);
        assert!(!part_path(&dest).exists());
    }

    #[tokio::test]
    async fn test_download_bad_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("missing.mp4");

        let err = MediaDownloader::new()
            .unwrap()
            .download(&format!("{}/missing.mp4", server.uri()), &dest)
            .await
            .unwrap_err();

        assert!(matches!(err, MediaError::BadStatus { status: 404, .. }));
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_download_unwritable_destination() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8; 16]))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        // A regular file where the parent directory should be
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"x").await.unwrap();
        let dest = blocker.join("y.mp4");

        let err = MediaDownloader::new()
            .unwrap()
            .download(&format!("{}/y.mp4", server.uri()), &dest)
            .await
            .unwrap_err();

        assert!(matches!(err, MediaError::Write { .. }));
    }

    #[tokio::test]
    async fn test_stalled_download_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(vec![1u8; 16])
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("stalled.mp4");

        let err = MediaDownloader::with_timeouts(Duration::from_secs(5), Duration::from_millis(200))
            .unwrap()
            .download(&format!("{}/stalled.mp4", server.uri()), &dest)
            .await
            .unwrap_err();

        assert!(matches!(err, MediaError::Network(_)), "unexpected error: {err}");
        assert!(!dest.exists());
    }

    #[test]
    fn test_part_path() {
        assert_eq!(
            part_path(Path::new("/out/video.mp4")),
            PathBuf::from("/out/video.mp4.part")
        );
    }
}
