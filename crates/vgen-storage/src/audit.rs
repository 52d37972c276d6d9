//! Append-only generation audit log (JSON Lines).
//!
//! Each successful generation adds exactly one line; lines are never
//! rewritten or removed. Appends from one process are serialized by a
//! mutex. Several processes appending to the same file are not
//! coordinated beyond what `O_APPEND` gives for a single write.

use std::path::{Path, PathBuf};

use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::info;
use vgen_models::{AuditRecord, GenerationResult};

use crate::error::{StorageError, StorageResult};

/// File name of the audit log inside the log directory.
pub const AUDIT_LOG_FILE: &str = "generation_log.jsonl";

/// Append-only audit trail of generations.
pub struct AuditLogger {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl AuditLogger {
    /// Log to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Log to [`AUDIT_LOG_FILE`] inside `log_dir`.
    pub fn in_dir(log_dir: impl AsRef<Path>) -> Self {
        Self::new(log_dir.as_ref().join(AUDIT_LOG_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record as a single JSON line.
    ///
    /// The line, including its newline, goes out in one write.
    pub async fn append(&self, record: &AuditRecord) -> StorageResult<()> {
        let mut line = record.to_json_line()?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| {
                StorageError::audit_write(format!("open {}: {}", self.path.display(), e))
            })?;

        file.write_all(line.as_bytes()).await.map_err(|e| {
            StorageError::audit_write(format!("append {}: {}", self.path.display(), e))
        })?;
        file.flush().await?;

        info!("Generation logged: {}", self.path.display());
        Ok(())
    }

    /// Record a generation result.
    ///
    /// Only successful results are logged; anything else is rejected
    /// without touching the file.
    pub async fn record(&self, result: &GenerationResult) -> StorageResult<AuditRecord> {
        let record = AuditRecord::for_result(result).ok_or_else(|| {
            StorageError::contract_violation(format!(
                "refusing to audit a generation with status {}",
                result.status
            ))
        })?;

        self.append(&record).await?;
        Ok(record)
    }

    /// Read every record back in file order.
    ///
    /// A missing log reads as empty.
    pub async fn read_all(&self) -> StorageResult<Vec<AuditRecord>> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(StorageError::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use vgen_models::{GenerationRequest, GenerationStatus};

    use super::*;

    fn result(prompt: &str) -> GenerationResult {
        GenerationResult::success(
            GenerationRequest::new(prompt),
            format!("https://x/{}.mp4", prompt),
            format!("/tmp/{}.mp4", prompt),
        )
    }

    #[tokio::test]
    async fn test_two_appends_two_lines_in_order() {
        let dir = TempDir::new().unwrap();
        let logger = AuditLogger::in_dir(dir.path().join("logs"));

        logger.record(&result("first")).await.unwrap();
        logger.record(&result("second")).await.unwrap();

        let contents = fs::read_to_string(logger.path()).await.unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(contents.ends_with('\n'));

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(first["metadata"]["prompt"], "first");
        assert_eq!(second["metadata"]["prompt"], "second");
        assert!(first.get("timestamp").is_some());
    }

    #[tokio::test]
    async fn test_append_preserves_existing_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(AUDIT_LOG_FILE);
        let logger = AuditLogger::new(&path);

        logger.record(&result("one")).await.unwrap();
        let before = fs::read_to_string(&path).await.unwrap();

        logger.record(&result("two")).await.unwrap();
        let after = fs::read_to_string(&path).await.unwrap();

        assert!(after.starts_with(&before));
        let records = logger.read_all().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].metadata.request.prompt(), "two");
    }

    #[tokio::test]
    async fn test_failed_result_not_logged() {
        let dir = TempDir::new().unwrap();
        let logger = AuditLogger::in_dir(dir.path());

        let mut failed = result("bad");
        failed.status = GenerationStatus::Error;

        let err = logger.record(&failed).await.unwrap_err();
        assert!(matches!(err, StorageError::ContractViolation(_)));
        assert!(!logger.path().exists());
        assert!(logger.read_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_write_failure_surfaces() {
        let dir = TempDir::new().unwrap();
        // The log path is a directory, so opening it for append fails
        let logger = AuditLogger::new(dir.path());

        let record = AuditRecord::for_result(&result("x")).unwrap();
        assert!(logger.append(&record).await.is_err());
    }
}
