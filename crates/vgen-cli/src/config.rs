//! Application configuration.
//!
//! Assembled once at startup and handed to each component; nothing below
//! the binary reads the environment.

use std::path::PathBuf;
use std::time::Duration;

use vgen_client::{NimConfig, RetryPolicy, DEFAULT_BASE_URL};
use vgen_storage::UploadConfig;

use crate::error::{CliError, CliResult};

/// Complete configuration for a run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// NIM endpoints, key, timeout and retry budget
    pub nim: NimConfig,
    /// Upload target (credentials optional until an upload is attempted)
    pub upload: UploadConfig,
    /// Where downloaded videos go
    pub output_dir: PathBuf,
    /// Where per-video metadata documents go
    pub metadata_dir: PathBuf,
    /// Where the audit log lives
    pub log_dir: PathBuf,
}

impl AppConfig {
    /// Create config from environment variables.
    pub fn from_env() -> CliResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> CliResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let parsed = |key: &str, default: u64| -> CliResult<u64> {
            match non_empty(key) {
                Some(raw) => raw.trim().parse().map_err(|_| {
                    CliError::config_error(format!("{} must be a whole number, got '{}'", key, raw))
                }),
                None => Ok(default),
            }
        };

        let api_key = non_empty("NVIDIA_API_KEY")
            .ok_or_else(|| CliError::config_error("NVIDIA_API_KEY not found in environment"))?;

        let retry = RetryPolicy::new(
            parsed("VGEN_MAX_ATTEMPTS", 3)? as u32,
            Duration::from_secs(parsed("VGEN_BASE_DELAY_SECS", 5)?),
        );

        let mut nim = NimConfig::new(api_key)
            .map_err(|e| CliError::config_error(e.to_string()))?
            .with_base_url(non_empty("NVIDIA_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()))
            .with_request_timeout(Duration::from_secs(parsed("VGEN_REQUEST_TIMEOUT_SECS", 120)?))
            .with_retry(retry);
        if let Some(model) = non_empty("VGEN_REVIEW_MODEL") {
            nim = nim.with_review_model(model);
        }

        let mut upload = UploadConfig::new(non_empty("GITLAB_TOKEN"), non_empty("GITLAB_MEDIA_PROJECT_ID"));
        if let Some(api_base) = non_empty("GITLAB_API_URL") {
            upload.api_base = api_base;
        }
        if let Some(host) = non_empty("GITLAB_PUBLIC_HOST") {
            upload.public_host = host;
        }

        Ok(Self {
            nim,
            upload,
            output_dir: non_empty("VGEN_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("outputs/videos")),
            metadata_dir: non_empty("VGEN_METADATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("outputs/metadata")),
            log_dir: non_empty("VGEN_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("logs")),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let err = AppConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, CliError::ConfigError(_)));

        let err = AppConfig::from_lookup(lookup(&[("NVIDIA_API_KEY", " ")])).unwrap_err();
        assert!(matches!(err, CliError::ConfigError(_)));
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[("NVIDIA_API_KEY", "nvapi-x")])).unwrap();

        assert_eq!(config.nim.api_key, "nvapi-x");
        assert_eq!(config.nim.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.nim.request_timeout, Duration::from_secs(120));
        assert_eq!(config.nim.retry, RetryPolicy::default());
        assert!(config.upload.token.is_none());
        assert!(config.upload.project_id.is_none());
        assert_eq!(config.output_dir, PathBuf::from("outputs/videos"));
        assert_eq!(config.metadata_dir, PathBuf::from("outputs/metadata"));
        assert_eq!(config.log_dir, PathBuf::from("logs"));
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("NVIDIA_API_KEY", "nvapi-x"),
            ("NVIDIA_BASE_URL", "http://localhost:9000/v1"),
            ("VGEN_MAX_ATTEMPTS", "5"),
            ("VGEN_BASE_DELAY_SECS", "1"),
            ("GITLAB_TOKEN", "glpat"),
            ("GITLAB_MEDIA_PROJECT_ID", "123"),
            ("VGEN_OUTPUT_DIR", "/data/videos"),
        ]))
        .unwrap();

        assert_eq!(config.nim.base_url, "http://localhost:9000/v1");
        assert_eq!(config.nim.retry.max_attempts, 5);
        assert_eq!(config.nim.retry.base_delay, Duration::from_secs(1));
        assert_eq!(config.upload.token.as_deref(), Some("glpat"));
        assert_eq!(config.upload.project_id.as_deref(), Some("123"));
        assert_eq!(config.output_dir, PathBuf::from("/data/videos"));
    }

    #[test]
    fn test_bad_number_rejected() {
        let err = AppConfig::from_lookup(lookup(&[
            ("NVIDIA_API_KEY", "nvapi-x"),
            ("VGEN_MAX_ATTEMPTS", "three"),
        ]))
        .unwrap_err();
        assert!(matches!(err, CliError::ConfigError(_)));
    }
}
