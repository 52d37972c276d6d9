//! NIM client configuration.

use std::time::Duration;

use crate::error::{ClientError, ClientResult};
use crate::retry::RetryPolicy;

/// Default NVIDIA NIM API base URL.
pub const DEFAULT_BASE_URL: &str = "https://integrate.api.nvidia.com/v1";

/// Default vision-language model used for quality review.
pub const DEFAULT_REVIEW_MODEL: &str = "qwen/qwen3.5-397b-a17b";

/// Configuration shared by the generation client and the reviewer.
#[derive(Debug, Clone)]
pub struct NimConfig {
    /// Bearer token for the NIM endpoints
    pub api_key: String,
    /// Base URL of the NIM API
    pub base_url: String,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Retry budget for video generation
    pub retry: RetryPolicy,
    /// Model used by the quality reviewer
    pub review_model: String,
}

impl NimConfig {
    /// Create config with defaults for everything but the key.
    ///
    /// Fails if the key is empty.
    pub fn new(api_key: impl Into<String>) -> ClientResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ClientError::config_error("NVIDIA_API_KEY not set"));
        }

        Ok(Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(120),
            retry: RetryPolicy::default(),
            review_model: DEFAULT_REVIEW_MODEL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_review_model(mut self, model: impl Into<String>) -> Self {
        self.review_model = model.into();
        self
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = NimConfig::new("nvapi-test").unwrap();
        assert_eq!(config.base_url, "https://integrate.api.nvidia.com/v1");
        assert_eq!(config.request_timeout, Duration::from_secs(120));
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.base_delay, Duration::from_secs(5));
        assert_eq!(config.review_model, "qwen/qwen3.5-397b-a17b");
    }

    #[test]
    fn test_empty_key_rejected() {
        assert!(matches!(NimConfig::new(""), Err(ClientError::Config(_))));
        assert!(matches!(NimConfig::new("  "), Err(ClientError::Config(_))));
    }

    #[test]
    fn test_endpoint_join() {
        let config = NimConfig::new("k")
            .unwrap()
            .with_base_url("http://localhost:9000/v1/");
        assert_eq!(
            config.endpoint("/video/generations"),
            "http://localhost:9000/v1/video/generations"
        );
    }
}
