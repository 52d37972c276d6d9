//! Text-to-video generation client.

use std::sync::Arc;

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};
use vgen_models::GenerationRequest;

use crate::config::NimConfig;
use crate::error::{ClientError, ClientResult};
use crate::retry::{RetryingCaller, Sleeper, TokioSleeper};
use crate::types::VideoGenerationPayload;

const GENERATION_PATH: &str = "video/generations";

/// Client for the NIM video generation endpoint.
pub struct GenerationClient {
    http: Client,
    config: NimConfig,
    caller: RetryingCaller,
}

impl GenerationClient {
    /// Create a new generation client.
    pub fn new(config: NimConfig) -> ClientResult<Self> {
        Self::with_sleeper(config, Arc::new(TokioSleeper))
    }

    /// Create a client whose backoff sleeps go through `sleeper`.
    pub fn with_sleeper(config: NimConfig, sleeper: Arc<dyn Sleeper>) -> ClientResult<Self> {
        let http = Client::builder().timeout(config.request_timeout).build()?;
        let caller = RetryingCaller::with_sleeper(config.retry.clone(), sleeper);

        Ok(Self {
            http,
            config,
            caller,
        })
    }

    /// Submit a generation request and return the resulting video URL.
    ///
    /// Network errors, timeouts, non-2xx statuses and unparseable bodies are
    /// retried under the configured policy. A parseable body without
    /// `video_url` fails immediately.
    pub async fn generate(&self, request: &GenerationRequest) -> ClientResult<String> {
        let url = self.config.endpoint(GENERATION_PATH);
        let payload = VideoGenerationPayload::from(request);

        info!(
            model = %request.model(),
            duration = request.duration(),
            resolution = %request.resolution(),
            fps = request.fps(),
            "Starting video generation: {}",
            preview(request.prompt(), 50)
        );

        let video_url = self
            .caller
            .call("video_generation", |_| self.attempt(&url, &payload))
            .await?;

        info!("Video generation returned {}", video_url);
        Ok(video_url)
    }

    async fn attempt(
        &self,
        url: &str,
        payload: &VideoGenerationPayload<'_>,
    ) -> ClientResult<String> {
        debug!("Sending video generation request to {}", url);

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.config.api_key)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        // Only a body that is not JSON at all counts as transient; any
        // well-formed body without a string `video_url` is final.
        let body = response.text().await?;
        let parsed: Value = serde_json::from_str(&body).map_err(|e| {
            ClientError::invalid_response(format!("Failed to parse generation response: {}", e))
        })?;

        parsed
            .get("video_url")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string)
            .ok_or_else(|| ClientError::contract_violation("No video_url in generation response"))
    }
}

/// First `max_chars` characters of `text`, for log lines.
pub(crate) fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
