//! Quality review of generated videos with a vision-language model.
//!
//! The reviewer sends the whole video inline as a data URL next to an
//! instruction prompt and looks for the approval marker in the reply. A
//! review that cannot complete resolves to an unapproved verdict instead
//! of an error so it never blocks the pipeline.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Client;
use tracing::{debug, info, warn};
use vgen_models::QualityVerdict;

use crate::config::NimConfig;
use crate::error::{ClientError, ClientResult};
use crate::generation::preview;
use crate::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ContentItem};

const CHAT_COMPLETIONS_PATH: &str = "chat/completions";

/// Default review instructions.
pub const DEFAULT_REVIEW_PROMPT: &str = "\
Review this video for:
1. Physical correctness (gravity, light, shadows)
2. No artifacts or glitches
3. Consistent lighting
4. Brand identity preserved

If you find errors:
- List ALL errors
- Recommend a correction with cosmos-video-edit

If the video is perfect:
- Confirm \"APPROVED FOR PRODUCTION\"
";

/// Anything that can judge a generated video.
#[async_trait]
pub trait QualityReview: Send + Sync {
    /// Review `artifact` following `instruction`.
    async fn review(&self, artifact: &[u8], instruction: &str) -> QualityVerdict;
}

/// Reviewer backed by the NIM chat completions endpoint.
pub struct QualityReviewer {
    http: Client,
    config: NimConfig,
    mime_type: String,
}

impl QualityReviewer {
    /// Create a new reviewer.
    pub fn new(config: NimConfig) -> ClientResult<Self> {
        let http = Client::builder().timeout(config.request_timeout).build()?;

        Ok(Self {
            http,
            config,
            mime_type: "video/mp4".to_string(),
        })
    }

    /// Override the MIME type used in the data URL.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    fn build_request(&self, artifact: &[u8], instruction: &str) -> ChatCompletionRequest {
        let data_url = format!("data:{};base64,{}", self.mime_type, STANDARD.encode(artifact));

        ChatCompletionRequest {
            model: self.config.review_model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: vec![
                    ContentItem::Text {
                        text: instruction.to_string(),
                    },
                    ContentItem::File { url: data_url },
                ],
            }],
        }
    }

    /// Single request, no retry.
    async fn request_analysis(&self, artifact: &[u8], instruction: &str) -> ClientResult<String> {
        let url = self.config.endpoint(CHAT_COMPLETIONS_PATH);
        debug!(
            "Sending {} byte artifact for review to {}",
            artifact.len(),
            url
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&self.build_request(artifact, instruction))
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

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            ClientError::invalid_response(format!("Failed to parse review response: {}", e))
        })?;

        completion
            .first_content()
            .map(str::to_string)
            .ok_or_else(|| ClientError::contract_violation("No content in review response"))
    }
}

#[async_trait]
impl QualityReview for QualityReviewer {
    async fn review(&self, artifact: &[u8], instruction: &str) -> QualityVerdict {
        match self.request_analysis(artifact, instruction).await {
            Ok(analysis) => {
                info!("Quality analysis: {}", preview(&analysis, 200));
                let verdict = QualityVerdict::from_analysis(analysis);
                if verdict.approved {
                    info!("Video approved for production");
                } else {
                    warn!("Video requires corrections");
                }
                verdict
            }
            Err(e) => {
                warn!("Quality check failed: {}", e);
                QualityVerdict::rejected_without_analysis()
            }
        }
    }
}
