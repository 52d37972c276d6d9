//! NIM request/response wire types.

use serde::{Deserialize, Serialize};
use vgen_models::GenerationRequest;

/// Body of `POST /video/generations`.
#[derive(Debug, Clone, Serialize)]
pub struct VideoGenerationPayload<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub duration: u32,
    pub resolution: String,
    pub fps: u32,
}

impl<'a> From<&'a GenerationRequest> for VideoGenerationPayload<'a> {
    fn from(request: &'a GenerationRequest) -> Self {
        Self {
            model: request.model(),
            prompt: request.prompt(),
            duration: request.duration(),
            resolution: request.resolution().to_string(),
            fps: request.fps(),
        }
    }
}

/// Body of `POST /chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: Vec<ContentItem>,
}

/// One item of a multimodal message.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentItem {
    Text { text: String },
    File { url: String },
}

/// Response of `POST /chat/completions`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Text content of the first choice.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
    }
}
