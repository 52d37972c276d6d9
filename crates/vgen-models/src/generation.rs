//! Video generation request and result models.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};

/// Default clip length in seconds.
pub const DEFAULT_DURATION_SECS: u32 = 5;

/// Default output resolution (4K UHD).
pub const DEFAULT_RESOLUTION: &str = "3840x2160";

/// Default frames per second.
pub const DEFAULT_FPS: u32 = 30;

/// Default text-to-video model.
pub const DEFAULT_VIDEO_MODEL: &str = "nvidia/cosmos-transfer1-7b";

/// Output frame size, serialized as `WIDTHxHEIGHT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> ValidationResult<Self> {
        if width == 0 || height == 0 {
            return Err(ValidationError::InvalidResolution(format!(
                "{}x{}",
                width, height
            )));
        }
        Ok(Self { width, height })
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 3840,
            height: 2160,
        }
    }
}

impl FromStr for Resolution {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidResolution(s.to_string());

        let (w, h) = s.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
        let width = w.parse::<u32>().map_err(|_| invalid())?;
        let height = h.parse::<u32>().map_err(|_| invalid())?;

        Self::new(width, height).map_err(|_| invalid())
    }
}

impl TryFrom<String> for Resolution {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Resolution> for String {
    fn from(value: Resolution) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A text-to-video generation request.
///
/// Fields are private so a request cannot change after it has been
/// validated and submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    prompt: String,
    duration: u32,
    resolution: Resolution,
    fps: u32,
    model: String,
}

impl GenerationRequest {
    /// Create a request with default duration, resolution, fps and model.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            duration: DEFAULT_DURATION_SECS,
            resolution: Resolution::default(),
            fps: DEFAULT_FPS,
            model: DEFAULT_VIDEO_MODEL.to_string(),
        }
    }

    pub fn with_duration(mut self, duration: u32) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Validate the request.
    pub fn validate(&self) -> ValidationResult<()> {
        if self.prompt.trim().is_empty() {
            return Err(ValidationError::EmptyPrompt);
        }

        if self.duration == 0 {
            return Err(ValidationError::InvalidDuration(self.duration));
        }

        if self.fps == 0 {
            return Err(ValidationError::InvalidFps(self.fps));
        }

        if self.model.trim().is_empty() {
            return Err(ValidationError::EmptyModel);
        }

        Ok(())
    }
}

/// Outcome of a generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStatus {
    Success,
    Error,
}

impl GenerationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationStatus::Success => "success",
            GenerationStatus::Error => "error",
        }
    }
}

impl fmt::Display for GenerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Metadata recorded for a generated video.
///
/// Serializes flat: the request fields sit next to the timestamps and
/// locations, matching the audit log line format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationMetadata {
    #[serde(flatten)]
    pub request: GenerationRequest,

    /// When the video finished generating and downloading
    pub generated_at: DateTime<Utc>,

    /// Remote URL returned by the generation endpoint
    pub video_url: String,

    /// Local path of the downloaded artifact
    pub video_path: PathBuf,
}

/// Result of a completed generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub status: GenerationStatus,
    pub video_url: String,
    pub video_path: PathBuf,
    pub metadata: GenerationMetadata,
}

impl GenerationResult {
    /// Build a successful result for a video that was generated and
    /// downloaded to `video_path`.
    pub fn success(
        request: GenerationRequest,
        video_url: impl Into<String>,
        video_path: impl Into<PathBuf>,
    ) -> Self {
        let video_url = video_url.into();
        let video_path = video_path.into();

        Self {
            status: GenerationStatus::Success,
            metadata: GenerationMetadata {
                request,
                generated_at: Utc::now(),
                video_url: video_url.clone(),
                video_path: video_path.clone(),
            },
            video_url,
            video_path,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == GenerationStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_parse() {
        let res: Resolution = "1920x1080".parse().unwrap();
        assert_eq!(res.width, 1920);
        assert_eq!(res.height, 1080);
        assert_eq!(res.to_string(), "1920x1080");
    }

    #[test]
    fn test_resolution_parse_rejects_garbage() {
        assert!("1920".parse::<Resolution>().is_err());
        assert!("1920x".parse::<Resolution>().is_err());
        assert!("0x1080".parse::<Resolution>().is_err());
        assert!("widexhigh".parse::<Resolution>().is_err());
        assert!("-1x20".parse::<Resolution>().is_err());
    }

    #[test]
    fn test_resolution_serializes_as_string() {
        let res = Resolution::new(1280, 720).unwrap();
        assert_eq!(serde_json::to_string(&res).unwrap(), "\"1280x720\"");

        let back: Resolution = serde_json::from_str("\"1280x720\"").unwrap();
        assert_eq!(back, res);
        assert!(serde_json::from_str::<Resolution>("\"1280by720\"").is_err());
    }

    #[test]
    fn test_request_defaults() {
        let request = GenerationRequest::new("A futuristic city");
        assert_eq!(request.duration(), 5);
        assert_eq!(request.resolution().to_string(), "3840x2160");
        assert_eq!(request.fps(), 30);
        assert_eq!(request.model(), "nvidia/cosmos-transfer1-7b");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_request_validation() {
        assert!(matches!(
            GenerationRequest::new("   ").validate(),
            Err(ValidationError::EmptyPrompt)
        ));
        assert!(matches!(
            GenerationRequest::new("ok").with_duration(0).validate(),
            Err(ValidationError::InvalidDuration(0))
        ));
        assert!(matches!(
            GenerationRequest::new("ok").with_fps(0).validate(),
            Err(ValidationError::InvalidFps(0))
        ));
        assert!(matches!(
            GenerationRequest::new("ok").with_model("").validate(),
            Err(ValidationError::EmptyModel)
        ));
    }

    #[test]
    fn test_metadata_serializes_flat() {
        let request = GenerationRequest::new("ocean waves")
            .with_duration(10)
            .with_resolution("1920x1080".parse().unwrap());
        let result = GenerationResult::success(request, "https://x/y.mp4", "/tmp/y.mp4");

        let value = serde_json::to_value(&result.metadata).unwrap();
        assert_eq!(value["prompt"], "ocean waves");
        assert_eq!(value["duration"], 10);
        assert_eq!(value["resolution"], "1920x1080");
        assert_eq!(value["fps"], 30);
        assert_eq!(value["video_url"], "https://x/y.mp4");
        assert_eq!(value["video_path"], "/tmp/y.mp4");
        assert!(value.get("generated_at").is_some());
        assert!(result.is_success());
        assert_eq!(result.status.to_string(), "success");
    }
}
