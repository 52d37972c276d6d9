//! Command-line surface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use vgen_client::DEFAULT_REVIEW_PROMPT;
use vgen_models::{
    GenerationRequest, Resolution, DEFAULT_DURATION_SECS, DEFAULT_FPS, DEFAULT_VIDEO_MODEL,
};

use crate::pipeline::PipelineOptions;

#[derive(Debug, Parser)]
#[command(name = "vgen", version, about = "Resilient text-to-video generation")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a video from a text prompt
    Generate(GenerateArgs),
    /// Run the quality review on an existing video
    Review {
        path: PathBuf,
        #[arg(long, default_value = DEFAULT_REVIEW_PROMPT, hide_default_value = true)]
        review_prompt: String,
    },
    /// Upload an existing video and print its public URL
    Upload { path: PathBuf },
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Text description of the video
    #[arg(short, long)]
    pub prompt: String,

    /// Length in seconds
    #[arg(short, long, default_value_t = DEFAULT_DURATION_SECS)]
    pub duration: u32,

    /// WIDTHxHEIGHT
    #[arg(short, long, default_value_t = Resolution::default())]
    pub resolution: Resolution,

    #[arg(long, default_value_t = DEFAULT_FPS)]
    pub fps: u32,

    #[arg(short, long, default_value = DEFAULT_VIDEO_MODEL)]
    pub model: String,

    /// Skip the vision-language quality review
    #[arg(long)]
    pub skip_quality_check: bool,

    /// Skip publishing the video
    #[arg(long, alias = "skip-gitlab")]
    pub skip_upload: bool,

    /// Fail if the quality review does not approve the video
    #[arg(long, conflicts_with = "skip_quality_check")]
    pub require_approval: bool,

    /// Fail if the upload does not succeed
    #[arg(long, conflicts_with = "skip_upload")]
    pub require_upload: bool,

    /// Instruction sent to the reviewer
    #[arg(long, default_value = DEFAULT_REVIEW_PROMPT, hide_default_value = true)]
    pub review_prompt: String,
}

impl GenerateArgs {
    pub fn request(&self) -> GenerationRequest {
        GenerationRequest::new(self.prompt.clone())
            .with_duration(self.duration)
            .with_resolution(self.resolution)
            .with_fps(self.fps)
            .with_model(self.model.clone())
    }

    pub fn options(&self) -> PipelineOptions {
        PipelineOptions {
            skip_review: self.skip_quality_check,
            skip_upload: self.skip_upload,
            require_approval: self.require_approval,
            require_upload: self.require_upload,
            review_prompt: self.review_prompt.clone(),
        }
    }
}
