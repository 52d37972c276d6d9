//! End-to-end generation pipeline.
//!
//! Generate, download, record, then optionally review and publish. Every
//! step is awaited before the next one starts.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::Instrument;
use vgen_client::{GenerationClient, QualityReview, QualityReviewer, Sleeper, DEFAULT_REVIEW_PROMPT};
use vgen_media::{artifact_filename_now, MediaDownloader};
use vgen_models::{ArtifactMetadata, GenerationRequest, GenerationResult, QualityVerdict};
use vgen_storage::{ArtifactUploader, AuditLogger, MetadataStore};

use crate::config::AppConfig;
use crate::error::{CliError, CliResult};
use crate::logging::RunLogger;

/// Switches controlling the optional pipeline stages.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub skip_review: bool,
    pub skip_upload: bool,
    /// Fail the run when the reviewer does not approve
    pub require_approval: bool,
    /// Fail the run when the upload fails
    pub require_upload: bool,
    pub review_prompt: String,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            skip_review: false,
            skip_upload: false,
            require_approval: false,
            require_upload: false,
            review_prompt: DEFAULT_REVIEW_PROMPT.to_string(),
        }
    }
}

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub run_id: String,
    pub result: GenerationResult,
    /// `None` if the metadata document could not be written
    pub artifact: Option<ArtifactMetadata>,
    /// `None` if review was skipped
    pub verdict: Option<QualityVerdict>,
    /// `None` if upload was skipped or failed
    pub public_url: Option<String>,
    /// Non-fatal problems encountered along the way
    pub warnings: Vec<String>,
}

/// Wires the generation client, downloader, stores and publishers together.
pub struct GenerationPipeline {
    generator: GenerationClient,
    downloader: MediaDownloader,
    reviewer: Arc<dyn QualityReview>,
    uploader: ArtifactUploader,
    audit: AuditLogger,
    metadata: MetadataStore,
    output_dir: PathBuf,
}

impl GenerationPipeline {
    /// Build a pipeline with real clocks and the NIM reviewer.
    pub fn from_config(config: &AppConfig) -> CliResult<Self> {
        let generator = GenerationClient::new(config.nim.clone())?;
        Self::assemble(config, generator)
    }

    /// Build a pipeline whose retry backoff goes through `sleeper`.
    pub fn with_sleeper(config: &AppConfig, sleeper: Arc<dyn Sleeper>) -> CliResult<Self> {
        let generator = GenerationClient::with_sleeper(config.nim.clone(), sleeper)?;
        Self::assemble(config, generator)
    }

    fn assemble(config: &AppConfig, generator: GenerationClient) -> CliResult<Self> {
        Ok(Self {
            generator,
            downloader: MediaDownloader::new()?,
            reviewer: Arc::new(QualityReviewer::new(config.nim.clone())?),
            uploader: ArtifactUploader::new(config.upload.clone())?,
            audit: AuditLogger::in_dir(&config.log_dir),
            metadata: MetadataStore::new(&config.metadata_dir),
            output_dir: config.output_dir.clone(),
        })
    }

    /// Replace the quality reviewer.
    pub fn with_reviewer(mut self, reviewer: Arc<dyn QualityReview>) -> Self {
        self.reviewer = reviewer;
        self
    }

    pub fn audit_log(&self) -> &AuditLogger {
        &self.audit
    }

    /// Run the full pipeline for `request`.
    ///
    /// Generation, download and the audit append are fatal on failure.
    /// Metadata, review and upload problems are collected as warnings
    /// unless `options` makes them mandatory.
    pub async fn run(
        &self,
        request: GenerationRequest,
        options: &PipelineOptions,
    ) -> CliResult<PipelineReport> {
        let logger = RunLogger::new("generate");
        let span = logger.create_span();

        let outcome = self
            .run_inner(&logger, request, options)
            .instrument(span)
            .await;

        match &outcome {
            Ok(report) => logger.log_completion(&report.result.video_path.display().to_string()),
            Err(e) => logger.log_error(&e.to_string()),
        }
        outcome
    }

    async fn run_inner(
        &self,
        logger: &RunLogger,
        request: GenerationRequest,
        options: &PipelineOptions,
    ) -> CliResult<PipelineReport> {
        request.validate()?;
        logger.log_start(&format!(
            "model={} duration={}s resolution={} fps={}",
            request.model(),
            request.duration(),
            request.resolution(),
            request.fps()
        ));

        let video_url = self.generator.generate(&request).await?;
        logger.log_stage("generate", &format!("Video URL: {}", video_url));

        let destination = self.output_dir.join(artifact_filename_now(request.prompt()));
        let bytes = self.downloader.download(&video_url, &destination).await?;
        logger.log_stage("download", &format!("{} bytes written", bytes));

        let result = GenerationResult::success(request, video_url, &destination);
        self.audit.record(&result).await?;
        logger.log_stage("audit", &format!("Recorded in {}", self.audit.path().display()));

        let mut warnings = Vec::new();

        let artifact = match self.metadata.save(&destination).await {
            Ok(artifact) => Some(artifact),
            Err(e) => {
                let message = format!("Metadata not saved: {}", e);
                logger.log_warning("metadata", &message);
                warnings.push(message);
                None
            }
        };

        let verdict = if options.skip_review {
            None
        } else {
            Some(
                self.review_stage(logger, &destination, options, &mut warnings)
                    .await?,
            )
        };

        let public_url = if options.skip_upload {
            None
        } else {
            match self.upload_file(&destination).await {
                Ok(url) => Some(url),
                Err(e) if options.require_upload => return Err(e),
                Err(e) => {
                    let message = format!("Upload skipped: {}", e);
                    logger.log_warning("upload", &message);
                    warnings.push(message);
                    None
                }
            }
        };

        Ok(PipelineReport {
            run_id: logger.run_id().to_string(),
            result,
            artifact,
            verdict,
            public_url,
            warnings,
        })
    }

    /// Advisory review inside a run. An unreadable artifact counts as not
    /// approved; only `require_approval` turns that into an error.
    async fn review_stage(
        &self,
        logger: &RunLogger,
        path: &Path,
        options: &PipelineOptions,
        warnings: &mut Vec<String>,
    ) -> CliResult<QualityVerdict> {
        let verdict = match self.review_file(path, &options.review_prompt).await {
            Ok(verdict) => verdict,
            Err(e) => {
                let message = format!("Quality check could not read the video: {}", e);
                logger.log_warning("review", &message);
                warnings.push(message);
                QualityVerdict::rejected_without_analysis()
            }
        };

        if !verdict.approved {
            if options.require_approval {
                return Err(CliError::ReviewRejected);
            }
            let message = "Quality check did not approve the video".to_string();
            logger.log_warning("review", &message);
            warnings.push(message);
        }
        Ok(verdict)
    }

    /// Review a local video file.
    ///
    /// Only an unreadable file is an error; reviewer failures come back as
    /// a non-approving verdict. Inside [`run`](Self::run) an unreadable
    /// file is downgraded to a non-approving verdict as well.
    pub async fn review_file(&self, path: &Path, instruction: &str) -> CliResult<QualityVerdict> {
        let artifact = tokio::fs::read(path).await?;
        Ok(self.reviewer.review(&artifact, instruction).await)
    }

    /// Publish a local video file and return its public URL.
    pub async fn upload_file(&self, path: &Path) -> CliResult<String> {
        Ok(self.uploader.upload(path).await?)
    }
}
