//! Shared data models for the vgen video generation client.
//!
//! This crate provides Serde-serializable types for:
//! - Generation requests, results and their metadata
//! - Audit log records
//! - Quality review verdicts
//! - Per-artifact metadata documents

pub mod artifact;
pub mod audit;
pub mod error;
pub mod generation;
pub mod verdict;

pub use artifact::{ArtifactMetadata, ArtifactStatus};
pub use audit::AuditRecord;
pub use error::{ValidationError, ValidationResult};
pub use generation::{
    GenerationMetadata, GenerationRequest, GenerationResult, GenerationStatus, Resolution,
    DEFAULT_DURATION_SECS, DEFAULT_FPS, DEFAULT_RESOLUTION, DEFAULT_VIDEO_MODEL,
};
pub use verdict::{QualityVerdict, APPROVAL_MARKER};
