//! Local records and remote publishing for generated videos.
//!
//! This crate provides:
//! - The append-only generation audit log (JSON Lines)
//! - Per-artifact metadata documents
//! - Artifact upload to a GitLab project

pub mod audit;
pub mod error;
pub mod metadata;
pub mod upload;

pub use audit::{AuditLogger, AUDIT_LOG_FILE};
pub use error::{StorageError, StorageResult};
pub use metadata::MetadataStore;
pub use upload::{ArtifactUploader, UploadConfig};
