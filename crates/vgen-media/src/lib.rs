//! Media handling for generated videos.
//!
//! This crate provides:
//! - Streaming download of remote videos to disk
//! - Timestamped artifact file naming

pub mod download;
pub mod error;
pub mod naming;

pub use download::MediaDownloader;
pub use error::{MediaError, MediaResult};
pub use naming::{artifact_filename, artifact_filename_now};
