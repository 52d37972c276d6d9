//! Clients for the NVIDIA NIM endpoints used by vgen.
//!
//! This crate provides:
//! - A retrying caller with deterministic exponential backoff
//! - The text-to-video generation client built on it
//! - A vision-language quality reviewer (single attempt, advisory)

pub mod config;
pub mod error;
pub mod generation;
pub mod retry;
pub mod review;
pub mod types;

pub use config::{NimConfig, DEFAULT_BASE_URL, DEFAULT_REVIEW_MODEL};
pub use error::{ClientError, ClientResult};
pub use generation::GenerationClient;
pub use retry::{RetryPolicy, RetryingCaller, Sleeper, TokioSleeper};
pub use review::{QualityReview, QualityReviewer, DEFAULT_REVIEW_PROMPT};
