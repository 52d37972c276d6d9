//! Command-line pipeline for vgen.
//!
//! Loads configuration, wires the generation client, downloader, stores
//! and publishers together, and exposes them as `vgen` subcommands.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;

pub use cli::{Cli, Command, GenerateArgs};
pub use config::AppConfig;
pub use error::{CliError, CliResult};
pub use logging::{init_tracing, RunLogger};
pub use pipeline::{GenerationPipeline, PipelineOptions, PipelineReport};
