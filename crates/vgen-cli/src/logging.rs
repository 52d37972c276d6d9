//! Tracing setup and structured run logging.

use tracing::{error, info, warn, Span};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

const DEFAULT_DIRECTIVES: &str = "vgen=info,reqwest=warn,hyper=warn";

/// Initialize the global subscriber.
///
/// `LOG_FORMAT=json` selects JSON lines; otherwise colored human output.
/// `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
}

/// Logger carrying a run id through every stage of one pipeline run.
#[derive(Debug, Clone)]
pub struct RunLogger {
    run_id: String,
    operation: String,
}

impl RunLogger {
    /// New logger with a fresh run id.
    pub fn new(operation: &str) -> Self {
        Self::with_run_id(&Uuid::new_v4().to_string(), operation)
    }

    /// New logger for an existing run id.
    ///
    /// # Arguments
    /// * `run_id` - Identifier shared by every line of the run
    /// * `operation` - What the run does (e.g. "generate", "upload")
    pub fn with_run_id(run_id: &str, operation: &str) -> Self {
        Self {
            run_id: run_id.to_string(),
            operation: operation.to_string(),
        }
    }

    /// Log the start of a run.
    pub fn log_start(&self, message: &str) {
        info!(
            run_id = %self.run_id,
            operation = %self.operation,
            "Run started: {}", message
        );
    }

    /// Log progress within a named pipeline stage.
    pub fn log_stage(&self, stage: &str, message: &str) {
        info!(
            run_id = %self.run_id,
            operation = %self.operation,
            stage = stage,
            "{}", message
        );
    }

    /// Log a non-fatal problem in a stage.
    pub fn log_warning(&self, stage: &str, message: &str) {
        warn!(
            run_id = %self.run_id,
            operation = %self.operation,
            stage = stage,
            "Run warning: {}", message
        );
    }

    /// Log the error that ended a run.
    pub fn log_error(&self, message: &str) {
        error!(
            run_id = %self.run_id,
            operation = %self.operation,
            "Run failed: {}", message
        );
    }

    /// Log the successful end of a run.
    pub fn log_completion(&self, message: &str) {
        info!(
            run_id = %self.run_id,
            operation = %self.operation,
            "Run completed: {}", message
        );
    }

    /// Get the run id.
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Get the operation name.
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Span wrapping the whole run.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "run",
            run_id = %self.run_id,
            operation = %self.operation
        )
    }
}
