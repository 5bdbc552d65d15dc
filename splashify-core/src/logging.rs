//! src/logging.rs
//! ============================================================================
//! # Logging: JSON-lines tracing output to a rolling file
//!
//! The terminal belongs to the UI, so every `tracing` event goes to a daily
//! rolling `*.jsonl` file through a non-blocking writer. `RUST_LOG` overrides
//! the configured level. Keep the returned [`WorkerGuard`] alive for the whole
//! program or buffered lines are lost on exit.

use std::path::Path;

use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

const LOG_FILE_PREFIX: &str = "splashify";

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Logger already initialized")]
    AlreadyInitialized,

    #[error("Invalid log level '{level}': {reason}")]
    InvalidLevel { level: String, reason: String },

    #[error("Failed to create log directory: {0}")]
    DirectoryCreationFailed(#[from] std::io::Error),

    #[error("Failed to create file appender: {0}")]
    Appender(String),
}

pub struct Logger;

impl Logger {
    /// Install the global subscriber. Call once, before the terminal is
    /// switched to raw mode.
    pub fn init(config: &LoggingConfig, log_dir: &Path) -> Result<WorkerGuard, LoggingError> {
        std::fs::create_dir_all(log_dir)?;

        let filter = Self::filter(&config.level)?;

        let file_appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix(LOG_FILE_PREFIX)
            .filename_suffix("jsonl")
            .max_log_files(config.max_files.max(1))
            .build(log_dir)
            .map_err(|e| LoggingError::Appender(e.to_string()))?;

        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let json_layer = fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_target(true)
            .with_ansi(false)
            .with_writer(non_blocking);

        tracing_subscriber::registry()
            .with(filter)
            .with(json_layer)
            .try_init()
            .map_err(|_| LoggingError::AlreadyInitialized)?;

        tracing::info!(
            marker = "LOGGER_READY",
            log_dir = %log_dir.display(),
            level = %config.level,
            "Logging initialized"
        );

        Ok(guard)
    }

    /// `RUST_LOG` when set, otherwise the configured level.
    fn filter(level: &str) -> Result<EnvFilter, LoggingError> {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => EnvFilter::try_new(level).map_err(|e| LoggingError::InvalidLevel {
                level: level.to_string(),
                reason: e.to_string(),
            }),
        }
    }
}
