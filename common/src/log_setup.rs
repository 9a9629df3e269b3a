use std::io;
use std::path::PathBuf;
use std::sync::OnceLock;

use thiserror::Error;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Where and how verbosely to log.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Filter used when `RUST_LOG` is not set, e.g. `"info"` or `"imputation=debug"`.
    pub base_level: String,
    /// Directory for the rolling log files.
    pub directory: PathBuf,
    /// Log file name prefix.
    pub file_prefix: String,
    pub max_log_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            base_level: "info".to_string(),
            directory: PathBuf::from("logs"),
            file_prefix: "imputation".to_string(),
            max_log_files: 5,
        }
    }
}

#[derive(Debug, Error)]
pub enum LogSetupError {
    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("Failed to create log directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to create log file appender: {0}")]
    Appender(String),

    #[error("Logging already initialized")]
    AlreadyInitialized,
}

/// Installs the global tracing subscriber: console output (warnings and
/// errors go to stderr) plus a daily rolling file in `config.directory`.
///
/// `RUST_LOG` takes precedence over `config.base_level`.
pub fn setup_logging(config: &LogConfig) -> Result<(), LogSetupError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.base_level).map_err(|e| {
            LogSetupError::InvalidFilter {
                filter: config.base_level.clone(),
                reason: e.to_string(),
            }
        })?,
    };

    if LOG_GUARD.get().is_some() {
        return Err(LogSetupError::AlreadyInitialized);
    }

    std::fs::create_dir_all(&config.directory).map_err(|source| {
        LogSetupError::CreateDirectory {
            path: config.directory.clone(),
            source,
        }
    })?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(&config.file_prefix)
        .filename_suffix("log")
        .max_log_files(config.max_log_files)
        .build(&config.directory)
        .map_err(|e| LogSetupError::Appender(e.to_string()))?;

    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
    LOG_GUARD
        .set(guard)
        .map_err(|_| LogSetupError::AlreadyInitialized)?;

    let console_writer = std::io::stdout.and(std::io::stderr.with_min_level(Level::WARN));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true)
                .with_writer(console_writer),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_file(true)
                .with_line_number(true)
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .try_init()
        .map_err(|_| LogSetupError::AlreadyInitialized)?;

    tracing::info!(
        "Logging to {} (prefix '{}', keeping {} files)",
        config.directory.display(),
        config.file_prefix,
        config.max_log_files
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_logging_creates_directory() {
        let directory = std::env::temp_dir().join(format!("imputation-logs-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&directory);

        let config = LogConfig {
            base_level: "debug".to_string(),
            directory: directory.clone(),
            ..LogConfig::default()
        };
        setup_logging(&config).unwrap();
        tracing::debug!("log setup test event");

        assert!(directory.is_dir());
        assert!(LOG_GUARD.get().is_some());
        assert!(matches!(
            setup_logging(&config),
            Err(LogSetupError::AlreadyInitialized)
        ));
    }

    #[test]
    fn test_invalid_filter_rejected() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let err = setup_logging(&LogConfig {
            base_level: "imputation=notalevel".to_string(),
            ..LogConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, LogSetupError::InvalidFilter { .. }));
    }
}
