//! Tracing subscriber initialization.
//!
//! Logs are written to a file so an embedding UI keeps its terminal.
//! Users can monitor logs via `tail -f` in a separate terminal.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for logging initialization failures.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Failed to create log directory
    #[error("Failed to create log directory at {path:?}: {source}")]
    DirectoryCreation {
        /// The directory path that failed to be created
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Invalid log file path (no filename component)
    #[error("Invalid log file path: {0:?}")]
    InvalidPath(PathBuf),

    /// Log path has no parent directory
    #[error("Log path has no parent directory: {0:?}")]
    NoParentDirectory(PathBuf),

    /// Default directive is not a valid `EnvFilter`
    #[error("Invalid log filter {directive:?}: {reason}")]
    InvalidFilter {
        /// The rejected directive
        directive: String,
        /// Parser message
        reason: String,
    },

    /// Tracing subscriber already initialized
    #[error("Tracing subscriber already initialized")]
    SubscriberAlreadySet,
}

/// Initialize the tracing subscriber with file-based logging.
///
/// `RUST_LOG` wins when set; otherwise `default_directive` (from the
/// `log_filter` config key) selects what is recorded.
///
/// Creates the log directory if it doesn't exist.
///
/// # Arguments
///
/// * `log_path` - Path to the log file
/// * `default_directive` - `EnvFilter` directive used when `RUST_LOG` is unset
///
/// # Errors
///
/// Returns [`LoggingError`] if directory creation failed, the directive does
/// not parse, or a subscriber was already installed.
pub fn init(log_path: &Path, default_directive: &str) -> Result<(), LoggingError> {
    use tracing_subscriber::EnvFilter;

    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| LoggingError::DirectoryCreation {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let file_name = log_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| LoggingError::InvalidPath(log_path.to_path_buf()))?;

    let directory = log_path
        .parent()
        .ok_or_else(|| LoggingError::NoParentDirectory(log_path.to_path_buf()))?;

    let file_appender = tracing_appender::rolling::never(directory, file_name);

    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directive).map_err(|e| LoggingError::InvalidFilter {
            directive: default_directive.to_string(),
            reason: e.to_string(),
        })?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(file_appender)
        .with_ansi(false)
        .try_init()
        .map_err(|_| LoggingError::SubscriberAlreadySet)
}
