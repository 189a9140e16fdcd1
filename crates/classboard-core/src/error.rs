//! Core error types for classboard-core.
//!
//! Schedule loading fails hard (`FormatError`, `DataSourceError`), the grade
//! aggregate fails only on a misconfigured catalog (`NoCreditsError`), and
//! configuration problems surface as `ConfigError`. Malformed score text is
//! deliberately *not* an error; see [`crate::grades::parse_score`].

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for classboard-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Malformed time-of-day text
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Schedule source errors
    #[error("Schedule error: {0}")]
    DataSource(#[from] DataSourceError),

    /// Catalog has no credit hours to average over
    #[error(transparent)]
    NoCredits(#[from] NoCreditsError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A time string that is not strict 24-hour "HH:MM".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid time '{input}': expected 24-hour HH:MM")]
pub struct FormatError {
    pub input: String,
}

impl FormatError {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }
}

/// Errors raised while loading a section's schedule.
///
/// Any of these fails the whole section; a half-loaded schedule is never
/// returned.
#[derive(Error, Debug)]
pub enum DataSourceError {
    /// No section with this id is configured
    #[error("Unknown section '{0}'")]
    UnknownSection(String),

    /// Backing file missing or unreadable
    #[error("Cannot read schedule at {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Structurally invalid CSV
    #[error("Malformed schedule data in {origin}: {source}")]
    Csv {
        origin: String,
        #[source]
        source: csv::Error,
    },

    /// A required column is absent from the header
    #[error("Schedule {origin} is missing required column '{column}'")]
    MissingColumn { origin: String, column: String },

    /// A data row could not be turned into a class session
    #[error("Schedule {origin}, row {row}: {message}")]
    InvalidRow {
        origin: String,
        row: usize,
        message: String,
    },

    /// A data row repeats an earlier row exactly
    #[error("Schedule {origin}, row {row}: duplicate of an earlier class")]
    DuplicateRow { origin: String, row: usize },
}

/// The catalog has zero total credit hours, so no average exists.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Cannot compute CGPA: catalog has no credit hours")]
pub struct NoCreditsError;

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl ConfigError {
    pub(crate) fn invalid(key: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
