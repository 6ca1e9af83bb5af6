//! Domain error types
//!
//! Errors are grouped by the stage of a run that produced them, so the CLI can
//! tell an operator whether anything was written before the failure. None of
//! the variants expose third-party types.

use thiserror::Error;

/// Main Veil error type
///
/// Configuration, input and validation errors are raised before the first
/// write. Connection and database errors may occur mid-run.
#[derive(Debug, Error)]
pub enum VeilError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Input file errors (name lists, ignore list, filler corpus)
    #[error("Input error: {0}")]
    Input(String),

    /// Precondition violations detected while planning a substitution
    #[error("Validation error: {0}")]
    Validation(String),

    /// Cannot establish or keep the database connection
    #[error("Connection error: {0}")]
    Connection(String),

    /// Statement failures and unexpected row contents
    #[error("Database error: {0}")]
    Database(String),

    /// Audit and report output errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl VeilError {
    /// Whether the error happened before any row could have been written
    pub fn is_pre_write(&self) -> bool {
        matches!(
            self,
            VeilError::Configuration(_) | VeilError::Input(_) | VeilError::Validation(_)
        )
    }
}

impl From<std::io::Error> for VeilError {
    fn from(err: std::io::Error) -> Self {
        VeilError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for VeilError {
    fn from(err: serde_json::Error) -> Self {
        VeilError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for VeilError {
    fn from(err: toml::de::Error) -> Self {
        VeilError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<tokio_postgres::Error> for VeilError {
    fn from(err: tokio_postgres::Error) -> Self {
        if err.is_closed() {
            VeilError::Connection(err.to_string())
        } else {
            VeilError::Database(err.to_string())
        }
    }
}
