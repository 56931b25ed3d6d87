//! Error types for the VWAP calculator.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the VWAP calculator.
#[derive(Error, Debug)]
pub enum Error {
    /// Window size or other run setting is unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Time-of-day string failed validation.
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Input row with an unparseable or missing field.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// VWAP requested on a record with no volume.
    #[error("Division by zero: {0}")]
    DivisionByZero(String),

    /// Operation invoked in a state that does not allow it.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error.
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Error::InvalidConfiguration(msg.into())
    }

    /// Create a timestamp error.
    pub fn invalid_timestamp(msg: impl Into<String>) -> Self {
        Error::InvalidTimestamp(msg.into())
    }

    /// Create a record error.
    pub fn invalid_record(msg: impl Into<String>) -> Self {
        Error::InvalidRecord(msg.into())
    }

    /// Create a division by zero error.
    pub fn division_by_zero(msg: impl Into<String>) -> Self {
        Error::DivisionByZero(msg.into())
    }

    /// Create a state error.
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Error::InvalidState(msg.into())
    }

    /// Whether this error came from the file system or CSV framing.
    pub fn is_io(&self) -> bool {
        matches!(self, Error::Io(_) | Error::Csv(_))
    }
}
