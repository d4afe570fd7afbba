//! Error types for classdesk.
//!
//! This module defines the centralized error type [`DeskError`] and a type alias
//! [`Result`] for convenient error handling throughout the crate. All errors are
//! implemented using the `thiserror` crate for automatic `Error` trait implementation.

use thiserror::Error;

/// The main error type for classdesk operations.
///
/// This enum consolidates all error conditions that can occur while loading
/// configuration, talking to the API, persisting local state, or building views
/// from caller-supplied configuration. Variants wrapping errors from external
/// crates use `#[from]` for automatic conversion.
///
/// # Examples
///
/// ```
/// use classdesk::DeskError;
///
/// fn validate_mapping() -> Result<(), DeskError> {
///     Err(DeskError::Mapping("entry `name` has no directive".to_string()))
/// }
///
/// let err = validate_mapping().unwrap_err();
/// assert_eq!(err.to_string(), "Field mapping error: entry `name` has no directive");
/// ```
#[derive(Debug, Error)]
pub enum DeskError {
    /// Local storage operation failed.
    ///
    /// Occurs when reading from or writing to the key/value storage file fails.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Theme parsing or application failed.
    #[error("Theme error: {0}")]
    Theme(String),

    /// Communication with the background fetch worker failed.
    #[error("Worker communication error: {0}")]
    Worker(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A field mapping or search configuration is malformed.
    ///
    /// These come from caller-controlled configuration, never from user input,
    /// so they are reported as soon as the configuration is read.
    #[error("Field mapping error: {0}")]
    Mapping(String),

    /// A date string could not be parsed.
    #[error("Date parse error: {0}")]
    DateParse(String),

    /// The request never produced an HTTP response (connection, TLS, timeout).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The API answered with a status outside `[200, 300)`.
    #[error("API error {status}: {body}")]
    Api {
        /// HTTP status code returned by the backend.
        status: u16,
        /// Raw response body.
        body: String,
    },
}

/// A specialized `Result` type for classdesk operations.
pub type Result<T> = std::result::Result<T, DeskError>;
