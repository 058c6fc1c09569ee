//! Error types for the Emberwatch plugin.
//!
//! [`EmberwatchError`] is the crate-wide error, with a [`Result`] alias. Two
//! narrower enums describe the failures a user actually sees:
//! [`ValidationError`] for files rejected at intake and [`AnalysisError`] for
//! failures of the classification step. Both render their `Display` text
//! directly into notifications, so the messages are written for people.

use crate::domain::UploadStatus;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The main error type for Emberwatch operations.
///
/// Most variants wrap a narrower error with `#[from]` so `?` converts them
/// at module boundaries.
#[derive(Debug, Error)]
pub enum EmberwatchError {
    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An offered file was rejected before any state change.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The classification step failed.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    /// The lifecycle controller was asked to take an edge it does not have.
    #[error("Invalid lifecycle transition from {from:?} to {to:?}")]
    InvalidTransition {
        /// Status at the time of the request.
        from: UploadStatus,
        /// Requested target status.
        to: UploadStatus,
    },

    /// Theme parsing or loading failed.
    #[error("Theme error: {0}")]
    Theme(String),

    /// Communication with the background worker failed.
    #[error("Worker communication error: {0}")]
    Worker(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Preference storage failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Reasons an offered file is refused by intake.
///
/// Validation errors never change lifecycle state; they are surfaced as a
/// transient notice and the previous selection (if any) stays in place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// File is larger than the intake limit.
    #[error("File size exceeds {}MB limit", .limit_bytes / (1024 * 1024))]
    TooLarge {
        /// Size of the offered file.
        size_bytes: u64,
        /// Configured limit.
        limit_bytes: u64,
    },

    /// Extension is not one of the accepted image types.
    #[error("{name} is not supported. Use a JPG, JPEG or PNG image")]
    UnsupportedType {
        /// File name as offered.
        name: String,
    },

    /// Extension claims JPEG/PNG but the bytes say otherwise.
    #[error("{name} does not contain JPEG or PNG data")]
    ContentMismatch {
        /// File name as offered.
        name: String,
    },

    /// The file could not be read or decoded into a preview.
    #[error("Could not read {name}: {reason}")]
    Unreadable {
        /// File name as offered.
        name: String,
        /// Underlying cause.
        reason: String,
    },
}

/// Failures of the classification step.
///
/// Serializable because the worker reports them across the IPC boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum AnalysisError {
    /// The cancellation token was triggered.
    #[error("analysis was cancelled")]
    Cancelled,

    /// The analysis did not finish within its deadline.
    #[error("analysis timed out after {after_ms} ms")]
    TimedOut {
        /// Budget that was exceeded.
        after_ms: u64,
    },

    /// The classifier was handed no bytes.
    #[error("image contains no data")]
    EmptyImage,

    /// The worker could not read the image file.
    #[error("failed to read image: {0}")]
    Read(String),

    /// The classifier itself failed.
    #[error("classifier failure: {0}")]
    Classifier(String),
}

/// A specialized `Result` type for Emberwatch operations.
pub type Result<T> = std::result::Result<T, EmberwatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_large_message_reports_limit_in_megabytes() {
        let err = ValidationError::TooLarge {
            size_bytes: 12 * 1024 * 1024,
            limit_bytes: 10 * 1024 * 1024,
        };
        assert_eq!(err.to_string(), "File size exceeds 10MB limit");
    }

    #[test]
    fn validation_error_converts_into_crate_error() {
        let err: EmberwatchError = ValidationError::UnsupportedType {
            name: "smoke.gif".to_string(),
        }
        .into();
        assert!(matches!(err, EmberwatchError::Validation(_)));
        assert!(err.to_string().contains("smoke.gif"));
    }
}
