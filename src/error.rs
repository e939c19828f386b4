//! Unified error hierarchy for RideSplit
//!
//! Maps the analysis failure taxonomy (empty input, invalid configuration,
//! unsorted streams, collaborator IO) onto structured error types with
//! severity levels and user-facing messages.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for all RideSplit operations
#[derive(Debug, Error)]
pub enum RideSplitError {
    /// Segmentation was invoked on a stream with no samples
    #[error("empty telemetry stream: segmentation requires at least one sample")]
    EmptyInput,

    /// A threshold or FTP value that would make the analysis degenerate
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Timestamps are not monotonically non-decreasing
    #[error("unsorted input: sample {index} precedes its predecessor")]
    UnsortedInput { index: usize },

    /// Data validation errors
    #[error("validation error: {0}")]
    Validation(String),

    /// Telemetry decoding errors
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Sub-activity encoding errors
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Telemetry decoding specific errors
#[derive(Debug, Error)]
pub enum DecodeError {
    /// File not found at specified path
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// No decoder recognizes the file
    #[error("unsupported format: {path}")]
    UnsupportedFormat { path: PathBuf },

    /// Format-specific parsing error
    #[error("parse error in {format}: {reason}")]
    Parse { format: String, reason: String },

    /// A required telemetry field is missing or malformed
    #[error("invalid field {field} in record {record}: {reason}")]
    InvalidField {
        field: String,
        record: usize,
        reason: String,
    },
}

/// Sub-activity encoding specific errors
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Writing the target file failed
    #[error("failed to write {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },

    /// Output format not supported by any encoder
    #[error("unsupported output format: {format}")]
    UnsupportedFormat { format: String },
}

/// Result type alias for RideSplit operations
pub type Result<T> = std::result::Result<T, RideSplitError>;

impl RideSplitError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RideSplitError::EmptyInput => ErrorSeverity::Warning,
            RideSplitError::Decode(DecodeError::FileNotFound { .. }) => ErrorSeverity::Warning,
            RideSplitError::InvalidConfiguration(_) => ErrorSeverity::Error,
            RideSplitError::UnsortedInput { .. } => ErrorSeverity::Error,
            RideSplitError::Validation(_) => ErrorSeverity::Warning,
            _ => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            RideSplitError::EmptyInput => {
                "The recording contains no samples. Nothing to analyze.".to_string()
            }
            RideSplitError::UnsortedInput { index } => format!(
                "The recording is not in chronological order (first violation at sample {}). \
                 Re-export the activity before analyzing it.",
                index
            ),
            RideSplitError::Decode(DecodeError::FileNotFound { path }) => {
                format!("Could not find activity file: {}", path.display())
            }
            RideSplitError::Decode(DecodeError::UnsupportedFormat { path }) => format!(
                "No decoder available for {}. Supported formats: FIT, CSV.",
                path.display()
            ),
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Error that prevents the operation but the batch can continue
    Error,
    /// Warning that only affects the single activity being processed
    Warning,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
        }
    }
}
