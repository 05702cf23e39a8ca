// Domain errors - Error types for the domain layer

use thiserror::Error;

/// Domain-specific error types
#[derive(Debug, Clone, Error)]
pub enum DomainError {
    /// Root directory missing or not a directory
    #[error("Directory does not exist: {0}")]
    NotFound(String),
    /// Discovery finished without a single matching file
    #[error("No video files found in directory: {0}")]
    NoFilesFound(String),
    /// Manual mode was given an empty file list
    #[error("No files provided for manual playlist")]
    EmptyInput,
    /// The playlist could not be persisted. The rendered document is kept.
    #[error("Failed to save playlist file {path}: {reason}")]
    WriteFailed {
        path: String,
        reason: String,
        document: String,
    },
    /// File system operation failed
    #[error("File system error: {0}")]
    FsFail(String),
    /// Invalid arguments provided
    #[error("Bad arguments: {0}")]
    BadArgs(String),
    /// Configuration could not be loaded or validated
    #[error("Configuration error: {0}")]
    Config(String),
    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Playlist text that was built before the failure, if any
    pub fn document(&self) -> Option<&str> {
        match self {
            DomainError::WriteFailed { document, .. } => Some(document.as_str()),
            _ => None,
        }
    }

    /// Whether the run stopped before any file was probed
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            DomainError::NotFound(_) | DomainError::NoFilesFound(_) | DomainError::EmptyInput
        )
    }
}
