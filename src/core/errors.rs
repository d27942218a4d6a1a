//! Shared error types for the application

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for dimap operations
#[derive(Debug, Error)]
pub enum Error {
    /// The project root is missing or not a directory
    #[error("Cannot analyze project root {path}: {message}")]
    ProjectRoot { path: PathBuf, message: String },

    /// A source file could not be read
    #[error("Failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The external analyzer result could not be decoded
    #[error("Invalid external analyzer result: {0}")]
    ExternalResult(#[source] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The run was cancelled by the caller
    #[error("Analysis cancelled")]
    Cancelled,

    /// An analysis run was driven through an invalid state transition
    #[error("Invalid analysis state transition: {0}")]
    InvalidState(String),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Pattern errors
    #[error(transparent)]
    Pattern(#[from] glob::PatternError),
}

impl Error {
    pub fn project_root(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ProjectRoot {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Whether the caller should keep its previous results and surface a message.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::FileRead { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_read_error_mentions_path() {
        let err = Error::file_read(
            "src/Program.cs",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.to_string().contains("src/Program.cs"));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_cancelled_is_fatal() {
        assert!(Error::Cancelled.is_fatal());
        assert_eq!(Error::Cancelled.to_string(), "Analysis cancelled");
    }
}
