//! Per-file failure collection.
//!
//! A failing file never stops the run: every file is processed
//! independently and both the successes and the failures are returned.

use std::fmt;
use std::path::PathBuf;

/// Outcome of processing a batch of independent files.
#[derive(Debug, Clone)]
pub struct AnalysisResults<T> {
    pub successes: Vec<T>,
    pub failures: Vec<AnalysisFailure>,
}

impl<T> AnalysisResults<T> {
    pub fn new(successes: Vec<T>, failures: Vec<AnalysisFailure>) -> Self {
        Self {
            successes,
            failures,
        }
    }

    pub fn success_count(&self) -> usize {
        self.successes.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    pub fn is_complete_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Failures rendered for `ProjectDI.errorDetails`.
    pub fn error_details(&self) -> Vec<String> {
        self.failures.iter().map(ToString::to_string).collect()
    }
}

impl<T> FromIterator<Result<T, AnalysisFailure>> for AnalysisResults<T> {
    fn from_iter<I: IntoIterator<Item = Result<T, AnalysisFailure>>>(iter: I) -> Self {
        let mut results = Self::new(Vec::new(), Vec::new());
        for item in iter {
            match item {
                Ok(value) => results.successes.push(value),
                Err(failure) => results.failures.push(failure),
            }
        }
        results
    }
}

/// A file that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisFailure {
    pub path: PathBuf,
    pub operation: OperationType,
    pub error: String,
}

impl AnalysisFailure {
    pub fn new(path: PathBuf, operation: OperationType, error: impl fmt::Display) -> Self {
        Self {
            path,
            operation,
            error: error.to_string(),
        }
    }

    pub fn file_read(path: PathBuf, error: impl fmt::Display) -> Self {
        Self::new(path, OperationType::FileRead, error)
    }

    pub fn extraction(path: PathBuf, error: impl fmt::Display) -> Self {
        Self::new(path, OperationType::Extraction, error)
    }
}

impl fmt::Display for AnalysisFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}: {}",
            self.path.display(),
            self.operation.as_str(),
            self.error
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationType {
    FileRead,
    Extraction,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FileRead => "File read",
            Self::Extraction => "Extraction",
        }
    }
}
