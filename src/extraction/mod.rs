//! Text-pattern extraction of registrations and injection sites.
//!
//! Extraction is pure: a file path and its text go in, records come out.
//! File reading and fan-out across files live in [`crate::builders`].
//!
//! # Usage
//!
//! ```rust
//! use dimap::extraction::extract_file;
//! use dimap::patterns::PatternSet;
//! use std::path::Path;
//!
//! let text = "builder.Services.AddScoped<IUserService, UserService>();";
//! let extracted = extract_file(Path::new("Program.cs"), text, &PatternSet::default(), &[]);
//! assert_eq!(extracted.registrations.len(), 1);
//! ```

pub mod call_args;
pub mod class_context;
pub mod injections;
pub mod registrations;
pub mod types;

pub use class_context::enclosing_class;
pub use injections::extract_injection_sites;
pub use registrations::extract_registrations;

use crate::core::{InjectionSite, Registration};
use crate::patterns::PatternSet;
use std::path::{Path, PathBuf};

/// Everything extracted from one file, merged into the shared collections
/// in a single step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileExtraction {
    pub path: PathBuf,
    pub registrations: Vec<Registration>,
    pub injection_sites: Vec<InjectionSite>,
}

impl FileExtraction {
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty() && self.injection_sites.is_empty()
    }
}

/// Run both extractors over one file.
pub fn extract_file(
    path: &Path,
    text: &str,
    patterns: &PatternSet,
    ignored_types: &[String],
) -> FileExtraction {
    let index = LineIndex::new(text);
    FileExtraction {
        path: path.to_path_buf(),
        registrations: registrations::extract_with_index(path, text, &index, patterns),
        injection_sites: injections::extract_with_index(
            path,
            text,
            &index,
            patterns,
            ignored_types,
        ),
    }
}

/// Maps byte offsets to 1-based line numbers.
///
/// Equivalent to counting `'\n'` characters before the offset, but
/// answers each query with a binary search.
#[derive(Debug, Clone)]
pub struct LineIndex {
    newlines: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        Self {
            newlines: text
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i)
                .collect(),
        }
    }

    /// 1-based line containing `offset`.
    pub fn line_number(&self, offset: usize) -> usize {
        self.newlines.partition_point(|&nl| nl < offset) + 1
    }

    pub fn line_count(&self) -> usize {
        self.newlines.len() + 1
    }
}
