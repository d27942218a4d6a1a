//! Static analysis of dependency-injection registrations and injection
//! sites in C# source trees.
//!
//! The engine extracts registrations and injection sites with a declarative
//! pattern catalog, links sites to registrations, groups services by
//! lifetime, runs conflict rules and reports dependency cycles. Results of an
//! external compiler-based analyzer can be imported into the same model.

// Export modules for library usage
pub mod adapter;
pub mod analysis;
pub mod builders;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod errors;
pub mod extraction;
pub mod io;
pub mod observability;
pub mod patterns;
pub mod testkit;

// Re-export commonly used types
pub use crate::core::{
    Conflict, ConflictKind, Error, InjectionKind, InjectionSite, Lifetime, ParseStatus,
    ProjectDI, Registration, Service, ServiceGroup,
};

pub use crate::adapter::import_external;
pub use crate::analysis::{build_model, AnalysisModel, DependencyGraph};
pub use crate::builders::{analyze_project, AnalysisOptions, CancellationToken, ProjectAnalyzer};
pub use crate::config::DimapConfig;
pub use crate::extraction::{extract_file, FileExtraction};
pub use crate::io::output::{create_writer, OutputFormat, OutputWriter};
pub use crate::patterns::{PatternSet, Vendor};
