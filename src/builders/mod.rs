//! Drivers that turn a project on disk into a [`ProjectDI`](crate::core::ProjectDI).

pub mod cancellation;
pub mod project_analysis;

pub use cancellation::CancellationToken;
pub use project_analysis::{analyze_project, AnalysisOptions, ProjectAnalyzer};
