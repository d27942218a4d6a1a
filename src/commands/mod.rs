//! CLI command implementations.
//!
//! - **analyze**: text-pattern analysis of a project directory
//! - **import**: conversion of an external analyzer result
//! - **init**: default configuration file

pub mod analyze;
pub mod import;
pub mod init;

pub use analyze::{handle_analyze, AnalyzeArgs};
pub use import::handle_import;
pub use init::init_config;

use crate::core::ProjectDI;
use crate::io::{create_writer, open_destination, OutputFormat};
use crate::observability::{set_phase, AnalysisPhase};
use anyhow::{Context, Result};
use std::path::Path;

/// Render `projects` to stdout or `output`. A single project is written
/// as an object, several as an array.
pub(crate) fn emit(
    projects: &[ProjectDI],
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    let _phase = set_phase(AnalysisPhase::OutputGeneration);
    if output.is_some() {
        colored::control::set_override(false);
    }

    let destination = open_destination(output).with_context(|| match output {
        Some(path) => format!("Failed to create output file {}", path.display()),
        None => "Failed to open stdout".to_string(),
    })?;
    let mut writer = create_writer(format, destination);
    let written = match projects {
        [single] => writer.write_project(single),
        many => writer.write_projects(many),
    };
    written.context("Failed to write analysis output")
}
