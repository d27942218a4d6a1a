use crate::core::ProjectDI;
use crate::io::writers::{JsonWriter, TerminalWriter};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    #[default]
    Terminal,
}

pub trait OutputWriter {
    fn write_project(&mut self, project: &ProjectDI) -> anyhow::Result<()>;

    /// Several results at once, as produced by an external import.
    fn write_projects(&mut self, projects: &[ProjectDI]) -> anyhow::Result<()>;
}

/// Stdout, or a freshly created file.
pub fn open_destination(output: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    Ok(match output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout()),
    })
}

pub fn create_writer<'a>(
    format: OutputFormat,
    destination: Box<dyn Write + 'a>,
) -> Box<dyn OutputWriter + 'a> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(destination)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(destination)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_deserializes_lowercase() {
        #[derive(Deserialize)]
        struct Holder {
            format: OutputFormat,
        }
        let holder: Holder = toml::from_str("format = \"json\"").unwrap();
        assert_eq!(holder.format, OutputFormat::Json);
    }

    #[test]
    fn test_create_writer_json() {
        let project = ProjectDI::failed(Path::new("/repo"), "repo".to_string(), vec![]);
        let mut buffer = Vec::new();
        {
            let mut writer = create_writer(OutputFormat::Json, Box::new(&mut buffer));
            writer.write_project(&project).unwrap();
        }
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["projectName"], "repo");
    }
}
