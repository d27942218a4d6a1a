use crate::adapter::import_external;
use crate::io::OutputFormat;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::info;

/// Convert an external analyzer result file and write one model per
/// foreign project.
pub fn handle_import(input: &Path, format: OutputFormat, output: Option<&Path>) -> Result<()> {
    let json = fs::read_to_string(input)
        .with_context(|| format!("Failed to read external result {}", input.display()))?;
    let projects = import_external(&json)
        .with_context(|| format!("Failed to import {}", input.display()))?;
    info!(projects = projects.len(), "imported external result");

    super::emit(&projects, format, output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use tempfile::TempDir;

    #[test]
    fn test_import_writes_one_model_per_project() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("result.json");
        fs::write(
            &input,
            indoc! {r#"
                {
                  "Projects": [
                    {
                      "ProjectName": "Api",
                      "ServiceRegistrations": [
                        { "ServiceType": "IClock", "ImplementationType": "Clock", "Lifetime": 2,
                          "FilePath": "Program.cs", "LineNumber": 4 }
                      ]
                    },
                    { "ProjectName": "Worker" }
                  ]
                }
            "#},
        )
        .unwrap();
        let out = dir.path().join("out.json");

        handle_import(&input, OutputFormat::Json, Some(&out)).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out).unwrap()).unwrap();
        let projects = json.as_array().unwrap();
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0]["projectName"], "Api");
        assert_eq!(projects[0]["serviceGroups"][0]["lifetime"], "Singleton");
        assert_eq!(projects[1]["parseStatus"], "failed");
    }

    #[test]
    fn test_malformed_input_is_an_error() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("result.json");
        fs::write(&input, "{ not json").unwrap();
        assert!(handle_import(&input, OutputFormat::Json, None).is_err());
    }
}
