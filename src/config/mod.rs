//! `.dimap.toml` configuration.
//!
//! Every section and field is optional; anything missing takes its default.

pub mod loader;
pub mod parallel;

pub use loader::{directory_ancestors, load_config, load_config_from, CONFIG_FILE_NAME};
pub use parallel::ParallelConfig;

use crate::io::OutputFormat;
use crate::patterns::Vendor;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DimapConfig {
    pub analysis: AnalysisConfig,
    pub files: FilesConfig,
    pub parallel: ParallelConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Pattern catalogs to apply, in order.
    pub vendors: Vec<Vendor>,
    /// Whether cycle detection also walks service -> implementation edges.
    pub follow_registrations: bool,
    /// Extra parameter types never treated as services.
    pub ignored_service_types: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            vendors: Vendor::ALL.to_vec(),
            follow_registrations: true,
            ignored_service_types: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    pub extensions: Vec<String>,
    pub exclude: Vec<String>,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["cs".to_string()],
            exclude: vec![
                "**/bin/**".to_string(),
                "**/obj/**".to_string(),
                "**/node_modules/**".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

/// Contents written by `dimap init`.
pub fn default_config_toml() -> String {
    r#"# dimap configuration

[analysis]
# Pattern catalogs to apply: "microsoft", "autofac"
vendors = ["microsoft", "autofac"]
# Also follow service -> implementation edges when looking for cycles
follow_registrations = true
# Parameter types that are never treated as injected services
ignored_service_types = []

[files]
extensions = ["cs"]
exclude = ["**/bin/**", "**/obj/**", "**/node_modules/**"]

[parallel]
enabled = true
# 0 uses one worker per CPU
jobs = 0

[output]
# "terminal" or "json"
format = "terminal"
"#
    .to_string()
}
