//! Wire format of the external semantic analyzer.
//!
//! Every field is optional on input; missing or `null` values deserialize
//! to empty strings, empty lists or zero.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Reads `null` as the type's default.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ExternalResult {
    #[serde(deserialize_with = "null_default")]
    pub projects: Vec<ExternalProject>,
    pub solution_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ExternalProject {
    #[serde(deserialize_with = "null_default")]
    pub project_name: String,
    #[serde(deserialize_with = "null_default")]
    pub project_path: String,
    #[serde(deserialize_with = "null_default")]
    pub service_registrations: Vec<ExternalRegistration>,
    #[serde(deserialize_with = "null_default")]
    pub lifetime_conflicts: Vec<ExternalLifetimeConflict>,
    #[serde(deserialize_with = "null_default")]
    pub service_dependency_issues: Vec<ExternalDependencyIssue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ExternalRegistration {
    #[serde(deserialize_with = "null_default")]
    pub service_type: String,
    #[serde(deserialize_with = "null_default")]
    pub implementation_type: String,
    /// Numeric lifetime code, kept raw so unknown shapes map to `Others`.
    pub lifetime: Option<Value>,
    #[serde(deserialize_with = "null_default")]
    pub file_path: String,
    #[serde(deserialize_with = "null_default")]
    pub line_number: usize,
    #[serde(deserialize_with = "null_default")]
    pub registration_method: String,
    #[serde(deserialize_with = "null_default")]
    pub injection_sites: Vec<ExternalInjectionSite>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ExternalInjectionSite {
    #[serde(deserialize_with = "null_default")]
    pub file_path: String,
    #[serde(deserialize_with = "null_default")]
    pub line_number: usize,
    #[serde(deserialize_with = "null_default")]
    pub class_name: String,
    #[serde(deserialize_with = "null_default")]
    pub member_name: String,
    #[serde(rename = "Type")]
    pub kind: Option<Value>,
    /// Falls back to the owning registration's service type.
    pub service_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ExternalLifetimeConflict {
    #[serde(deserialize_with = "null_default")]
    pub service_type: String,
    #[serde(deserialize_with = "null_default")]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ExternalDependencyIssue {
    #[serde(deserialize_with = "null_default")]
    pub service_type: String,
    pub issue_type: Option<Value>,
    #[serde(deserialize_with = "null_default")]
    pub description: String,
}
