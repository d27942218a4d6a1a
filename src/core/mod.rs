//! Canonical dependency-injection model produced by every analysis path.
//!
//! All entities are owned by the [`ProjectDI`] that contains them.
//! Cross references between injection sites and registrations are plain
//! identifiers so the whole model serializes without cycles.

pub mod errors;

pub use errors::Error;

use crate::analysis::graph::DependencyGraph;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// Class name used when no enclosing class can be recovered for a site.
pub const UNKNOWN_CLASS: &str = "UnknownClass";

/// Service type value that marks a failed extraction.
pub const UNKNOWN_TYPE: &str = "Unknown";

/// Object reuse scope of a registration.
///
/// Declaration order (Singleton, Scoped, Transient, Others) is the ordering
/// used for sorting and reporting. It is unrelated to the numeric codes of
/// the external analyzer, see [`crate::adapter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Lifetime {
    Singleton,
    Scoped,
    Transient,
    Others,
}

impl Lifetime {
    /// All lifetimes in declaration order.
    pub const ALL: [Lifetime; 4] = [
        Lifetime::Singleton,
        Lifetime::Scoped,
        Lifetime::Transient,
        Lifetime::Others,
    ];

    /// Order in which service groups are emitted.
    pub const GROUP_ORDER: [Lifetime; 4] = [
        Lifetime::Scoped,
        Lifetime::Singleton,
        Lifetime::Transient,
        Lifetime::Others,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Lifetime::Singleton => "Singleton",
            Lifetime::Scoped => "Scoped",
            Lifetime::Transient => "Transient",
            Lifetime::Others => "Others",
        }
    }

    /// Parse the lifetime word used in registration method names
    /// (`AddSingleton`, `TryAddScoped`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Singleton" => Some(Lifetime::Singleton),
            "Scoped" => Some(Lifetime::Scoped),
            "Transient" => Some(Lifetime::Transient),
            "Others" => Some(Lifetime::Others),
            _ => None,
        }
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A discovered call binding a service type to an implementation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: String,
    pub lifetime: Lifetime,
    pub service_type: String,
    pub implementation_type: String,
    pub file_path: PathBuf,
    /// 1-based
    pub line_number: usize,
    pub method_call: String,
}

impl Registration {
    pub fn location(&self) -> String {
        format!("{}:{}", self.file_path.display(), self.line_number)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InjectionKind {
    Constructor,
    Method,
    Field,
}

impl fmt::Display for InjectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InjectionKind::Constructor => f.write_str("constructor"),
            InjectionKind::Method => f.write_str("method"),
            InjectionKind::Field => f.write_str("field"),
        }
    }
}

/// A location where a service type is consumed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InjectionSite {
    pub file_path: PathBuf,
    pub line_number: usize,
    pub class_name: String,
    pub member_name: String,
    pub kind: InjectionKind,
    pub service_type: String,
    /// Filled in by [`crate::analysis::linker`].
    #[serde(default)]
    pub linked_registration_ids: Vec<String>,
}

impl InjectionSite {
    pub fn has_known_class(&self) -> bool {
        self.class_name != UNKNOWN_CLASS
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConflictKind {
    MixedLifetimes,
    DuplicateImplementation,
    MultipleImplementations,
    UnregisteredInjection,
    UnusedService,
}

impl ConflictKind {
    /// Whether a conflict of this kind marks the service as conflicted.
    ///
    /// `UnusedService` is reported but never sets `hasConflicts`.
    pub fn flags_service(&self) -> bool {
        !matches!(self, ConflictKind::UnusedService)
    }
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConflictKind::MixedLifetimes => "MixedLifetimes",
            ConflictKind::DuplicateImplementation => "DuplicateImplementation",
            ConflictKind::MultipleImplementations => "MultipleImplementations",
            ConflictKind::UnregisteredInjection => "UnregisteredInjection",
            ConflictKind::UnusedService => "UnusedService",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    pub kind: ConflictKind,
    pub details: String,
}

/// All registrations and injection sites sharing one service type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub name: String,
    pub registrations: Vec<Registration>,
    pub injection_sites: Vec<InjectionSite>,
    pub has_conflicts: bool,
    pub conflicts: Vec<Conflict>,
}

impl Service {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            registrations: Vec::new(),
            injection_sites: Vec::new(),
            has_conflicts: false,
            conflicts: Vec::new(),
        }
    }

    /// Distinct lifetimes across the registrations, in declaration order.
    pub fn lifetimes(&self) -> BTreeSet<Lifetime> {
        self.registrations.iter().map(|r| r.lifetime).collect()
    }

    pub fn has_lifetime(&self, lifetime: Lifetime) -> bool {
        self.registrations.iter().any(|r| r.lifetime == lifetime)
    }

    pub fn add_conflict(&mut self, kind: ConflictKind, details: impl Into<String>) {
        if kind.flags_service() {
            self.has_conflicts = true;
        }
        self.conflicts.push(Conflict {
            kind,
            details: details.into(),
        });
    }

    pub fn has_conflict(&self, kind: ConflictKind) -> bool {
        self.conflicts.iter().any(|c| c.kind == kind)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceGroup {
    pub lifetime: Lifetime,
    pub services: Vec<Service>,
    pub count: usize,
}

impl ServiceGroup {
    pub fn new(lifetime: Lifetime, mut services: Vec<Service>) -> Self {
        services.sort_by(|a, b| a.name.cmp(&b.name));
        let count = services.len();
        Self {
            lifetime,
            services,
            count,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseStatus {
    Success,
    Partial,
    Failed,
}

impl fmt::Display for ParseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseStatus::Success => f.write_str("success"),
            ParseStatus::Partial => f.write_str("partial"),
            ParseStatus::Failed => f.write_str("failed"),
        }
    }
}

/// Complete analysis result for one project or solution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDI {
    pub project_path: PathBuf,
    pub project_name: String,
    pub service_groups: Vec<ServiceGroup>,
    pub dependency_graph: DependencyGraph,
    pub cycles: Vec<String>,
    pub parse_status: ParseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_details: Option<Vec<String>>,
    /// Services that are injected somewhere but never registered.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unregistered_services: Vec<Service>,
}

impl ProjectDI {
    /// A result carrying no services, used for failed and cancelled runs.
    pub fn failed(project_path: &Path, project_name: String, errors: Vec<String>) -> Self {
        Self {
            project_path: project_path.to_path_buf(),
            project_name,
            service_groups: Vec::new(),
            dependency_graph: DependencyGraph::new(),
            cycles: Vec::new(),
            parse_status: ParseStatus::Failed,
            error_details: Some(errors),
            unregistered_services: Vec::new(),
        }
    }

    /// Every service appearing in at least one group, deduplicated by name.
    pub fn services(&self) -> Vec<&Service> {
        let mut seen = BTreeSet::new();
        self.service_groups
            .iter()
            .flat_map(|g| g.services.iter())
            .filter(|s| seen.insert(s.name.as_str()))
            .collect()
    }

    pub fn group(&self, lifetime: Lifetime) -> Option<&ServiceGroup> {
        self.service_groups.iter().find(|g| g.lifetime == lifetime)
    }

    pub fn find_service(&self, name: &str) -> Option<&Service> {
        self.services()
            .into_iter()
            .find(|s| s.name == name)
            .or_else(|| self.unregistered_services.iter().find(|s| s.name == name))
    }

    pub fn registration_count(&self) -> usize {
        self.services().iter().map(|s| s.registrations.len()).sum()
    }

    pub fn conflict_count(&self) -> usize {
        let registered: usize = self.services().iter().map(|s| s.conflicts.len()).sum();
        let unregistered: usize = self
            .unregistered_services
            .iter()
            .map(|s| s.conflicts.len())
            .sum();
        registered + unregistered
    }
}
