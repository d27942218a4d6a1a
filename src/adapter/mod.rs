//! Import of results produced by the external compiler-based analyzer.
//!
//! The foreign result replaces extraction and rule evaluation: its
//! registrations, sites and reported issues are mapped straight onto the
//! canonical model. Linking, grouping and cycle detection still run here.

pub mod schema;

use crate::analysis::{
    aggregate_services, group_by_lifetime, link_injection_sites, resolve_status,
    unregistered_services, DependencyGraph,
};
use crate::core::{
    ConflictKind, Error, InjectionKind, InjectionSite, Lifetime, ProjectDI, Registration, Service,
    UNKNOWN_CLASS,
};
use crate::extraction::registrations::RegistrationIds;
use crate::observability::{set_phase, AnalysisPhase};
use schema::{ExternalProject, ExternalRegistration, ExternalResult};
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Lifetime for a foreign numeric code: `0` Transient, `1` Scoped,
/// `2` Singleton. This ordering belongs to the foreign format only and is
/// unrelated to [`Lifetime`]'s declaration order.
pub fn external_lifetime(code: Option<&Value>) -> Lifetime {
    let numeric = match code {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => match s.trim().parse::<u64>() {
            Ok(n) => Some(n),
            Err(_) => return Lifetime::from_name(s.trim()).unwrap_or(Lifetime::Others),
        },
        _ => None,
    };
    match numeric {
        Some(0) => Lifetime::Transient,
        Some(1) => Lifetime::Scoped,
        Some(2) => Lifetime::Singleton,
        _ => Lifetime::Others,
    }
}

/// Site kind for a foreign `Type`: `0` constructor, `1` method, `2` field,
/// or the kind's name. Anything else is treated as a constructor.
pub fn external_injection_kind(code: Option<&Value>) -> InjectionKind {
    match code {
        Some(Value::Number(n)) => match n.as_u64() {
            Some(1) => InjectionKind::Method,
            Some(2) => InjectionKind::Field,
            _ => InjectionKind::Constructor,
        },
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "method" => InjectionKind::Method,
            "2" | "field" | "property" => InjectionKind::Field,
            _ => InjectionKind::Constructor,
        },
        _ => InjectionKind::Constructor,
    }
}

/// What a foreign `IssueType` becomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IssueMapping {
    Conflict(ConflictKind),
    Cycle,
}

fn issue_mapping(issue_type: Option<&Value>) -> Option<IssueMapping> {
    let name = issue_type?.as_str()?;
    let mapping = match name {
        "MissingRegistration" | "UnregisteredInjection" => {
            IssueMapping::Conflict(ConflictKind::UnregisteredInjection)
        }
        "UnusedService" => IssueMapping::Conflict(ConflictKind::UnusedService),
        "MultipleImplementations" => IssueMapping::Conflict(ConflictKind::MultipleImplementations),
        "DuplicateImplementation" | "DuplicateRegistration" => {
            IssueMapping::Conflict(ConflictKind::DuplicateImplementation)
        }
        "CircularDependency" => IssueMapping::Cycle,
        _ => return None,
    };
    Some(mapping)
}

fn convert_registration(
    registration: &ExternalRegistration,
    ids: &mut RegistrationIds,
) -> (Registration, Vec<InjectionSite>) {
    let file_path = PathBuf::from(&registration.file_path);
    let converted = Registration {
        id: ids.next(&file_path, registration.line_number),
        lifetime: external_lifetime(registration.lifetime.as_ref()),
        service_type: registration.service_type.clone(),
        implementation_type: registration.implementation_type.clone(),
        file_path,
        line_number: registration.line_number,
        method_call: registration.registration_method.clone(),
    };

    let sites = registration
        .injection_sites
        .iter()
        .map(|site| InjectionSite {
            file_path: PathBuf::from(&site.file_path),
            line_number: site.line_number,
            class_name: if site.class_name.is_empty() {
                UNKNOWN_CLASS.to_string()
            } else {
                site.class_name.clone()
            },
            member_name: site.member_name.clone(),
            kind: external_injection_kind(site.kind.as_ref()),
            service_type: site
                .service_type
                .clone()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| registration.service_type.clone()),
            linked_registration_ids: Vec::new(),
        })
        .collect();

    (converted, sites)
}

/// Sites reported once per registration of a service collapse to one.
fn dedup_sites(sites: Vec<InjectionSite>) -> Vec<InjectionSite> {
    let mut seen = HashSet::new();
    sites
        .into_iter()
        .filter(|s| {
            seen.insert((
                s.file_path.clone(),
                s.line_number,
                s.class_name.clone(),
                s.member_name.clone(),
                s.service_type.clone(),
            ))
        })
        .collect()
}

fn project_name(project: &ExternalProject, solution_name: Option<&str>) -> String {
    if !project.project_name.is_empty() {
        return project.project_name.clone();
    }
    if let Some(name) = solution_name.filter(|n| !n.is_empty()) {
        return name.to_string();
    }
    Path::new(&project.project_path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Map one foreign project onto a [`ProjectDI`].
pub fn convert_project(project: &ExternalProject, solution_name: Option<&str>) -> ProjectDI {
    let mut ids = RegistrationIds::new();
    let mut registrations = Vec::new();
    let mut sites = Vec::new();

    for external in project
        .service_registrations
        .iter()
        .filter(|r| !r.service_type.is_empty())
    {
        let (registration, registration_sites) = convert_registration(external, &mut ids);
        registrations.push(registration);
        sites.extend(registration_sites);
    }

    let mut sites = dedup_sites(sites);
    link_injection_sites(&registrations, &mut sites);
    let mut services = aggregate_services(&registrations, &sites);

    for conflict in &project.lifetime_conflicts {
        let details = if conflict.description.is_empty() {
            format!("{} is registered with conflicting lifetimes", conflict.service_type)
        } else {
            conflict.description.clone()
        };
        services
            .entry(conflict.service_type.clone())
            .or_insert_with(|| Service::new(conflict.service_type.clone()))
            .add_conflict(ConflictKind::MixedLifetimes, details);
    }

    let dependency_graph = DependencyGraph::from_injection_sites(&sites);
    let mut cycles = dependency_graph.detect_cycles();

    for issue in &project.service_dependency_issues {
        let Some(mapping) = issue_mapping(issue.issue_type.as_ref()) else {
            debug!(
                issue_type = ?issue.issue_type,
                service = %issue.service_type,
                "skipping unknown dependency issue type"
            );
            continue;
        };
        match mapping {
            IssueMapping::Cycle => {
                let cycle = if issue.description.is_empty() {
                    issue.service_type.clone()
                } else {
                    issue.description.clone()
                };
                if !cycles.contains(&cycle) {
                    cycles.push(cycle);
                }
            }
            IssueMapping::Conflict(kind) => {
                let details = if issue.description.is_empty() {
                    format!("{kind} reported for {}", issue.service_type)
                } else {
                    issue.description.clone()
                };
                services
                    .entry(issue.service_type.clone())
                    .or_insert_with(|| Service::new(issue.service_type.clone()))
                    .add_conflict(kind, details);
            }
        }
    }

    let service_groups = group_by_lifetime(&services);
    let parse_status = resolve_status(false, !service_groups.is_empty(), false);
    let error_details = service_groups
        .is_empty()
        .then(|| vec!["external result contains no service registrations".to_string()]);

    ProjectDI {
        project_path: PathBuf::from(&project.project_path),
        project_name: project_name(project, solution_name),
        service_groups,
        dependency_graph,
        cycles,
        parse_status,
        error_details,
        unregistered_services: unregistered_services(&services),
    }
}

/// Parse a foreign analyzer result and map every project it contains.
///
/// Malformed JSON is the only error; missing fields never are.
pub fn import_external(json: &str) -> Result<Vec<ProjectDI>, Error> {
    let _phase = set_phase(AnalysisPhase::ExternalImport);
    let result: ExternalResult = serde_json::from_str(json).map_err(Error::ExternalResult)?;
    info!(projects = result.projects.len(), "importing external analyzer result");

    let solution_name = result.solution_name.as_deref();
    Ok(result
        .projects
        .iter()
        .map(|project| convert_project(project, solution_name))
        .collect())
}
