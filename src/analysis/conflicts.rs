//! Rule-based conflict detection.
//!
//! Every rule is evaluated independently for every service, and all that
//! apply are recorded.

use super::aggregator::ServiceIndex;
use crate::core::{ConflictKind, Lifetime, Registration, Service};
use std::collections::BTreeMap;

type Rule = fn(&Service) -> Vec<(ConflictKind, String)>;

const RULES: &[Rule] = &[
    mixed_lifetimes,
    duplicate_implementation,
    multiple_implementations,
    unregistered_injection,
    unused_service,
];

fn mixed_lifetimes(service: &Service) -> Vec<(ConflictKind, String)> {
    let lifetimes = service.lifetimes();
    if lifetimes.len() <= 1 {
        return Vec::new();
    }
    let names: Vec<&str> = lifetimes.iter().map(Lifetime::name).collect();
    vec![(
        ConflictKind::MixedLifetimes,
        format!("Registered with multiple lifetimes: {}", names.join(", ")),
    )]
}

/// Registrations grouped by lifetime, then by implementation type.
fn by_lifetime_and_implementation(
    service: &Service,
) -> BTreeMap<Lifetime, BTreeMap<&str, Vec<&Registration>>> {
    let mut grouped: BTreeMap<Lifetime, BTreeMap<&str, Vec<&Registration>>> = BTreeMap::new();
    for registration in &service.registrations {
        grouped
            .entry(registration.lifetime)
            .or_default()
            .entry(registration.implementation_type.as_str())
            .or_default()
            .push(registration);
    }
    grouped
}

fn duplicate_implementation(service: &Service) -> Vec<(ConflictKind, String)> {
    by_lifetime_and_implementation(service)
        .into_iter()
        .flat_map(|(lifetime, implementations)| {
            implementations
                .into_iter()
                .filter(|(_, regs)| regs.len() > 1)
                .map(move |(implementation, regs)| {
                    let locations: Vec<String> = regs.iter().map(|r| r.location()).collect();
                    (
                        ConflictKind::DuplicateImplementation,
                        format!(
                            "{implementation} registered {} times as {lifetime}: {}",
                            regs.len(),
                            locations.join(", ")
                        ),
                    )
                })
        })
        .collect()
}

fn multiple_implementations(service: &Service) -> Vec<(ConflictKind, String)> {
    by_lifetime_and_implementation(service)
        .into_iter()
        .filter(|(_, implementations)| implementations.len() > 1)
        .map(|(lifetime, implementations)| {
            let names: Vec<&str> = implementations.keys().copied().collect();
            (
                ConflictKind::MultipleImplementations,
                format!(
                    "Multiple {lifetime} implementations: {}",
                    names.join(", ")
                ),
            )
        })
        .collect()
}

fn unregistered_injection(service: &Service) -> Vec<(ConflictKind, String)> {
    if service.injection_sites.is_empty() || !service.registrations.is_empty() {
        return Vec::new();
    }
    vec![(
        ConflictKind::UnregisteredInjection,
        format!(
            "{} is injected at {} site(s) but never registered",
            service.name,
            service.injection_sites.len()
        ),
    )]
}

fn unused_service(service: &Service) -> Vec<(ConflictKind, String)> {
    if service.registrations.is_empty() || !service.injection_sites.is_empty() {
        return Vec::new();
    }
    vec![(
        ConflictKind::UnusedService,
        format!("{} is registered but never injected", service.name),
    )]
}

/// Apply every rule to `service`, appending the conflicts found.
pub fn detect_service_conflicts(service: &mut Service) {
    let found: Vec<_> = RULES.iter().flat_map(|rule| rule(service)).collect();
    for (kind, details) in found {
        service.add_conflict(kind, details);
    }
}

/// Apply every rule to every service.
pub fn detect_conflicts(services: &mut ServiceIndex) {
    services.values_mut().for_each(detect_service_conflicts);
}
