//! Whole-project passes that run once over the merged extraction results:
//! linking, aggregation, conflict detection and cycle detection.

pub mod aggregator;
pub mod conflicts;
pub mod graph;
pub mod linker;
pub mod status;

pub use aggregator::{aggregate_services, group_by_lifetime, unregistered_services, ServiceIndex};
pub use conflicts::{detect_conflicts, detect_service_conflicts};
pub use graph::DependencyGraph;
pub use linker::link_injection_sites;
pub use status::{resolve_status, AnalysisRun};

use crate::core::{InjectionSite, Registration, Service, ServiceGroup};
use crate::observability::{set_phase, AnalysisPhase};
use tracing::debug;

/// Everything derived from the merged registrations and sites.
#[derive(Debug, Clone)]
pub struct AnalysisModel {
    pub service_groups: Vec<ServiceGroup>,
    pub unregistered_services: Vec<Service>,
    pub dependency_graph: DependencyGraph,
    pub cycles: Vec<String>,
}

/// Run linking, aggregation, conflict detection and cycle detection.
///
/// With `follow_registrations`, cycles are also searched through
/// service-to-implementation edges; the returned graph holds only
/// injection edges either way.
pub fn build_model(
    registrations: &[Registration],
    mut sites: Vec<InjectionSite>,
    follow_registrations: bool,
) -> AnalysisModel {
    {
        let _phase = set_phase(AnalysisPhase::Linking);
        link_injection_sites(registrations, &mut sites);
    }

    let mut services = {
        let _phase = set_phase(AnalysisPhase::Aggregation);
        aggregate_services(registrations, &sites)
    };

    {
        let _phase = set_phase(AnalysisPhase::ConflictDetection);
        detect_conflicts(&mut services);
    }

    let (dependency_graph, cycles) = {
        let _phase = set_phase(AnalysisPhase::CycleDetection);
        let graph = DependencyGraph::from_injection_sites(&sites);
        let cycles = if follow_registrations {
            graph.with_registration_edges(registrations).detect_cycles()
        } else {
            graph.detect_cycles()
        };
        (graph, cycles)
    };

    debug!(
        services = services.len(),
        nodes = dependency_graph.node_count(),
        cycles = cycles.len(),
        "built service model"
    );

    AnalysisModel {
        service_groups: group_by_lifetime(&services),
        unregistered_services: unregistered_services(&services),
        dependency_graph,
        cycles,
    }
}
