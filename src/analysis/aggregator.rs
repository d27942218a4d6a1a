//! Service aggregation and lifetime grouping.

use crate::core::{InjectionSite, Lifetime, Registration, Service, ServiceGroup};
use std::collections::BTreeMap;

/// Services keyed by service type, in ordinal name order.
pub type ServiceIndex = BTreeMap<String, Service>;

/// Merge registrations and sites into one [`Service`] per service type.
///
/// Services that are only injected are included; they never land in a
/// [`ServiceGroup`] but still carry conflicts.
pub fn aggregate_services(
    registrations: &[Registration],
    sites: &[InjectionSite],
) -> ServiceIndex {
    let mut services = ServiceIndex::new();

    for registration in registrations {
        services
            .entry(registration.service_type.clone())
            .or_insert_with(|| Service::new(registration.service_type.clone()))
            .registrations
            .push(registration.clone());
    }

    for site in sites {
        services
            .entry(site.service_type.clone())
            .or_insert_with(|| Service::new(site.service_type.clone()))
            .injection_sites
            .push(site.clone());
    }

    services
}

/// One group per lifetime in [`Lifetime::GROUP_ORDER`], holding every
/// service with a registration at that lifetime. Empty groups are omitted.
pub fn group_by_lifetime(services: &ServiceIndex) -> Vec<ServiceGroup> {
    Lifetime::GROUP_ORDER
        .iter()
        .filter_map(|&lifetime| {
            let members: Vec<Service> = services
                .values()
                .filter(|s| s.has_lifetime(lifetime))
                .cloned()
                .collect();
            (!members.is_empty()).then(|| ServiceGroup::new(lifetime, members))
        })
        .collect()
}

/// Services injected somewhere but never registered.
pub fn unregistered_services(services: &ServiceIndex) -> Vec<Service> {
    services
        .values()
        .filter(|s| s.registrations.is_empty())
        .cloned()
        .collect()
}
