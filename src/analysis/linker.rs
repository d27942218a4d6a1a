use crate::core::{InjectionSite, Registration};
use std::collections::HashMap;

/// Populate `linked_registration_ids` of every site with the ids of the
/// registrations whose service type equals the site's, exactly.
pub fn link_injection_sites(registrations: &[Registration], sites: &mut [InjectionSite]) {
    let mut by_service: HashMap<&str, Vec<&str>> = HashMap::new();
    for registration in registrations {
        by_service
            .entry(registration.service_type.as_str())
            .or_default()
            .push(registration.id.as_str());
    }

    for site in sites.iter_mut() {
        site.linked_registration_ids = by_service
            .get(site.service_type.as_str())
            .map(|ids| ids.iter().map(|id| id.to_string()).collect())
            .unwrap_or_default();
    }
}
