use crate::core::{InjectionSite, Registration};
use crate::patterns::FACTORY_IMPLEMENTATION;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Adjacency of class names to the distinct service types they inject.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependencyGraph {
    adjacency: BTreeMap<String, Vec<String>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph from injection sites. Sites without a known class
    /// are left out so they never join a cycle through the sentinel node.
    pub fn from_injection_sites<'a>(sites: impl IntoIterator<Item = &'a InjectionSite>) -> Self {
        sites
            .into_iter()
            .filter(|site| site.has_known_class())
            .fold(Self::new(), |mut graph, site| {
                graph.add_dependency(site.class_name.clone(), site.service_type.clone());
                graph
            })
    }

    /// Add an edge; repeated edges are ignored.
    pub fn add_dependency(&mut self, from: String, to: String) {
        let deps = self.adjacency.entry(from).or_default();
        if !deps.contains(&to) {
            deps.push(to);
        }
    }

    /// A copy of this graph that also routes every registered service type
    /// to its implementation, so `A -> IB -> B -> IA -> A` is found.
    pub fn with_registration_edges(&self, registrations: &[Registration]) -> Self {
        registrations
            .iter()
            .filter(|r| {
                r.implementation_type != FACTORY_IMPLEMENTATION
                    && r.implementation_type != r.service_type
            })
            .fold(self.clone(), |mut graph, r| {
                graph.add_dependency(r.service_type.clone(), r.implementation_type.clone());
                graph
            })
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    pub fn dependencies(&self, class_name: &str) -> &[String] {
        self.adjacency
            .get(class_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.adjacency.iter()
    }

    /// Detect cycles with a depth-first search from every node.
    ///
    /// `visited` persists across start nodes, so each back edge is reported
    /// once. Cycles are rendered as `A -> B -> A`.
    pub fn detect_cycles(&self) -> Vec<String> {
        let mut visited = HashSet::new();
        let mut rec_stack = HashSet::new();
        let mut path = Vec::new();
        let mut cycles = Vec::new();

        for node in self.adjacency.keys() {
            if !visited.contains(node.as_str()) {
                self.dfs_detect_cycles(node, &mut visited, &mut rec_stack, &mut path, &mut cycles);
            }
        }

        cycles
    }

    fn dfs_detect_cycles<'a>(
        &'a self,
        node: &'a str,
        visited: &mut HashSet<&'a str>,
        rec_stack: &mut HashSet<&'a str>,
        path: &mut Vec<&'a str>,
        cycles: &mut Vec<String>,
    ) {
        visited.insert(node);
        rec_stack.insert(node);
        path.push(node);

        for dep in self.dependencies(node) {
            if !visited.contains(dep.as_str()) {
                self.dfs_detect_cycles(dep, visited, rec_stack, path, cycles);
            } else if rec_stack.contains(dep.as_str()) {
                if let Some(start) = path.iter().position(|n| *n == dep.as_str()) {
                    let mut members = path[start..].to_vec();
                    members.push(dep.as_str());
                    cycles.push(members.join(" -> "));
                }
            }
        }

        path.pop();
        rec_stack.remove(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{InjectionKind, Lifetime, UNKNOWN_CLASS};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn site(class_name: &str, service: &str) -> InjectionSite {
        InjectionSite {
            file_path: PathBuf::from("A.cs"),
            line_number: 1,
            class_name: class_name.to_string(),
            member_name: "constructor".to_string(),
            kind: InjectionKind::Constructor,
            service_type: service.to_string(),
            linked_registration_ids: Vec::new(),
        }
    }

    fn registration(service: &str, implementation: &str) -> Registration {
        Registration {
            id: format!("Program.cs-{service}"),
            lifetime: Lifetime::Scoped,
            service_type: service.to_string(),
            implementation_type: implementation.to_string(),
            file_path: PathBuf::from("Program.cs"),
            line_number: 1,
            method_call: String::new(),
        }
    }

    #[test]
    fn test_two_node_cycle() {
        let graph = DependencyGraph::from_injection_sites(&[site("A", "B"), site("B", "A")]);
        let cycles = graph.detect_cycles();
        assert_eq!(cycles, vec!["A -> B -> A".to_string()]);
    }

    #[test]
    fn test_acyclic_graph() {
        let graph = DependencyGraph::from_injection_sites(&[
            site("A", "B"),
            site("B", "C"),
            site("A", "C"),
        ]);
        assert!(graph.detect_cycles().is_empty());
    }

    #[test]
    fn test_self_injection_is_a_cycle() {
        let graph = DependencyGraph::from_injection_sites(&[site("A", "A")]);
        assert_eq!(graph.detect_cycles(), vec!["A -> A".to_string()]);
    }

    #[test]
    fn test_unknown_class_sites_are_not_edges() {
        let graph = DependencyGraph::from_injection_sites(&[
            site(UNKNOWN_CLASS, "IClock"),
            site("IClock", UNKNOWN_CLASS),
        ]);
        assert_eq!(graph.node_count(), 1);
        assert!(graph.detect_cycles().is_empty());
    }

    #[test]
    fn test_duplicate_edges_collapse() {
        let graph = DependencyGraph::from_injection_sites(&[
            site("A", "IClock"),
            site("A", "IClock"),
            site("A", "ICache"),
        ]);
        assert_eq!(graph.dependencies("A"), &["IClock", "ICache"]);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_cycle_through_registrations() {
        let graph = DependencyGraph::from_injection_sites(&[site("A", "IB"), site("B", "IA")]);
        assert!(graph.detect_cycles().is_empty());

        let resolved = graph.with_registration_edges(&[
            registration("IA", "A"),
            registration("IB", "B"),
            registration("IC", "Factory"),
        ]);
        assert_eq!(
            resolved.detect_cycles(),
            vec!["A -> IB -> B -> IA -> A".to_string()]
        );
        // the reported graph keeps only injection edges
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let graph = DependencyGraph::from_injection_sites(&[site("A", "IClock")]);
        let json = serde_json::to_string(&graph).unwrap();
        assert_eq!(json, r#"{"A":["IClock"]}"#);
    }
}
