//! Cable-filtered adjacency views.
//!
//! A [`FilteredAdjacency`] is the per-call view of a [`TaggedGraph`] under a
//! cable class's permitted subsystems: an edge survives only if its own tag
//! and both endpoint tags are permitted. The view is built once per
//! top-level routing call and discarded afterwards.

use cable_types::{CanonicalPoint, Subsystem};
use std::collections::HashMap;

use crate::graph::TaggedGraph;

/// One surviving neighbour entry: the neighbour point and the edge weight.
pub type Neighbour = (CanonicalPoint, f64);

/// Access-restricted adjacency derived from a tagged graph.
///
/// Symmetric by construction: `(v, w)` appears under `u` exactly when
/// `(u, w)` appears under `v`. Lookups on keys with no surviving incident
/// edge return an empty slice.
///
/// # Example
///
/// ```
/// use cable_graph::{FilteredAdjacency, TaggedGraph};
/// use cable_types::CableClass;
///
/// let graph = TaggedGraph::from_value(serde_json::json!({
///     "nodes": {
///         "(0.000, 0.000, 0.000)": { "sys": "A" },
///         "(1.000, 0.000, 0.000)": { "sys": "B" },
///     },
///     "edges": [
///         { "from": "(0.000, 0.000, 0.000)",
///           "to": "(1.000, 0.000, 0.000)", "sys": "A" },
///     ]
/// })).unwrap();
///
/// // Cable A cannot use the edge: one endpoint is in system B.
/// let adj = FilteredAdjacency::build(&graph, CableClass::A.permitted());
/// assert!(adj.neighbours("(0.000, 0.000, 0.000)").is_empty());
///
/// // Cable C can.
/// let adj = FilteredAdjacency::build(&graph, CableClass::C.permitted());
/// assert_eq!(adj.neighbours("(0.000, 0.000, 0.000)").len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct FilteredAdjacency {
    adj: HashMap<String, Vec<Neighbour>>,
    edge_count: usize,
}

impl FilteredAdjacency {
    /// Derives the restricted view of `graph` under `permitted`.
    ///
    /// Edges are visited in file order, so neighbour lists are
    /// deterministic for a given graph file.
    #[must_use]
    pub fn build(graph: &TaggedGraph, permitted: &[Subsystem]) -> Self {
        let mut adj: HashMap<String, Vec<Neighbour>> = HashMap::new();
        let mut edge_count = 0;
        for edge in graph.edges() {
            if !permitted.contains(&edge.tag) {
                continue;
            }
            let endpoints_permitted = [&edge.from, &edge.to].into_iter().all(|endpoint| {
                graph
                    .vertex_tag(endpoint.key())
                    .is_some_and(|tag| permitted.contains(&tag))
            });
            if !endpoints_permitted {
                continue;
            }
            adj.entry(edge.from.key().to_owned())
                .or_default()
                .push((edge.to.clone(), edge.weight));
            adj.entry(edge.to.key().to_owned())
                .or_default()
                .push((edge.from.clone(), edge.weight));
            edge_count += 1;
        }
        tracing::debug!(
            reachable = adj.len(),
            edges = edge_count,
            "built filtered adjacency"
        );
        Self { adj, edge_count }
    }

    /// Surviving neighbours of a key. Empty for unknown or isolated keys.
    #[must_use]
    pub fn neighbours(&self, key: &str) -> &[Neighbour] {
        self.adj.get(key).map_or(&[], Vec::as_slice)
    }

    /// Number of keys with at least one surviving incident edge.
    #[must_use]
    pub fn reachable_count(&self) -> usize {
        self.adj.len()
    }

    /// Number of surviving undirected edges.
    #[must_use]
    pub const fn edge_count(&self) -> usize {
        self.edge_count
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use cable_types::CableClass;

    /// 0A - 1A - 2A - 3B, plus a B-B spur 3B - 4B.
    fn mixed_graph() -> TaggedGraph {
        TaggedGraph::from_value(serde_json::json!({
            "nodes": {
                "(0.000, 0.000, 0.000)": { "sys": "A" },
                "(1.000, 0.000, 0.000)": { "sys": "A" },
                "(2.000, 0.000, 0.000)": { "sys": "A" },
                "(3.000, 0.000, 0.000)": { "sys": "B" },
                "(4.000, 0.000, 0.000)": { "sys": "B" },
            },
            "edges": [
                { "from": "(0.000, 0.000, 0.000)", "to": "(1.000, 0.000, 0.000)", "sys": "A" },
                { "from": "(1.000, 0.000, 0.000)", "to": "(2.000, 0.000, 0.000)", "sys": "A" },
                { "from": "(2.000, 0.000, 0.000)", "to": "(3.000, 0.000, 0.000)", "sys": "B" },
                { "from": "(3.000, 0.000, 0.000)", "to": "(4.000, 0.000, 0.000)", "sys": "B" },
            ]
        }))
        .unwrap()
    }

    fn edge_set(adj: &FilteredAdjacency, graph: &TaggedGraph) -> Vec<(String, String)> {
        let mut edges = Vec::new();
        for edge in graph.edges() {
            let u = edge.from.key();
            let v = edge.to.key();
            if adj.neighbours(u).iter().any(|(n, _)| n.key() == v) {
                edges.push((u.to_owned(), v.to_owned()));
            }
        }
        edges
    }

    #[test]
    fn drops_edges_by_tag_and_endpoint() {
        let graph = mixed_graph();

        // Cable A: only the two pure-A edges survive. The B-tagged edge
        // from (2,0,0) to (3,0,0) is dropped by tag, and even an A-tagged
        // edge into B territory would be dropped by endpoint.
        let adj_a = FilteredAdjacency::build(&graph, CableClass::A.permitted());
        assert_eq!(adj_a.edge_count(), 2);
        assert!(adj_a.neighbours("(3.000, 0.000, 0.000)").is_empty());

        let adj_b = FilteredAdjacency::build(&graph, CableClass::B.permitted());
        assert_eq!(adj_b.edge_count(), 1);

        let adj_c = FilteredAdjacency::build(&graph, CableClass::C.permitted());
        assert_eq!(adj_c.edge_count(), 4);
    }

    #[test]
    fn symmetry() {
        let graph = mixed_graph();
        for cable in CableClass::ALL {
            let adj = FilteredAdjacency::build(&graph, cable.permitted());
            for edge in graph.edges() {
                let u = edge.from.key();
                let v = edge.to.key();
                let forward = adj
                    .neighbours(u)
                    .iter()
                    .find(|(n, _)| n.key() == v)
                    .map(|(_, w)| *w);
                let backward = adj
                    .neighbours(v)
                    .iter()
                    .find(|(n, _)| n.key() == u)
                    .map(|(_, w)| *w);
                assert_eq!(forward, backward);
            }
        }
    }

    #[test]
    fn cable_monotonicity() {
        let graph = mixed_graph();
        let adj_a = FilteredAdjacency::build(&graph, CableClass::A.permitted());
        let adj_b = FilteredAdjacency::build(&graph, CableClass::B.permitted());
        let adj_c = FilteredAdjacency::build(&graph, CableClass::C.permitted());

        let edges_a = edge_set(&adj_a, &graph);
        let edges_b = edge_set(&adj_b, &graph);
        let edges_c = edge_set(&adj_c, &graph);

        for edge in &edges_a {
            assert!(edges_c.contains(edge), "adj_A not within adj_C");
            assert!(!edges_b.contains(edge), "adj_A overlaps adj_B");
        }
        for edge in &edges_b {
            assert!(edges_c.contains(edge), "adj_B not within adj_C");
        }
    }

    #[test]
    fn unknown_keys_have_no_neighbours() {
        let graph = mixed_graph();
        let adj = FilteredAdjacency::build(&graph, CableClass::C.permitted());
        assert!(adj.neighbours("(9.000, 9.000, 9.000)").is_empty());
    }

    #[test]
    fn cross_system_edge_needs_both_endpoints_permitted() {
        let graph = mixed_graph();
        // The (2,0,0)-(3,0,0) edge is tagged B; under cable B its A-side
        // endpoint is not permitted, so it must not survive.
        let adj_b = FilteredAdjacency::build(&graph, CableClass::B.permitted());
        assert!(adj_b.neighbours("(2.000, 0.000, 0.000)").is_empty());
        let spur: Vec<_> = adj_b
            .neighbours("(3.000, 0.000, 0.000)")
            .iter()
            .map(|(n, _)| n.key().to_owned())
            .collect();
        assert_eq!(spur, vec!["(4.000, 0.000, 0.000)".to_owned()]);
    }
}
