//! The immutable tagged graph store.
//!
//! [`TaggedGraph`] holds the vertex tag table and the undirected edge list
//! of one graph file, answers key-presence and tag queries in O(1), and is
//! read-only after construction. Edge weights are Euclidean distances
//! computed once, from the canonical numeric coordinates.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use cable_types::{CanonicalPoint, RouteError, Subsystem};

use crate::document::GraphDocument;
use crate::tramo::edge_key;

/// A vertex with its subsystem tag.
#[derive(Debug, Clone)]
pub struct VertexRecord {
    /// The canonical point backing the vertex.
    pub point: CanonicalPoint,
    /// Subsystem the vertex belongs to.
    pub tag: Subsystem,
}

/// An undirected tagged edge with precomputed weight.
#[derive(Debug, Clone)]
pub struct GraphEdge {
    /// One endpoint.
    pub from: CanonicalPoint,
    /// The other endpoint.
    pub to: CanonicalPoint,
    /// Subsystem the edge belongs to.
    pub tag: Subsystem,
    /// Euclidean distance between the endpoints.
    pub weight: f64,
}

/// In-memory tagged graph: vertex table, edge list, incidence index.
///
/// Construction validates the document of [`crate::document`]; every
/// violation is a [`RouteError::GraphMalformed`] naming the offending
/// element. The store is immutable afterwards.
///
/// # Example
///
/// ```
/// use cable_graph::TaggedGraph;
/// use cable_types::Subsystem;
///
/// let graph = TaggedGraph::from_value(serde_json::json!({
///     "nodes": {
///         "(0.000, 0.000, 0.000)": { "sys": "A" },
///         "(1.000, 0.000, 0.000)": { "sys": "A" },
///     },
///     "edges": [
///         { "from": "(0.000, 0.000, 0.000)",
///           "to": "(1.000, 0.000, 0.000)", "sys": "A" },
///     ]
/// })).unwrap();
///
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.vertex_tag("(0.000, 0.000, 0.000)"), Some(Subsystem::A));
/// ```
#[derive(Debug, Clone)]
pub struct TaggedGraph {
    vertices: HashMap<String, VertexRecord>,
    edges: Vec<GraphEdge>,
    incidence: HashMap<String, Vec<usize>>,
}

impl TaggedGraph {
    /// Builds a store from a parsed document.
    ///
    /// # Errors
    ///
    /// [`RouteError::GraphMalformed`] on: a vertex key not in canonical
    /// form, an edge endpoint absent from the vertex table, a self-loop, a
    /// duplicate unordered edge, or an edge whose tag matches neither
    /// endpoint's tag.
    pub fn from_document(document: GraphDocument) -> Result<Self, RouteError> {
        let mut vertices = HashMap::with_capacity(document.nodes.len());
        for (key, spec) in document.nodes {
            let point = CanonicalPoint::parse(&key)
                .map_err(|e| RouteError::GraphMalformed(format!("node key {key:?}: {e}")))?;
            vertices.insert(key, VertexRecord {
                point,
                tag: spec.sys,
            });
        }

        let mut edges = Vec::with_capacity(document.edges.len());
        let mut incidence: HashMap<String, Vec<usize>> = HashMap::new();
        let mut seen = HashSet::with_capacity(document.edges.len());
        for spec in document.edges {
            let from = vertices
                .get(&spec.from)
                .ok_or_else(|| {
                    RouteError::GraphMalformed(format!("edge endpoint {:?} is not a node", spec.from))
                })?
                .clone();
            let to = vertices
                .get(&spec.to)
                .ok_or_else(|| {
                    RouteError::GraphMalformed(format!("edge endpoint {:?} is not a node", spec.to))
                })?
                .clone();
            if spec.from == spec.to {
                return Err(RouteError::GraphMalformed(format!(
                    "self-loop at {:?}",
                    spec.from
                )));
            }
            if spec.sys != from.tag && spec.sys != to.tag {
                return Err(RouteError::GraphMalformed(format!(
                    "edge {:?} -> {:?} tagged {} but endpoints are {} and {}",
                    spec.from, spec.to, spec.sys, from.tag, to.tag
                )));
            }
            if !seen.insert(edge_key(&spec.from, &spec.to)) {
                return Err(RouteError::GraphMalformed(format!(
                    "duplicate edge {:?} -> {:?}",
                    spec.from, spec.to
                )));
            }

            let index = edges.len();
            incidence.entry(spec.from.clone()).or_default().push(index);
            incidence.entry(spec.to.clone()).or_default().push(index);
            let weight = from.point.distance(&to.point);
            edges.push(GraphEdge {
                from: from.point,
                to: to.point,
                tag: spec.sys,
                weight,
            });
        }

        tracing::debug!(
            nodes = vertices.len(),
            edges = edges.len(),
            "loaded tagged graph"
        );
        Ok(Self {
            vertices,
            edges,
            incidence,
        })
    }

    /// Builds a store from an in-memory JSON value.
    ///
    /// # Errors
    ///
    /// [`RouteError::GraphMalformed`] on structural or semantic violations.
    pub fn from_value(value: serde_json::Value) -> Result<Self, RouteError> {
        let document: GraphDocument = serde_json::from_value(value)
            .map_err(|e| RouteError::GraphMalformed(e.to_string()))?;
        Self::from_document(document)
    }

    /// Parses and validates a JSON string.
    ///
    /// # Errors
    ///
    /// [`RouteError::GraphMalformed`] on structural or semantic violations.
    pub fn from_json_str(text: &str) -> Result<Self, RouteError> {
        let document: GraphDocument =
            serde_json::from_str(text).map_err(|e| RouteError::GraphMalformed(e.to_string()))?;
        Self::from_document(document)
    }

    /// Loads and validates a tagged graph file.
    ///
    /// # Errors
    ///
    /// [`RouteError::Io`] if the file cannot be read,
    /// [`RouteError::GraphMalformed`] on structural or semantic violations.
    pub fn from_file(path: &Path) -> Result<Self, RouteError> {
        let text = fs::read_to_string(path).map_err(|source| RouteError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Whether the key names a vertex of this graph.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.vertices.contains_key(key)
    }

    /// Subsystem tag of a vertex, or `None` for an unknown key.
    #[must_use]
    pub fn vertex_tag(&self, key: &str) -> Option<Subsystem> {
        self.vertices.get(key).map(|v| v.tag)
    }

    /// The canonical point backing a vertex key.
    #[must_use]
    pub fn point(&self, key: &str) -> Option<&CanonicalPoint> {
        self.vertices.get(key).map(|v| &v.point)
    }

    /// All edges incident to a vertex, unfiltered, in file order.
    ///
    /// Yields `(neighbour, edge_tag, weight)`. Unknown keys yield nothing.
    pub fn neighbours_raw<'a>(
        &'a self,
        key: &'a str,
    ) -> impl Iterator<Item = (&'a CanonicalPoint, Subsystem, f64)> + 'a {
        self.incidence
            .get(key)
            .into_iter()
            .flatten()
            .map(move |&index| {
                let edge = &self.edges[index];
                let neighbour = if edge.from.key() == key {
                    &edge.to
                } else {
                    &edge.from
                };
                (neighbour, edge.tag, edge.weight)
            })
    }

    /// Tag of the edge between two keys, or `None` if no such edge exists.
    #[must_use]
    pub fn edge_tag(&self, u: &str, v: &str) -> Option<Subsystem> {
        self.neighbours_raw(u)
            .find(|(neighbour, _, _)| neighbour.key() == v)
            .map(|(_, tag, _)| tag)
    }

    /// Number of vertices.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of undirected edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// The edge list in file order.
    #[must_use]
    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn line_graph() -> TaggedGraph {
        TaggedGraph::from_value(serde_json::json!({
            "nodes": {
                "(0.000, 0.000, 0.000)": { "sys": "A" },
                "(1.000, 0.000, 0.000)": { "sys": "A" },
                "(2.000, 0.000, 0.000)": { "sys": "B" },
            },
            "edges": [
                { "from": "(0.000, 0.000, 0.000)", "to": "(1.000, 0.000, 0.000)", "sys": "A" },
                { "from": "(1.000, 0.000, 0.000)", "to": "(2.000, 0.000, 0.000)", "sys": "B" },
            ]
        }))
        .unwrap()
    }

    #[test]
    fn loads_and_indexes() {
        let graph = line_graph();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.contains("(1.000, 0.000, 0.000)"));
        assert!(!graph.contains("(9.000, 0.000, 0.000)"));
        assert_eq!(
            graph.vertex_tag("(2.000, 0.000, 0.000)"),
            Some(Subsystem::B)
        );
        assert_eq!(graph.vertex_tag("(9.000, 0.000, 0.000)"), None);
    }

    #[test]
    fn weights_are_euclidean() {
        let graph = line_graph();
        for edge in graph.edges() {
            assert_relative_eq!(edge.weight, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn neighbours_raw_is_unfiltered_and_symmetric() {
        let graph = line_graph();
        let mid: Vec<_> = graph.neighbours_raw("(1.000, 0.000, 0.000)").collect();
        assert_eq!(mid.len(), 2);
        let tags: Vec<_> = mid.iter().map(|(_, tag, _)| *tag).collect();
        assert_eq!(tags, vec![Subsystem::A, Subsystem::B]);

        let end: Vec<_> = graph.neighbours_raw("(2.000, 0.000, 0.000)").collect();
        assert_eq!(end.len(), 1);
        assert_eq!(end[0].0.key(), "(1.000, 0.000, 0.000)");
    }

    #[test]
    fn edge_tag_lookup() {
        let graph = line_graph();
        assert_eq!(
            graph.edge_tag("(0.000, 0.000, 0.000)", "(1.000, 0.000, 0.000)"),
            Some(Subsystem::A)
        );
        assert_eq!(
            graph.edge_tag("(2.000, 0.000, 0.000)", "(1.000, 0.000, 0.000)"),
            Some(Subsystem::B)
        );
        assert_eq!(
            graph.edge_tag("(0.000, 0.000, 0.000)", "(2.000, 0.000, 0.000)"),
            None
        );
    }

    #[test]
    fn rejects_bad_node_key() {
        let result = TaggedGraph::from_value(serde_json::json!({
            "nodes": { "(0.0, 0.0, 0.0)": { "sys": "A" } },
            "edges": []
        }));
        assert!(matches!(result, Err(RouteError::GraphMalformed(_))));
    }

    #[test]
    fn rejects_unknown_endpoint() {
        let result = TaggedGraph::from_value(serde_json::json!({
            "nodes": { "(0.000, 0.000, 0.000)": { "sys": "A" } },
            "edges": [
                { "from": "(0.000, 0.000, 0.000)", "to": "(1.000, 0.000, 0.000)", "sys": "A" },
            ]
        }));
        let message = result.unwrap_err().to_string();
        assert!(message.contains("(1.000, 0.000, 0.000)"));
    }

    #[test]
    fn rejects_self_loop() {
        let result = TaggedGraph::from_value(serde_json::json!({
            "nodes": { "(0.000, 0.000, 0.000)": { "sys": "A" } },
            "edges": [
                { "from": "(0.000, 0.000, 0.000)", "to": "(0.000, 0.000, 0.000)", "sys": "A" },
            ]
        }));
        assert!(result.unwrap_err().to_string().contains("self-loop"));
    }

    #[test]
    fn rejects_duplicate_edge_either_orientation() {
        let result = TaggedGraph::from_value(serde_json::json!({
            "nodes": {
                "(0.000, 0.000, 0.000)": { "sys": "A" },
                "(1.000, 0.000, 0.000)": { "sys": "A" },
            },
            "edges": [
                { "from": "(0.000, 0.000, 0.000)", "to": "(1.000, 0.000, 0.000)", "sys": "A" },
                { "from": "(1.000, 0.000, 0.000)", "to": "(0.000, 0.000, 0.000)", "sys": "A" },
            ]
        }));
        assert!(result.unwrap_err().to_string().contains("duplicate edge"));
    }

    #[test]
    fn rejects_edge_tag_matching_neither_endpoint() {
        let result = TaggedGraph::from_value(serde_json::json!({
            "nodes": {
                "(0.000, 0.000, 0.000)": { "sys": "A" },
                "(1.000, 0.000, 0.000)": { "sys": "A" },
            },
            "edges": [
                { "from": "(0.000, 0.000, 0.000)", "to": "(1.000, 0.000, 0.000)", "sys": "B" },
            ]
        }));
        assert!(matches!(result, Err(RouteError::GraphMalformed(_))));
    }

    #[test]
    fn allows_cross_system_edge_touching_its_own_system() {
        // Edge tagged B between an A vertex and a B vertex is legal.
        let graph = line_graph();
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn loads_from_file() {
        use std::io::Write as _;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"nodes": {{"(0.000, 0.000, 0.000)": {{"sys": "A"}}}}, "edges": []}}"#
        )
        .unwrap();
        let graph = TaggedGraph::from_file(file.path()).unwrap();
        assert_eq!(graph.node_count(), 1);

        let missing = TaggedGraph::from_file(Path::new("/nonexistent/graph.json"));
        assert!(matches!(missing, Err(RouteError::Io { .. })));
    }
}
