//! Wire format of the tagged graph file.
//!
//! The on-disk document is a JSON object with two fields:
//!
//! ```json
//! {
//!   "nodes": { "(0.000, 0.000, 0.000)": { "sys": "A" } },
//!   "edges": [ { "from": "(0.000, 0.000, 0.000)",
//!                "to":   "(1.000, 0.000, 0.000)",
//!                "sys":  "A" } ]
//! }
//! ```
//!
//! Unknown fields are ignored on both nodes and edges. Semantic validation
//! (key shape, endpoint presence, duplicates, tag consistency) happens in
//! [`crate::graph::TaggedGraph`], not here.

use std::collections::HashMap;

use cable_types::Subsystem;
use serde::Deserialize;

/// One vertex entry of the graph document.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeSpec {
    /// Subsystem tag of the vertex.
    pub sys: Subsystem,
}

/// One edge entry of the graph document.
#[derive(Debug, Clone, Deserialize)]
pub struct EdgeSpec {
    /// Canonical key of one endpoint.
    pub from: String,
    /// Canonical key of the other endpoint.
    pub to: String,
    /// Subsystem tag of the edge.
    pub sys: Subsystem,
}

/// The complete tagged graph document.
///
/// Edge order is preserved from the file; the store relies on it for
/// deterministic adjacency construction.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphDocument {
    /// Vertex table keyed by canonical point key.
    pub nodes: HashMap<String, NodeSpec>,
    /// Edge list in file order.
    pub edges: Vec<EdgeSpec>,
}
