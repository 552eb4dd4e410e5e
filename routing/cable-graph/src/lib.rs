//! Graph storage for dual-system cable routing.
//!
//! This crate owns everything between the on-disk JSON artifacts and the
//! search algorithms:
//!
//! - **Documents**: the tagged graph wire format ([`document`])
//! - **Store**: the immutable, validated [`TaggedGraph`]
//! - **Edge ids**: the bidirectional [`TramoIndex`] and forbidden-section
//!   loading ([`tramo`])
//! - **Views**: the per-cable [`FilteredAdjacency`]
//!
//! # Example
//!
//! ```
//! use cable_graph::{FilteredAdjacency, TaggedGraph};
//! use cable_types::CableClass;
//!
//! let graph = TaggedGraph::from_value(serde_json::json!({
//!     "nodes": {
//!         "(0.000, 0.000, 0.000)": { "sys": "A" },
//!         "(1.000, 0.000, 0.000)": { "sys": "A" },
//!     },
//!     "edges": [
//!         { "from": "(0.000, 0.000, 0.000)",
//!           "to": "(1.000, 0.000, 0.000)", "sys": "A" },
//!     ]
//! })).unwrap();
//!
//! let adj = FilteredAdjacency::build(&graph, CableClass::A.permitted());
//! assert_eq!(adj.edge_count(), 1);
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod document;
pub mod filter;
pub mod graph;
pub mod tramo;

pub use document::{EdgeSpec, GraphDocument, NodeSpec};
pub use filter::{FilteredAdjacency, Neighbour};
pub use graph::{GraphEdge, TaggedGraph, VertexRecord};
pub use tramo::{edge_key, forbidden_from_value, load_forbidden_sections, TramoId, TramoIndex};
