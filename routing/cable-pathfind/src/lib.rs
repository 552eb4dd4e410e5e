//! Constrained pathfinding for dual-system cable routing.
//!
//! This crate drives shortest-path search over the stores of `cable-graph`:
//!
//! - **Engine** ([`astar`]): deterministic A\* over a filtered adjacency
//!   with a forbidden-edge set
//! - **Planner** ([`planner`]): multi-waypoint sequencing with polyline
//!   assembly and per-segment statistics
//! - **Forward path** ([`forward`]): the scoped no-U-turn restriction
//!   between consecutive segments
//! - **Diagnosis** ([`diagnose`]): endpoint presence and cable
//!   recommendations across a pool of graph files
//! - **Facade** ([`router`]): validation, filtering, planning, and failure
//!   annotation behind one [`SystemRouter`]
//!
//! # Quick start
//!
//! ```
//! use cable_graph::TaggedGraph;
//! use cable_pathfind::SystemRouter;
//! use cable_types::{CableClass, CanonicalPoint};
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
//! let router = SystemRouter::new(graph);
//! let src = CanonicalPoint::new(0.0, 0.0, 0.0).unwrap();
//! let dst = CanonicalPoint::new(1.0, 0.0, 0.0).unwrap();
//!
//! let solution = router.direct(CableClass::A, &src, &dst).unwrap();
//! assert!((solution.length() - 1.0).abs() < 1e-12);
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod astar;
pub mod diagnose;
pub mod forward;
pub mod planner;
pub mod router;

pub use astar::AStarEngine;
pub use diagnose::{
    diagnose_endpoint_files, diagnose_endpoints, DiagnosisOutcome, EndpointDiagnosis,
    EndpointPresence, GraphPresence,
};
pub use forward::ForwardPathGuard;
pub use planner::SegmentPlanner;
pub use router::{OrderingChoice, OrderingComparison, RouteFailure, SystemRouter};
