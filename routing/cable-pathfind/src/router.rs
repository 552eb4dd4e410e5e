//! The top-level routing facade.
//!
//! [`SystemRouter`] owns one loaded graph, its optional tramo index, and a
//! base forbidden set. Every operation resolves the cable policy, validates
//! the request terminals, derives the filtered adjacency, and drives the
//! segment planner. Failures of the search itself can be annotated with
//! endpoint diagnosis when candidate graph files are supplied.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use cable_graph::{
    load_forbidden_sections, FilteredAdjacency, TaggedGraph, TramoId, TramoIndex,
};
use cable_types::{CableClass, CanonicalPoint, RouteError, RouteSolution, Terminal};

use crate::astar::AStarEngine;
use crate::diagnose::{diagnose_endpoints, EndpointDiagnosis};
use crate::planner::SegmentPlanner;

/// A routing failure, optionally annotated with endpoint diagnosis.
#[derive(Debug)]
pub struct RouteFailure {
    /// The underlying error.
    pub error: RouteError,
    /// Diagnoser findings, present for routing failures with candidates.
    pub diagnosis: Option<EndpointDiagnosis>,
}

impl fmt::Display for RouteFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.error.fmt(f)
    }
}

impl std::error::Error for RouteFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Which waypoint ordering won an [`SystemRouter::optimal_order`] run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderingChoice {
    /// `src -> p1 -> p2 -> dst` is strictly shorter.
    Original,
    /// `src -> p2 -> p1 -> dst` is strictly shorter.
    Swapped,
    /// Both orderings have identical length.
    Tie,
}

/// The two routing attempts of an ordering comparison.
///
/// Each ordering is attempted independently; one may fail while the other
/// succeeds.
#[derive(Debug)]
pub struct OrderingComparison {
    /// Outcome of `src -> p1 -> p2 -> dst`.
    pub original: Result<RouteSolution, RouteError>,
    /// Outcome of `src -> p2 -> p1 -> dst`.
    pub swapped: Result<RouteSolution, RouteError>,
}

impl OrderingComparison {
    /// Which ordering is preferable, or `None` when both failed.
    #[must_use]
    pub fn choice(&self) -> Option<OrderingChoice> {
        match (&self.original, &self.swapped) {
            (Ok(a), Ok(b)) => Some(match a.length().total_cmp(&b.length()) {
                std::cmp::Ordering::Less => OrderingChoice::Original,
                std::cmp::Ordering::Greater => OrderingChoice::Swapped,
                std::cmp::Ordering::Equal => OrderingChoice::Tie,
            }),
            (Ok(_), Err(_)) => Some(OrderingChoice::Original),
            (Err(_), Ok(_)) => Some(OrderingChoice::Swapped),
            (Err(_), Err(_)) => None,
        }
    }

    /// The preferred solution (the original on a tie), if any succeeded.
    #[must_use]
    pub fn best(&self) -> Option<&RouteSolution> {
        match self.choice()? {
            OrderingChoice::Swapped => self.swapped.as_ref().ok(),
            OrderingChoice::Original | OrderingChoice::Tie => self.original.as_ref().ok(),
        }
    }

    /// Length saved by the better ordering, when both succeeded.
    #[must_use]
    pub fn improvement(&self) -> Option<f64> {
        match (&self.original, &self.swapped) {
            (Ok(a), Ok(b)) => Some((a.length() - b.length()).abs()),
            _ => None,
        }
    }
}

/// Top-level router over one tagged graph.
///
/// # Example
///
/// ```
/// use cable_graph::TaggedGraph;
/// use cable_pathfind::SystemRouter;
/// use cable_types::{CableClass, CanonicalPoint};
///
/// let graph = TaggedGraph::from_value(serde_json::json!({
///     "nodes": {
///         "(0.000, 0.000, 0.000)": { "sys": "A" },
///         "(1.000, 0.000, 0.000)": { "sys": "A" },
///         "(2.000, 0.000, 0.000)": { "sys": "A" },
///     },
///     "edges": [
///         { "from": "(0.000, 0.000, 0.000)", "to": "(1.000, 0.000, 0.000)", "sys": "A" },
///         { "from": "(1.000, 0.000, 0.000)", "to": "(2.000, 0.000, 0.000)", "sys": "A" },
///     ]
/// })).unwrap();
///
/// let router = SystemRouter::new(graph);
/// let src = CanonicalPoint::new(0.0, 0.0, 0.0).unwrap();
/// let dst = CanonicalPoint::new(2.0, 0.0, 0.0).unwrap();
/// let solution = router.direct(CableClass::A, &src, &dst).unwrap();
/// assert_eq!(solution.point_count(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct SystemRouter {
    graph: TaggedGraph,
    tramo: Option<TramoIndex>,
    base_forbidden: HashSet<TramoId>,
}

impl SystemRouter {
    /// Creates a router over an already-loaded graph.
    #[must_use]
    pub fn new(graph: TaggedGraph) -> Self {
        Self {
            graph,
            tramo: None,
            base_forbidden: HashSet::new(),
        }
    }

    /// Attaches a tramo index (required for forbidden edges and forward
    /// path).
    #[must_use]
    pub fn with_tramo_index(mut self, tramo: TramoIndex) -> Self {
        self.tramo = Some(tramo);
        self
    }

    /// Sets the base forbidden set applied to every call.
    #[must_use]
    pub fn with_forbidden(mut self, forbidden: HashSet<TramoId>) -> Self {
        self.base_forbidden = forbidden;
        self
    }

    /// Loads a router from files: the graph, an optional tramo map, and an
    /// optional forbidden-sections list.
    ///
    /// # Errors
    ///
    /// [`RouteError::Io`] / [`RouteError::GraphMalformed`] /
    /// [`RouteError::MappingMalformed`] from the loaders; a forbidden file
    /// without a tramo map is [`RouteError::MappingMalformed`], since the
    /// ids could never be resolved to edges.
    pub fn from_files(
        graph_path: &Path,
        tramo_path: Option<&Path>,
        forbidden_path: Option<&Path>,
    ) -> Result<Self, RouteError> {
        if forbidden_path.is_some() && tramo_path.is_none() {
            return Err(RouteError::MappingMalformed(
                "forbidden sections require a tramo map".to_owned(),
            ));
        }
        let mut router = Self::new(TaggedGraph::from_file(graph_path)?);
        if let Some(path) = tramo_path {
            router.tramo = Some(TramoIndex::from_file(path)?);
        }
        if let Some(path) = forbidden_path {
            router.base_forbidden = load_forbidden_sections(path)?;
        }
        Ok(router)
    }

    /// The loaded graph.
    #[must_use]
    pub const fn graph(&self) -> &TaggedGraph {
        &self.graph
    }

    /// The attached tramo index, if any.
    #[must_use]
    pub const fn tramo_index(&self) -> Option<&TramoIndex> {
        self.tramo.as_ref()
    }

    /// The base forbidden set.
    #[must_use]
    pub const fn base_forbidden(&self) -> &HashSet<TramoId> {
        &self.base_forbidden
    }

    fn validate_terminal(
        &self,
        which: Terminal,
        point: &CanonicalPoint,
        cable: CableClass,
    ) -> Result<(), RouteError> {
        let tag = self
            .graph
            .vertex_tag(point.key())
            .ok_or_else(|| RouteError::EndpointNotInGraph {
                which,
                key: point.key().to_owned(),
            })?;
        if !cable.permits(tag) {
            return Err(RouteError::EndpointInForbiddenSystem {
                which,
                key: point.key().to_owned(),
                actual: tag,
                permitted: cable.permitted(),
            });
        }
        Ok(())
    }

    /// Direct source-to-destination routing.
    ///
    /// # Errors
    ///
    /// As for [`SystemRouter::route`].
    pub fn direct(
        &self,
        cable: CableClass,
        src: &CanonicalPoint,
        dst: &CanonicalPoint,
    ) -> Result<RouteSolution, RouteError> {
        self.route(cable, src, &[], dst, false)
    }

    /// Routes from `src` through `ppos` in order to `dst`.
    ///
    /// # Errors
    ///
    /// [`RouteError::EndpointNotInGraph`] or
    /// [`RouteError::EndpointInForbiddenSystem`] if any terminal fails
    /// validation (checked before any search), [`RouteError::NoPath`] when
    /// a segment search exhausts the open set.
    pub fn route(
        &self,
        cable: CableClass,
        src: &CanonicalPoint,
        ppos: &[CanonicalPoint],
        dst: &CanonicalPoint,
        forward_path: bool,
    ) -> Result<RouteSolution, RouteError> {
        self.validate_terminal(Terminal::Source, src, cable)?;
        for (i, ppo) in ppos.iter().enumerate() {
            self.validate_terminal(Terminal::Waypoint(i + 1), ppo, cable)?;
        }
        self.validate_terminal(Terminal::Destination, dst, cable)?;

        let mut waypoints = Vec::with_capacity(ppos.len() + 2);
        waypoints.push(src.clone());
        waypoints.extend(ppos.iter().cloned());
        waypoints.push(dst.clone());

        let adjacency = FilteredAdjacency::build(&self.graph, cable.permitted());
        let mut engine = AStarEngine::new(&adjacency);
        if let Some(tramo) = &self.tramo {
            engine = engine.with_tramo_index(tramo);
        }
        let planner = SegmentPlanner::new(engine).with_forward_path(forward_path);

        let mut forbidden = self.base_forbidden.clone();
        let solution = planner.plan(&waypoints, &mut forbidden);
        debug_assert_eq!(forbidden, self.base_forbidden, "forbidden set not restored");
        solution
    }

    /// Compares the two orderings of a pair of mandatory waypoints.
    ///
    /// Both `src -> p1 -> p2 -> dst` and `src -> p2 -> p1 -> dst` are
    /// attempted; each may fail independently.
    #[must_use]
    pub fn optimal_order(
        &self,
        cable: CableClass,
        src: &CanonicalPoint,
        p1: &CanonicalPoint,
        p2: &CanonicalPoint,
        dst: &CanonicalPoint,
    ) -> OrderingComparison {
        OrderingComparison {
            original: self.route(cable, src, &[p1.clone(), p2.clone()], dst, false),
            swapped: self.route(cable, src, &[p2.clone(), p1.clone()], dst, false),
        }
    }

    /// Like [`SystemRouter::route`], attaching endpoint diagnosis across
    /// `candidates` to routing failures.
    ///
    /// # Errors
    ///
    /// [`RouteFailure`] wrapping the underlying [`RouteError`]; the
    /// diagnosis is present for routing failures when `candidates` is
    /// non-empty.
    pub fn route_diagnosed(
        &self,
        cable: CableClass,
        src: &CanonicalPoint,
        ppos: &[CanonicalPoint],
        dst: &CanonicalPoint,
        forward_path: bool,
        candidates: &[PathBuf],
    ) -> Result<RouteSolution, RouteFailure> {
        self.route(cable, src, ppos, dst, forward_path)
            .map_err(|error| {
                let diagnosis = (error.is_routing_failure() && !candidates.is_empty())
                    .then(|| diagnose_endpoints(src, dst, candidates));
                RouteFailure { error, diagnosis }
            })
    }
}
