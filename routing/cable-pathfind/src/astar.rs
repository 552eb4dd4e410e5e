//! Constrained A\* over a filtered adjacency.
//!
//! The engine searches a [`FilteredAdjacency`] from one canonical point to
//! another, skipping any edge whose tramo id is in the caller's forbidden
//! set. The Euclidean heuristic is consistent, so the first time the goal
//! is popped its cost is optimal and no re-opening is needed.
//!
//! Determinism: the open set orders entries by f-score, then g-score, then
//! insertion sequence (FIFO). Two searches over the same inputs expand the
//! same vertices in the same order and report the same
//! `nodes_explored` count.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use cable_graph::{FilteredAdjacency, TramoId, TramoIndex};
use cable_types::{CanonicalPoint, SegmentPath};

/// Entry in the A\* open set.
///
/// Ordered min-first on (f, g, seq) through a reversed [`Ord`] so the
/// standard max-heap behaves as a deterministic min-heap. NaN cannot occur:
/// weights and heuristics come from canonicalised finite coordinates.
#[derive(Debug, Clone)]
struct OpenEntry {
    f: f64,
    g: f64,
    seq: u64,
    key: String,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed on every field: the smallest (f, g, seq) is the
        // greatest entry, so it is popped first.
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.g.total_cmp(&self.g))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// A\* engine bound to one filtered adjacency and an optional tramo index.
///
/// The engine never mutates the adjacency or the forbidden set. Without a
/// tramo index no edge can be named, so nothing is ever forbidden.
///
/// # Example
///
/// ```
/// use cable_graph::{FilteredAdjacency, TaggedGraph};
/// use cable_pathfind::AStarEngine;
/// use cable_types::{CableClass, CanonicalPoint};
/// use std::collections::HashSet;
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
/// let adj = FilteredAdjacency::build(&graph, CableClass::A.permitted());
///
/// let engine = AStarEngine::new(&adj);
/// let src = CanonicalPoint::new(0.0, 0.0, 0.0).unwrap();
/// let dst = CanonicalPoint::new(1.0, 0.0, 0.0).unwrap();
/// let segment = engine.search(&src, &dst, &HashSet::new()).unwrap();
/// assert_eq!(segment.points.len(), 2);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AStarEngine<'a> {
    adj: &'a FilteredAdjacency,
    tramo: Option<&'a TramoIndex>,
}

impl<'a> AStarEngine<'a> {
    /// Creates an engine over the given adjacency, with no edge naming.
    #[must_use]
    pub const fn new(adj: &'a FilteredAdjacency) -> Self {
        Self { adj, tramo: None }
    }

    /// Attaches a tramo index so forbidden edge ids can be honoured.
    #[must_use]
    pub const fn with_tramo_index(mut self, tramo: &'a TramoIndex) -> Self {
        self.tramo = Some(tramo);
        self
    }

    /// The attached tramo index, if any.
    #[must_use]
    pub const fn tramo_index(&self) -> Option<&'a TramoIndex> {
        self.tramo
    }

    fn is_forbidden(&self, u: &str, v: &str, forbidden: &HashSet<TramoId>) -> bool {
        if forbidden.is_empty() {
            return false;
        }
        self.tramo
            .and_then(|index| index.id_of(u, v))
            .is_some_and(|id| forbidden.contains(&id))
    }

    /// Searches for a shortest walk from `src` to `dst`.
    ///
    /// Returns `None` when the open set is exhausted without reaching
    /// `dst`; endpoint existence and cable validation are the caller's
    /// concern. `src == dst` yields a single-point segment with zero nodes
    /// explored.
    ///
    /// `nodes_explored` counts vertices popped and expanded; the goal pop
    /// and stale heap entries do not count.
    #[must_use]
    pub fn search(
        &self,
        src: &CanonicalPoint,
        dst: &CanonicalPoint,
        forbidden: &HashSet<TramoId>,
    ) -> Option<SegmentPath> {
        if src == dst {
            return Some(SegmentPath::single(src.clone()));
        }

        let mut open = BinaryHeap::new();
        let mut g_score: HashMap<String, f64> = HashMap::new();
        let mut came_from: HashMap<String, String> = HashMap::new();
        let mut points: HashMap<String, CanonicalPoint> = HashMap::new();
        let mut closed: HashSet<String> = HashSet::new();
        let mut seq = 0u64;
        let mut explored = 0usize;

        points.insert(src.key().to_owned(), src.clone());
        g_score.insert(src.key().to_owned(), 0.0);
        open.push(OpenEntry {
            f: src.distance(dst),
            g: 0.0,
            seq,
            key: src.key().to_owned(),
        });

        while let Some(entry) = open.pop() {
            if entry.key == dst.key() {
                return Some(reconstruct(dst, entry.g, explored, &came_from, &points));
            }
            if !closed.insert(entry.key.clone()) {
                continue; // stale entry, vertex already settled
            }
            explored += 1;

            for (neighbour, weight) in self.adj.neighbours(&entry.key) {
                if closed.contains(neighbour.key()) {
                    continue;
                }
                if self.is_forbidden(&entry.key, neighbour.key(), forbidden) {
                    continue;
                }
                let tentative = entry.g + weight;
                let improved = g_score
                    .get(neighbour.key())
                    .is_none_or(|&best| tentative < best);
                if improved {
                    g_score.insert(neighbour.key().to_owned(), tentative);
                    came_from.insert(neighbour.key().to_owned(), entry.key.clone());
                    points
                        .entry(neighbour.key().to_owned())
                        .or_insert_with(|| neighbour.clone());
                    seq += 1;
                    open.push(OpenEntry {
                        f: tentative + neighbour.distance(dst),
                        g: tentative,
                        seq,
                        key: neighbour.key().to_owned(),
                    });
                }
            }
        }
        None
    }
}

fn reconstruct(
    dst: &CanonicalPoint,
    length: f64,
    explored: usize,
    came_from: &HashMap<String, String>,
    points: &HashMap<String, CanonicalPoint>,
) -> SegmentPath {
    let mut path = vec![dst.clone()];
    let mut cursor = dst.key();
    while let Some(previous) = came_from.get(cursor) {
        if let Some(point) = points.get(previous) {
            path.push(point.clone());
        }
        cursor = previous;
    }
    path.reverse();
    SegmentPath {
        points: path,
        length,
        nodes_explored: explored,
    }
}
