//! Scoped no-U-turn restriction between waypoint segments.
//!
//! When forward-path routing is on, the edge used to arrive at a mandatory
//! waypoint must not be the first edge of the next segment. The
//! [`ForwardPathGuard`] realises this as a scoped mutation of the caller's
//! forbidden set: the previous segment's last tramo id is inserted on
//! installation and removed again on drop, on every exit path.
//!
//! The net contents of the forbidden set are therefore identical before and
//! after the guarded search, whether it succeeds or fails.

use std::collections::HashSet;

use cable_graph::{TramoId, TramoIndex};
use cable_types::SegmentPath;

/// Guard that temporarily forbids the previous segment's last edge.
///
/// # Example
///
/// ```
/// use cable_graph::{TramoIndex, TramoId};
/// use cable_pathfind::ForwardPathGuard;
/// use cable_types::{CanonicalPoint, SegmentPath};
/// use std::collections::HashSet;
///
/// let tramo = TramoIndex::from_value(serde_json::json!({
///     "(0.000, 0.000, 0.000)-(1.000, 0.000, 0.000)": 1,
/// })).unwrap();
///
/// let previous = SegmentPath {
///     points: vec![
///         CanonicalPoint::new(0.0, 0.0, 0.0).unwrap(),
///         CanonicalPoint::new(1.0, 0.0, 0.0).unwrap(),
///     ],
///     length: 1.0,
///     nodes_explored: 1,
/// };
///
/// let mut forbidden = HashSet::new();
/// {
///     let guard = ForwardPathGuard::install(&mut forbidden, &previous, Some(&tramo));
///     assert!(guard.forbidden().contains(&TramoId(1)));
/// }
/// // Restored on drop.
/// assert!(forbidden.is_empty());
/// ```
#[derive(Debug)]
pub struct ForwardPathGuard<'a> {
    forbidden: &'a mut HashSet<TramoId>,
    injected: Option<TramoId>,
}

impl<'a> ForwardPathGuard<'a> {
    /// Installs the restriction derived from `previous` into `forbidden`.
    ///
    /// No-ops (still restoring nothing on drop) when:
    /// - the previous segment is a single point (consecutive waypoints
    ///   canonicalise equal),
    /// - no tramo index is available,
    /// - the last edge has no registered tramo id (logged as a warning),
    /// - the id is already in the forbidden set.
    pub fn install(
        forbidden: &'a mut HashSet<TramoId>,
        previous: &SegmentPath,
        tramo: Option<&TramoIndex>,
    ) -> Self {
        let injected = match (previous.last_edge(), tramo) {
            (Some((a, b)), Some(index)) => match index.id_of(a.key(), b.key()) {
                Some(id) => forbidden.insert(id).then_some(id),
                None => {
                    tracing::warn!(
                        from = a.key(),
                        to = b.key(),
                        "last edge has no tramo id; forward path not enforced"
                    );
                    None
                }
            },
            _ => None,
        };
        Self { forbidden, injected }
    }

    /// The forbidden set with the restriction applied.
    #[must_use]
    pub fn forbidden(&self) -> &HashSet<TramoId> {
        self.forbidden
    }

    /// The id injected by this guard, if any.
    #[must_use]
    pub const fn injected(&self) -> Option<TramoId> {
        self.injected
    }
}

impl Drop for ForwardPathGuard<'_> {
    fn drop(&mut self) {
        if let Some(id) = self.injected {
            self.forbidden.remove(&id);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use cable_types::CanonicalPoint;

    fn p(x: f64) -> CanonicalPoint {
        CanonicalPoint::new(x, 0.0, 0.0).unwrap()
    }

    fn segment(points: Vec<CanonicalPoint>) -> SegmentPath {
        SegmentPath {
            length: 0.0,
            nodes_explored: 0,
            points,
        }
    }

    fn index() -> TramoIndex {
        TramoIndex::from_value(serde_json::json!({
            "(0.000, 0.000, 0.000)-(1.000, 0.000, 0.000)": 1,
        }))
        .unwrap()
    }

    #[test]
    fn injects_and_restores() {
        let tramo = index();
        let previous = segment(vec![p(0.0), p(1.0)]);
        let mut forbidden = HashSet::from([TramoId(42)]);
        {
            let guard = ForwardPathGuard::install(&mut forbidden, &previous, Some(&tramo));
            assert_eq!(guard.injected(), Some(TramoId(1)));
            assert_eq!(guard.forbidden().len(), 2);
        }
        assert_eq!(forbidden, HashSet::from([TramoId(42)]));
    }

    #[test]
    fn single_point_segment_is_noop() {
        let tramo = index();
        let previous = segment(vec![p(0.0)]);
        let mut forbidden = HashSet::new();
        let guard = ForwardPathGuard::install(&mut forbidden, &previous, Some(&tramo));
        assert_eq!(guard.injected(), None);
    }

    #[test]
    fn missing_index_is_noop() {
        let previous = segment(vec![p(0.0), p(1.0)]);
        let mut forbidden = HashSet::new();
        {
            let guard = ForwardPathGuard::install(&mut forbidden, &previous, None);
            assert_eq!(guard.injected(), None);
        }
        assert!(forbidden.is_empty());
    }

    #[test]
    fn unregistered_edge_is_noop() {
        let tramo = index();
        let previous = segment(vec![p(1.0), p(2.0)]);
        let mut forbidden = HashSet::new();
        {
            let guard = ForwardPathGuard::install(&mut forbidden, &previous, Some(&tramo));
            assert_eq!(guard.injected(), None);
        }
        assert!(forbidden.is_empty());
    }

    #[test]
    fn already_forbidden_id_survives_drop() {
        let tramo = index();
        let previous = segment(vec![p(0.0), p(1.0)]);
        let mut forbidden = HashSet::from([TramoId(1)]);
        {
            let guard = ForwardPathGuard::install(&mut forbidden, &previous, Some(&tramo));
            // Nothing injected: the id was already present, so the guard
            // must not remove it on drop.
            assert_eq!(guard.injected(), None);
        }
        assert_eq!(forbidden, HashSet::from([TramoId(1)]));
    }
}
