//! Route results and per-segment statistics.
//!
//! A successful routing call produces a [`RouteSolution`]: the polyline of
//! canonical points, its Euclidean length, the total number of A\* node
//! expansions, and a [`SegmentStats`] entry per waypoint-to-waypoint
//! segment.

use crate::point::{polyline_length, CanonicalPoint};

/// The outcome of a single segment search.
///
/// Produced by the A\* engine; consumed by the segment planner.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentPath {
    /// The polyline from segment source to segment destination, inclusive.
    pub points: Vec<CanonicalPoint>,
    /// Euclidean length of the polyline.
    pub length: f64,
    /// Vertices popped and expanded during the search.
    pub nodes_explored: usize,
}

impl SegmentPath {
    /// A single-point segment (source equals destination).
    #[must_use]
    pub fn single(point: CanonicalPoint) -> Self {
        Self {
            points: vec![point],
            length: 0.0,
            nodes_explored: 0,
        }
    }

    /// The unordered last edge of this segment, if it has one.
    #[must_use]
    pub fn last_edge(&self) -> Option<(&CanonicalPoint, &CanonicalPoint)> {
        match self.points.as_slice() {
            [.., a, b] => Some((a, b)),
            _ => None,
        }
    }
}

/// Statistics for one planned segment.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentStats {
    /// 1-based segment index.
    pub segment: usize,
    /// Segment source.
    pub from: CanonicalPoint,
    /// Segment destination.
    pub to: CanonicalPoint,
    /// Number of polyline points in the segment (before join dedup).
    pub points: usize,
    /// Vertices expanded by the segment's search.
    pub nodes_explored: usize,
}

/// A complete routing solution.
///
/// # Example
///
/// ```
/// use cable_types::{CanonicalPoint, RouteSolution, SegmentStats};
///
/// let points = vec![
///     CanonicalPoint::new(0.0, 0.0, 0.0).unwrap(),
///     CanonicalPoint::new(1.0, 0.0, 0.0).unwrap(),
/// ];
/// let stats = SegmentStats {
///     segment: 1,
///     from: points[0].clone(),
///     to: points[1].clone(),
///     points: 2,
///     nodes_explored: 1,
/// };
/// let solution = RouteSolution::new(points, vec![stats]);
/// assert_eq!(solution.point_count(), 2);
/// assert!((solution.length() - 1.0).abs() < 1e-12);
/// assert_eq!(solution.nodes_explored(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSolution {
    points: Vec<CanonicalPoint>,
    length: f64,
    segments: Vec<SegmentStats>,
}

impl RouteSolution {
    /// Builds a solution from the assembled polyline and segment records.
    ///
    /// The length is computed from the polyline.
    #[must_use]
    pub fn new(points: Vec<CanonicalPoint>, segments: Vec<SegmentStats>) -> Self {
        let length = polyline_length(&points);
        Self {
            points,
            length,
            segments,
        }
    }

    /// The full polyline, waypoints appearing exactly once at boundaries.
    #[must_use]
    pub fn points(&self) -> &[CanonicalPoint] {
        &self.points
    }

    /// Number of points in the polyline.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Total Euclidean length of the polyline.
    #[must_use]
    pub const fn length(&self) -> f64 {
        self.length
    }

    /// Total vertices expanded across all segments.
    #[must_use]
    pub fn nodes_explored(&self) -> usize {
        self.segments.iter().map(|s| s.nodes_explored).sum()
    }

    /// Per-segment statistics, in segment order.
    #[must_use]
    pub fn segments(&self) -> &[SegmentStats] {
        &self.segments
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64) -> CanonicalPoint {
        CanonicalPoint::new(x, 0.0, 0.0).unwrap()
    }

    #[test]
    fn single_segment_is_zero_cost() {
        let seg = SegmentPath::single(p(1.0));
        assert_eq!(seg.points.len(), 1);
        assert_relative_eq!(seg.length, 0.0);
        assert_eq!(seg.nodes_explored, 0);
        assert!(seg.last_edge().is_none());
    }

    #[test]
    fn last_edge_is_final_pair() {
        let seg = SegmentPath {
            points: vec![p(0.0), p(1.0), p(2.0)],
            length: 2.0,
            nodes_explored: 2,
        };
        let (a, b) = seg.last_edge().unwrap();
        assert_eq!(a, &p(1.0));
        assert_eq!(b, &p(2.0));
    }

    #[test]
    fn solution_totals() {
        let points = vec![p(0.0), p(1.0), p(2.0)];
        let segments = vec![
            SegmentStats {
                segment: 1,
                from: p(0.0),
                to: p(1.0),
                points: 2,
                nodes_explored: 3,
            },
            SegmentStats {
                segment: 2,
                from: p(1.0),
                to: p(2.0),
                points: 2,
                nodes_explored: 4,
            },
        ];
        let solution = RouteSolution::new(points, segments);
        assert_eq!(solution.point_count(), 3);
        assert_relative_eq!(solution.length(), 2.0, epsilon = 1e-12);
        assert_eq!(solution.nodes_explored(), 7);
        assert_eq!(solution.segments().len(), 2);
    }
}
