//! Multi-waypoint segment planning.
//!
//! The planner drives the A\* engine across an ordered waypoint sequence
//! `[w0, w1, …, wm]` (source, mandatory waypoints, destination), assembles
//! the final polyline with each waypoint appearing exactly once at segment
//! boundaries, and records per-segment search statistics.
//!
//! With forward-path routing on, the guard of [`crate::forward`] is
//! installed around every segment after the first, so a segment can never
//! begin by re-traversing the edge that ended the previous one.

use std::collections::HashSet;

use cable_graph::TramoId;
use cable_types::{CanonicalPoint, RouteError, RouteSolution, SegmentPath, SegmentStats};

use crate::astar::AStarEngine;
use crate::forward::ForwardPathGuard;

/// Plans routes through ordered waypoints over one engine.
#[derive(Debug, Clone, Copy)]
pub struct SegmentPlanner<'a> {
    engine: AStarEngine<'a>,
    forward_path: bool,
}

impl<'a> SegmentPlanner<'a> {
    /// Creates a planner over the given engine.
    #[must_use]
    pub const fn new(engine: AStarEngine<'a>) -> Self {
        Self {
            engine,
            forward_path: false,
        }
    }

    /// Enables or disables the forward-path (no-U-turn) rule.
    #[must_use]
    pub const fn with_forward_path(mut self, on: bool) -> Self {
        self.forward_path = on;
        self
    }

    /// Routes through `waypoints` in order.
    ///
    /// `waypoints` must hold at least source and destination. The forbidden
    /// set is borrowed for the duration of the call and is set-equal to its
    /// input contents on return, success or failure.
    ///
    /// # Errors
    ///
    /// [`RouteError::NoPath`] naming the first segment whose search
    /// exhausted the open set; no further segments are attempted.
    pub fn plan(
        &self,
        waypoints: &[CanonicalPoint],
        forbidden: &mut HashSet<TramoId>,
    ) -> Result<RouteSolution, RouteError> {
        debug_assert!(waypoints.len() >= 2, "need at least source and destination");

        let mut polyline = Vec::new();
        let mut segments = Vec::with_capacity(waypoints.len() - 1);
        let mut previous: Option<SegmentPath> = None;

        for (index, pair) in waypoints.windows(2).enumerate() {
            let segment_no = index + 1;
            let (from, to) = (&pair[0], &pair[1]);

            // The guard restores the forbidden set when it drops, on
            // success and on the error return below alike.
            let found = match &previous {
                Some(prev) if self.forward_path && segment_no >= 2 => {
                    let guard =
                        ForwardPathGuard::install(forbidden, prev, self.engine.tramo_index());
                    self.engine.search(from, to, guard.forbidden())
                }
                _ => self.engine.search(from, to, forbidden),
            };

            let segment = found.ok_or_else(|| RouteError::NoPath {
                segment: segment_no,
                from: from.key().to_owned(),
                to: to.key().to_owned(),
            })?;

            segments.push(SegmentStats {
                segment: segment_no,
                from: from.clone(),
                to: to.clone(),
                points: segment.points.len(),
                nodes_explored: segment.nodes_explored,
            });
            if polyline.is_empty() {
                polyline.extend(segment.points.iter().cloned());
            } else {
                polyline.extend(segment.points.iter().skip(1).cloned());
            }
            previous = Some(segment);
        }

        Ok(RouteSolution::new(polyline, segments))
    }
}
