//! Error types for routing operations.
//!
//! A single [`RouteError`] enum covers boundary validation (coordinates,
//! graph and tramo-map files), endpoint validation against the cable
//! policy, and search failure. Parsing and validation errors are raised
//! eagerly at the boundary; the core never catches its own errors.

use std::fmt;
use std::path::PathBuf;

use crate::system::Subsystem;

/// Which terminal of a routing request an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    /// The route source.
    Source,
    /// The route destination.
    Destination,
    /// The i-th mandatory waypoint (1-based).
    Waypoint(usize),
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => f.write_str("source"),
            Self::Destination => f.write_str("destination"),
            Self::Waypoint(i) => write!(f, "waypoint {i}"),
        }
    }
}

/// Errors raised by loading, validation, and pathfinding.
///
/// # Example
///
/// ```
/// use cable_types::{RouteError, Terminal};
///
/// let error = RouteError::EndpointNotInGraph {
///     which: Terminal::Destination,
///     key: "(1.000, 2.000, 3.000)".into(),
/// };
/// assert!(error.to_string().contains("destination"));
/// ```
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RouteError {
    /// A coordinate was non-finite or a key was not in canonical form.
    #[error("bad coordinate: {0}")]
    BadCoordinate(String),

    /// The tagged graph document violated a structural constraint.
    #[error("malformed graph: {0}")]
    GraphMalformed(String),

    /// The tramo-id map or forbidden-sections document violated a
    /// structural constraint.
    #[error("malformed tramo mapping: {0}")]
    MappingMalformed(String),

    /// A request terminal is not a vertex of the graph.
    #[error("{which} {key} not found in graph")]
    EndpointNotInGraph {
        /// Which terminal was missing.
        which: Terminal,
        /// The canonical key that was looked up.
        key: String,
    },

    /// A request terminal is in a subsystem the cable class may not enter.
    #[error("{which} {key} is in forbidden system {actual} (cable permits {permitted:?})")]
    EndpointInForbiddenSystem {
        /// Which terminal was rejected.
        which: Terminal,
        /// The canonical key of the terminal.
        key: String,
        /// The subsystem the terminal actually belongs to.
        actual: Subsystem,
        /// The subsystems the selected cable class permits.
        permitted: &'static [Subsystem],
    },

    /// The A\* open set was exhausted without reaching the segment goal.
    #[error("no path for segment {segment}: {from} -> {to}")]
    NoPath {
        /// 1-based index of the failing segment.
        segment: usize,
        /// Canonical key of the segment source.
        from: String,
        /// Canonical key of the segment destination.
        to: String,
    },

    /// An edge id was looked up that the tramo index does not carry.
    ///
    /// Internal condition; never surfaced through the public facade.
    #[error("edge not registered in tramo index: {0}")]
    UnknownEdge(String),

    /// An input file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// The file that failed to load.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl RouteError {
    /// Returns `true` for failures of the search itself (as opposed to
    /// malformed inputs): missing or forbidden endpoints and path
    /// exhaustion. These are the kinds the endpoint diagnoser annotates.
    #[must_use]
    pub const fn is_routing_failure(&self) -> bool {
        matches!(
            self,
            Self::EndpointNotInGraph { .. }
                | Self::EndpointInForbiddenSystem { .. }
                | Self::NoPath { .. }
        )
    }

    /// Returns `true` if the error describes a malformed input artifact.
    #[must_use]
    pub const fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            Self::BadCoordinate(_) | Self::GraphMalformed(_) | Self::MappingMalformed(_)
        )
    }
}
