//! Core types for dual-system cable routing.
//!
//! This crate provides the foundational vocabulary shared by the routing
//! stack:
//!
//! - **Points**: canonical three-decimal 3D points whose textual key is
//!   vertex identity ([`CanonicalPoint`])
//! - **Subsystems and cables**: the A/B partition and the fixed cable
//!   access policy ([`Subsystem`], [`CableClass`])
//! - **Errors**: the full failure taxonomy ([`RouteError`], [`Terminal`])
//! - **Results**: polylines with per-segment search statistics
//!   ([`RouteSolution`], [`SegmentStats`], [`SegmentPath`])
//!
//! # Example
//!
//! ```
//! use cable_types::{CableClass, CanonicalPoint, Subsystem};
//!
//! let src = CanonicalPoint::new(0.0, 0.0, 0.0).unwrap();
//! let dst = CanonicalPoint::new(2.0, 0.0, 0.0).unwrap();
//!
//! assert_eq!(src.key(), "(0.000, 0.000, 0.000)");
//! assert!((src.distance(&dst) - 2.0).abs() < 1e-12);
//! assert!(CableClass::C.permits(Subsystem::B));
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod error;
pub mod point;
pub mod route;
pub mod system;

pub use error::{RouteError, Terminal};
pub use point::{polyline_length, CanonicalPoint};
pub use route::{RouteSolution, SegmentPath, SegmentStats};
pub use system::{CableClass, Subsystem};
