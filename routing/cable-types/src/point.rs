//! Canonical 3D points.
//!
//! Vertex identity in the routing graph is textual: every point is rounded
//! to three decimals per component and rendered as `"(x.xxx, y.yyy, z.zzz)"`.
//! Two points are the same vertex exactly when their canonical keys are
//! equal; no tolerance is applied anywhere else.
//!
//! A [`CanonicalPoint`] carries both the key and the rounded numeric triple,
//! so distance computations never re-parse text.
//!
//! # Example
//!
//! ```
//! use cable_types::CanonicalPoint;
//!
//! let p = CanonicalPoint::new(1.0, 2.5, -3.125).unwrap();
//! assert_eq!(p.key(), "(1.000, 2.500, -3.125)");
//!
//! let q = CanonicalPoint::parse("(1.000, 2.500, -3.125)").unwrap();
//! assert_eq!(p, q);
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

use nalgebra::Point3;
use regex::Regex;

use crate::error::RouteError;

/// Exact shape of a canonical key: three signed fixed-point components with
/// exactly three fractional digits, comma-space separated, parenthesised.
#[allow(clippy::expect_used)] // static pattern, exercised by every test
fn key_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\(-?\d+\.\d{3}, -?\d+\.\d{3}, -?\d+\.\d{3}\)$")
            .expect("canonical key pattern is valid")
    })
}

/// Rounds one component to three decimals (half-to-even, the rounding of
/// `format!("{:.3}")`) and returns both the text and the re-parsed numeric.
///
/// Deriving the numeric from the text keeps the two representations in
/// agreement for every input.
fn round_component(value: f64) -> Result<(f64, String), RouteError> {
    if !value.is_finite() {
        return Err(RouteError::BadCoordinate(format!(
            "non-finite component {value}"
        )));
    }
    let text = format!("{value:.3}");
    let rounded = text
        .parse::<f64>()
        .map_err(|_| RouteError::BadCoordinate(format!("unrepresentable component {value}")))?;
    Ok((rounded, text))
}

/// A 3D point rounded to canonical three-decimal precision.
///
/// Holds the canonical textual key and the matching numeric coordinates.
/// Equality and hashing are defined on the key alone, which makes
/// `CanonicalPoint` directly usable as a vertex identity.
///
/// # Example
///
/// ```
/// use cable_types::CanonicalPoint;
///
/// // Inputs are rounded on ingest; the numeric triple matches the key.
/// let p = CanonicalPoint::new(0.1234, 0.0, 7.0).unwrap();
/// assert_eq!(p.key(), "(0.123, 0.000, 7.000)");
/// assert!((p.x() - 0.123).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct CanonicalPoint {
    key: String,
    coords: Point3<f64>,
}

impl CanonicalPoint {
    /// Canonicalises a raw coordinate triple.
    ///
    /// Each component is rounded half-to-even to three decimals; the key is
    /// the exact textual rendering of the rounded values.
    ///
    /// # Errors
    ///
    /// [`RouteError::BadCoordinate`] if any component is NaN or infinite.
    pub fn new(x: f64, y: f64, z: f64) -> Result<Self, RouteError> {
        let (rx, tx) = round_component(x)?;
        let (ry, ty) = round_component(y)?;
        let (rz, tz) = round_component(z)?;
        Ok(Self {
            key: format!("({tx}, {ty}, {tz})"),
            coords: Point3::new(rx, ry, rz),
        })
    }

    /// Parses a canonical key back into a point.
    ///
    /// Accepts exactly the shape produced by [`CanonicalPoint::new`]:
    /// parentheses, comma-space separators, three fractional digits per
    /// component. Anything else is rejected, including keys whose components
    /// would re-render differently (extra leading zeros, for instance).
    ///
    /// # Errors
    ///
    /// [`RouteError::BadCoordinate`] for any string not in canonical shape.
    ///
    /// # Example
    ///
    /// ```
    /// use cable_types::CanonicalPoint;
    ///
    /// assert!(CanonicalPoint::parse("(1.000, 2.000, 3.000)").is_ok());
    /// assert!(CanonicalPoint::parse("(1.0, 2.0, 3.0)").is_err());
    /// assert!(CanonicalPoint::parse("1.000, 2.000, 3.000").is_err());
    /// ```
    pub fn parse(key: &str) -> Result<Self, RouteError> {
        if !key_pattern().is_match(key) {
            return Err(RouteError::BadCoordinate(format!(
                "key {key:?} is not in canonical (x.xxx, y.yyy, z.zzz) form"
            )));
        }
        let inner = &key[1..key.len() - 1];
        let mut components = inner.split(", ").map(str::parse::<f64>);
        // The pattern guarantees exactly three parseable components.
        let x = components
            .next()
            .and_then(Result::ok)
            .ok_or_else(|| RouteError::BadCoordinate(key.to_owned()))?;
        let y = components
            .next()
            .and_then(Result::ok)
            .ok_or_else(|| RouteError::BadCoordinate(key.to_owned()))?;
        let z = components
            .next()
            .and_then(Result::ok)
            .ok_or_else(|| RouteError::BadCoordinate(key.to_owned()))?;
        let point = Self::new(x, y, z)?;
        if point.key != key {
            return Err(RouteError::BadCoordinate(format!(
                "key {key:?} is not canonical (renders as {:?})",
                point.key
            )));
        }
        Ok(point)
    }

    /// The canonical textual key. Key equality is vertex identity.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The rounded numeric coordinates.
    #[must_use]
    pub const fn coords(&self) -> Point3<f64> {
        self.coords
    }

    /// X component (rounded).
    #[must_use]
    pub fn x(&self) -> f64 {
        self.coords.x
    }

    /// Y component (rounded).
    #[must_use]
    pub fn y(&self) -> f64 {
        self.coords.y
    }

    /// Z component (rounded).
    #[must_use]
    pub fn z(&self) -> f64 {
        self.coords.z
    }

    /// Euclidean distance to another point, computed from the rounded
    /// numeric values.
    ///
    /// # Example
    ///
    /// ```
    /// use cable_types::CanonicalPoint;
    ///
    /// let a = CanonicalPoint::new(0.0, 0.0, 0.0).unwrap();
    /// let b = CanonicalPoint::new(3.0, 4.0, 0.0).unwrap();
    /// assert!((a.distance(&b) - 5.0).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        (self.coords - other.coords).norm()
    }
}

impl PartialEq for CanonicalPoint {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for CanonicalPoint {}

impl Hash for CanonicalPoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for CanonicalPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

impl serde::Serialize for CanonicalPoint {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.key)
    }
}

impl<'de> serde::Deserialize<'de> for CanonicalPoint {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        Self::parse(&key).map_err(serde::de::Error::custom)
    }
}

/// Total Euclidean length of a polyline.
///
/// Empty and single-point polylines have length zero.
#[must_use]
pub fn polyline_length(points: &[CanonicalPoint]) -> f64 {
    points.windows(2).map(|w| w[0].distance(&w[1])).sum()
}
