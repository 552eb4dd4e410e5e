//! The tramo-id index: stable integer identifiers for undirected edges.
//!
//! Every edge can be named by a positive integer ("tramo id") assigned by an
//! external map file. The file is a JSON object whose keys are the two
//! canonical point keys joined by `-` in lexicographic order, and whose
//! values are unique positive integers:
//!
//! ```json
//! { "(0.000, 0.000, 0.000)-(1.000, 0.000, 0.000)": 1 }
//! ```
//!
//! [`TramoIndex`] is the invertible in-memory form: id → edge and edge → id.
//! Forbidden-edge sets are expressed as sets of [`TramoId`].

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;

use cable_types::{CanonicalPoint, RouteError};

/// Canonical textual key of an unordered edge: the two point keys joined by
/// `-`, smaller key first.
///
/// Symmetric by construction: `edge_key(u, v) == edge_key(v, u)`.
#[must_use]
pub fn edge_key(u: &str, v: &str) -> String {
    if u <= v {
        format!("{u}-{v}")
    } else {
        format!("{v}-{u}")
    }
}

/// Splits an edge key at the `)-(` boundary between the two point keys.
///
/// Splitting on a bare `-` would be ambiguous because point keys may carry
/// negative components.
fn split_edge_key(key: &str) -> Option<(&str, &str)> {
    let boundary = key.find(")-(")?;
    Some((&key[..=boundary], &key[boundary + 2..]))
}

/// A stable identifier for one undirected edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct TramoId(pub u32);

impl fmt::Display for TramoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Bidirectional edge-identifier table.
///
/// # Example
///
/// ```
/// use cable_graph::TramoIndex;
///
/// let index = TramoIndex::from_value(serde_json::json!({
///     "(0.000, 0.000, 0.000)-(1.000, 0.000, 0.000)": 7
/// })).unwrap();
///
/// let id = index
///     .id_of("(1.000, 0.000, 0.000)", "(0.000, 0.000, 0.000)")
///     .unwrap();
/// assert_eq!(id.0, 7);
///
/// let (u, v) = index.edge_of(id).unwrap();
/// assert_eq!(u.key(), "(0.000, 0.000, 0.000)");
/// assert_eq!(v.key(), "(1.000, 0.000, 0.000)");
/// ```
#[derive(Debug, Clone, Default)]
pub struct TramoIndex {
    by_key: HashMap<String, TramoId>,
    by_id: HashMap<TramoId, (CanonicalPoint, CanonicalPoint)>,
}

impl TramoIndex {
    /// Builds the index from an in-memory JSON value.
    ///
    /// Keys whose two point keys are out of lexicographic order are
    /// canonicalised by swapping.
    ///
    /// # Errors
    ///
    /// [`RouteError::MappingMalformed`] on: a key that is not two canonical
    /// point keys joined by `-`, a non-positive or out-of-range id, a
    /// duplicate edge after canonicalisation, or a duplicate id.
    pub fn from_value(value: serde_json::Value) -> Result<Self, RouteError> {
        let raw: HashMap<String, i64> = serde_json::from_value(value)
            .map_err(|e| RouteError::MappingMalformed(e.to_string()))?;

        let mut by_key = HashMap::with_capacity(raw.len());
        let mut by_id = HashMap::with_capacity(raw.len());
        for (key, raw_id) in raw {
            let (left, right) = split_edge_key(&key).ok_or_else(|| {
                RouteError::MappingMalformed(format!("edge key {key:?} has no point boundary"))
            })?;
            let left = CanonicalPoint::parse(left)
                .map_err(|e| RouteError::MappingMalformed(format!("edge key {key:?}: {e}")))?;
            let right = CanonicalPoint::parse(right)
                .map_err(|e| RouteError::MappingMalformed(format!("edge key {key:?}: {e}")))?;
            if left == right {
                return Err(RouteError::MappingMalformed(format!(
                    "edge key {key:?} is a self-loop"
                )));
            }

            let id = u32::try_from(raw_id)
                .ok()
                .filter(|&id| id > 0)
                .map(TramoId)
                .ok_or_else(|| {
                    RouteError::MappingMalformed(format!(
                        "tramo id {raw_id} for {key:?} is not a positive integer"
                    ))
                })?;

            let (u, v) = if left.key() <= right.key() {
                (left, right)
            } else {
                (right, left)
            };
            let canonical = edge_key(u.key(), v.key());
            if by_key.insert(canonical.clone(), id).is_some() {
                return Err(RouteError::MappingMalformed(format!(
                    "duplicate edge {canonical:?}"
                )));
            }
            if by_id.insert(id, (u, v)).is_some() {
                return Err(RouteError::MappingMalformed(format!(
                    "tramo id {id} assigned to more than one edge"
                )));
            }
        }
        Ok(Self { by_key, by_id })
    }

    /// Parses and validates a JSON string.
    ///
    /// # Errors
    ///
    /// [`RouteError::MappingMalformed`] as for [`TramoIndex::from_value`].
    pub fn from_json_str(text: &str) -> Result<Self, RouteError> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|e| RouteError::MappingMalformed(e.to_string()))?;
        Self::from_value(value)
    }

    /// Loads and validates a tramo-id map file.
    ///
    /// # Errors
    ///
    /// [`RouteError::Io`] if the file cannot be read,
    /// [`RouteError::MappingMalformed`] on structural violations.
    pub fn from_file(path: &Path) -> Result<Self, RouteError> {
        let text = fs::read_to_string(path).map_err(|source| RouteError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// The tramo id of the unordered edge `{u, v}`, if registered.
    ///
    /// Argument order does not matter.
    #[must_use]
    pub fn id_of(&self, u: &str, v: &str) -> Option<TramoId> {
        self.by_key.get(&edge_key(u, v)).copied()
    }

    /// The unordered edge a tramo id names, smaller key first.
    ///
    /// # Errors
    ///
    /// [`RouteError::UnknownEdge`] for an unregistered id.
    pub fn edge_of(&self, id: TramoId) -> Result<(&CanonicalPoint, &CanonicalPoint), RouteError> {
        self.by_id
            .get(&id)
            .map(|(u, v)| (u, v))
            .ok_or_else(|| RouteError::UnknownEdge(format!("tramo id {id}")))
    }

    /// Number of registered edges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Parses a forbidden-sections value: a JSON array of positive tramo ids.
///
/// # Errors
///
/// [`RouteError::MappingMalformed`] on a non-array or non-positive entry.
pub fn forbidden_from_value(value: serde_json::Value) -> Result<HashSet<TramoId>, RouteError> {
    let raw: Vec<i64> =
        serde_json::from_value(value).map_err(|e| RouteError::MappingMalformed(e.to_string()))?;
    raw.into_iter()
        .map(|raw_id| {
            u32::try_from(raw_id)
                .ok()
                .filter(|&id| id > 0)
                .map(TramoId)
                .ok_or_else(|| {
                    RouteError::MappingMalformed(format!(
                        "forbidden tramo id {raw_id} is not a positive integer"
                    ))
                })
        })
        .collect()
}

/// Loads a forbidden-sections file.
///
/// # Errors
///
/// [`RouteError::Io`] if the file cannot be read,
/// [`RouteError::MappingMalformed`] on structural violations.
pub fn load_forbidden_sections(path: &Path) -> Result<HashSet<TramoId>, RouteError> {
    let text = fs::read_to_string(path).map_err(|source| RouteError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value: serde_json::Value =
        serde_json::from_str(&text).map_err(|e| RouteError::MappingMalformed(e.to_string()))?;
    forbidden_from_value(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const K0: &str = "(0.000, 0.000, 0.000)";
    const K1: &str = "(1.000, 0.000, 0.000)";
    const KN: &str = "(-1.000, 0.000, 0.000)";

    #[test]
    fn edge_key_is_symmetric() {
        assert_eq!(edge_key(K0, K1), edge_key(K1, K0));
        assert_eq!(edge_key(K0, K1), format!("{K0}-{K1}"));
    }

    #[test]
    fn splits_keys_with_negative_components() {
        let key = edge_key(K0, KN);
        let (left, right) = split_edge_key(&key).unwrap();
        assert!(CanonicalPoint::parse(left).is_ok());
        assert!(CanonicalPoint::parse(right).is_ok());
    }

    #[test]
    fn round_trips_id_and_edge() {
        let index = TramoIndex::from_value(serde_json::json!({
            format!("{K0}-{K1}"): 1,
            format!("{KN}-{K0}"): 2,
        }))
        .unwrap();
        assert_eq!(index.len(), 2);

        for raw in [1u32, 2] {
            let id = TramoId(raw);
            let (u, v) = index.edge_of(id).unwrap();
            assert_eq!(index.id_of(u.key(), v.key()), Some(id));
            assert_eq!(index.id_of(v.key(), u.key()), Some(id));
        }
    }

    #[test]
    fn canonicalises_swapped_keys() {
        // K1 > K0 lexicographically, so this key is out of order.
        let index = TramoIndex::from_value(serde_json::json!({
            format!("{K1}-{K0}"): 9,
        }))
        .unwrap();
        assert_eq!(index.id_of(K0, K1), Some(TramoId(9)));
        let (u, v) = index.edge_of(TramoId(9)).unwrap();
        assert!(u.key() <= v.key());
    }

    #[test]
    fn rejects_duplicate_after_canonicalisation() {
        let result = TramoIndex::from_value(serde_json::json!({
            format!("{K0}-{K1}"): 1,
            format!("{K1}-{K0}"): 2,
        }));
        assert!(matches!(result, Err(RouteError::MappingMalformed(_))));
    }

    #[test]
    fn rejects_duplicate_id() {
        let result = TramoIndex::from_value(serde_json::json!({
            format!("{K0}-{K1}"): 1,
            format!("{KN}-{K0}"): 1,
        }));
        assert!(result.unwrap_err().to_string().contains("more than one"));
    }

    #[test]
    fn rejects_bad_ids_and_keys() {
        for value in [
            serde_json::json!({ format!("{K0}-{K1}"): 0 }),
            serde_json::json!({ format!("{K0}-{K1}"): -3 }),
            serde_json::json!({ "(0.000, 0.000, 0.000)": 1 }),
            serde_json::json!({ "(0.0, 0.0, 0.0)-(1.000, 0.000, 0.000)": 1 }),
            serde_json::json!({ format!("{K0}-{K0}"): 1 }),
            serde_json::json!([1, 2, 3]),
        ] {
            assert!(TramoIndex::from_value(value).is_err());
        }
    }

    #[test]
    fn unknown_edge_is_internal_error() {
        let index = TramoIndex::default();
        assert!(matches!(
            index.edge_of(TramoId(5)),
            Err(RouteError::UnknownEdge(_))
        ));
        assert_eq!(index.id_of(K0, K1), None);
    }

    #[test]
    fn forbidden_sections_parse() {
        let set = forbidden_from_value(serde_json::json!([3, 5, 3])).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains(&TramoId(3)));
        assert!(set.contains(&TramoId(5)));

        assert!(forbidden_from_value(serde_json::json!([0])).is_err());
        assert!(forbidden_from_value(serde_json::json!({"a": 1})).is_err());
    }

    #[test]
    fn forbidden_sections_from_file() {
        use std::io::Write as _;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[1, 2]").unwrap();
        let set = load_forbidden_sections(file.path()).unwrap();
        assert_eq!(set.len(), 2);
    }
}
