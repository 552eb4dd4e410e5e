//! Endpoint diagnosis across a pool of graph files.
//!
//! When a routing call fails because an endpoint is missing or sits in a
//! subsystem the cable may not enter, the diagnoser answers the questions a
//! user asks next: *which graphs contain my endpoints, what are they tagged,
//! and which cable and graph would work?*
//!
//! The diagnoser never attempts pathfinding; it reports presence, tags, and
//! policy-level recommendations only.

use std::path::{Path, PathBuf};

use cable_graph::TaggedGraph;
use cable_types::{CableClass, CanonicalPoint, Subsystem};

/// Presence of one endpoint in one candidate graph.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphPresence {
    /// The candidate graph file.
    pub file: PathBuf,
    /// The endpoint's subsystem tag in that graph.
    pub tag: Subsystem,
}

/// Where one endpoint was found across the candidate pool.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointPresence {
    /// The endpoint itself.
    pub point: CanonicalPoint,
    /// Every candidate graph containing the endpoint, in candidate order.
    pub found_in: Vec<GraphPresence>,
}

impl EndpointPresence {
    /// Whether any candidate graph contains the endpoint.
    #[must_use]
    pub fn is_found(&self) -> bool {
        !self.found_in.is_empty()
    }
}

/// Overall shape of a diagnosis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosisOutcome {
    /// Both endpoints exist in at least one candidate graph each.
    BothFound,
    /// Only the source was found.
    OnlySourceFound,
    /// Only the destination was found.
    OnlyDestinationFound,
    /// Neither endpoint was found anywhere.
    NeitherFound,
}

/// Structured findings for a pair of endpoints across candidate graphs.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointDiagnosis {
    /// Source presence table.
    pub source: EndpointPresence,
    /// Destination presence table.
    pub destination: EndpointPresence,
    /// Graphs containing both endpoints, in candidate order.
    pub recommended_graphs: Vec<PathBuf>,
    /// Cables admitting both endpoint tags in some recommended graph,
    /// sorted ascending.
    pub recommended_cables: Vec<CableClass>,
    /// A ready-to-run command line, when a recommendation exists.
    pub suggested_command: Option<String>,
}

impl EndpointDiagnosis {
    /// Classifies the findings.
    #[must_use]
    pub fn outcome(&self) -> DiagnosisOutcome {
        match (self.source.is_found(), self.destination.is_found()) {
            (true, true) => DiagnosisOutcome::BothFound,
            (true, false) => DiagnosisOutcome::OnlySourceFound,
            (false, true) => DiagnosisOutcome::OnlyDestinationFound,
            (false, false) => DiagnosisOutcome::NeitherFound,
        }
    }
}

fn format_coords(point: &CanonicalPoint) -> String {
    format!("{:.3} {:.3} {:.3}", point.x(), point.y(), point.z())
}

/// Checks both endpoints against every candidate graph and derives cable
/// and graph recommendations.
///
/// Candidates that cannot be loaded are skipped.
///
/// # Example
///
/// ```no_run
/// use cable_pathfind::diagnose_endpoints;
/// use cable_types::CanonicalPoint;
/// use std::path::PathBuf;
///
/// let src = CanonicalPoint::new(0.0, 0.0, 0.0).unwrap();
/// let dst = CanonicalPoint::new(3.0, 0.0, 0.0).unwrap();
/// let findings = diagnose_endpoints(
///     &src,
///     &dst,
///     &[PathBuf::from("graph_LV1A.json"), PathBuf::from("graph_LV1B.json")],
/// );
/// println!("{:?}", findings.recommended_cables);
/// ```
#[must_use]
pub fn diagnose_endpoints(
    src: &CanonicalPoint,
    dst: &CanonicalPoint,
    candidates: &[PathBuf],
) -> EndpointDiagnosis {
    let mut source = EndpointPresence {
        point: src.clone(),
        found_in: Vec::new(),
    };
    let mut destination = EndpointPresence {
        point: dst.clone(),
        found_in: Vec::new(),
    };
    let mut recommended_graphs = Vec::new();
    let mut recommended_cables = Vec::new();

    for file in candidates {
        let graph = match TaggedGraph::from_file(file) {
            Ok(graph) => graph,
            Err(error) => {
                tracing::debug!(file = %file.display(), %error, "skipping unreadable candidate");
                continue;
            }
        };
        let src_tag = graph.vertex_tag(src.key());
        let dst_tag = graph.vertex_tag(dst.key());
        if let Some(tag) = src_tag {
            source.found_in.push(GraphPresence {
                file: file.clone(),
                tag,
            });
        }
        if let Some(tag) = dst_tag {
            destination.found_in.push(GraphPresence {
                file: file.clone(),
                tag,
            });
        }
        if let (Some(src_tag), Some(dst_tag)) = (src_tag, dst_tag) {
            recommended_graphs.push(file.clone());
            for cable in CableClass::connecting(src_tag, dst_tag) {
                if !recommended_cables.contains(&cable) {
                    recommended_cables.push(cable);
                }
            }
        }
    }
    recommended_cables.sort_unstable();

    let suggested_command = match (recommended_graphs.first(), recommended_cables.first()) {
        (Some(graph), Some(cable)) => Some(format!(
            "cableroute direct {} {} {} --cable {cable}",
            graph.display(),
            format_coords(src),
            format_coords(dst),
        )),
        _ => None,
    };

    EndpointDiagnosis {
        source,
        destination,
        recommended_graphs,
        recommended_cables,
        suggested_command,
    }
}

/// Convenience wrapper accepting plain paths.
#[must_use]
pub fn diagnose_endpoint_files(
    src: &CanonicalPoint,
    dst: &CanonicalPoint,
    candidates: &[&Path],
) -> EndpointDiagnosis {
    let owned: Vec<PathBuf> = candidates.iter().map(|p| p.to_path_buf()).collect();
    diagnose_endpoints(src, dst, &owned)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn p(x: f64) -> CanonicalPoint {
        CanonicalPoint::new(x, 0.0, 0.0).unwrap()
    }

    fn write_graph(json: serde_json::Value) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{json}").unwrap();
        file
    }

    /// G1 holds the source only (tag A); G2 holds both (A and B).
    fn two_graph_pool() -> (tempfile::NamedTempFile, tempfile::NamedTempFile) {
        let g1 = write_graph(serde_json::json!({
            "nodes": { "(0.000, 0.000, 0.000)": { "sys": "A" } },
            "edges": []
        }));
        let g2 = write_graph(serde_json::json!({
            "nodes": {
                "(0.000, 0.000, 0.000)": { "sys": "A" },
                "(3.000, 0.000, 0.000)": { "sys": "B" },
            },
            "edges": []
        }));
        (g1, g2)
    }

    #[test]
    fn reports_presence_per_graph() {
        let (g1, g2) = two_graph_pool();
        let candidates = vec![g1.path().to_path_buf(), g2.path().to_path_buf()];
        let findings = diagnose_endpoints(&p(0.0), &p(3.0), &candidates);

        assert_eq!(findings.outcome(), DiagnosisOutcome::BothFound);
        assert_eq!(findings.source.found_in.len(), 2);
        assert_eq!(findings.destination.found_in.len(), 1);
        assert_eq!(findings.destination.found_in[0].tag, Subsystem::B);
        assert_eq!(findings.recommended_graphs, vec![g2.path().to_path_buf()]);
        // A-to-B needs cable C.
        assert_eq!(findings.recommended_cables, vec![CableClass::C]);
    }

    #[test]
    fn suggests_a_runnable_command() {
        let (g1, g2) = two_graph_pool();
        let candidates = vec![g1.path().to_path_buf(), g2.path().to_path_buf()];
        let findings = diagnose_endpoints(&p(0.0), &p(3.0), &candidates);

        let command = findings.suggested_command.unwrap();
        assert!(command.starts_with("cableroute direct "));
        assert!(command.contains("--cable C"));
        assert!(command.contains("0.000 0.000 0.000"));
        assert!(command.contains("3.000 0.000 0.000"));
    }

    #[test]
    fn neither_endpoint_found() {
        let (g1, _g2) = two_graph_pool();
        let candidates = vec![g1.path().to_path_buf()];
        let findings = diagnose_endpoints(&p(7.0), &p(8.0), &candidates);
        assert_eq!(findings.outcome(), DiagnosisOutcome::NeitherFound);
        assert!(findings.recommended_cables.is_empty());
        assert!(findings.suggested_command.is_none());
    }

    #[test]
    fn only_source_found() {
        let (g1, _g2) = two_graph_pool();
        let candidates = vec![g1.path().to_path_buf()];
        let findings = diagnose_endpoints(&p(0.0), &p(3.0), &candidates);
        assert_eq!(findings.outcome(), DiagnosisOutcome::OnlySourceFound);
        assert!(findings.recommended_graphs.is_empty());
    }

    #[test]
    fn unreadable_candidates_are_skipped() {
        let (g1, g2) = two_graph_pool();
        let candidates = vec![
            PathBuf::from("/nonexistent/graph.json"),
            g1.path().to_path_buf(),
            g2.path().to_path_buf(),
        ];
        let findings = diagnose_endpoints(&p(0.0), &p(3.0), &candidates);
        assert_eq!(findings.outcome(), DiagnosisOutcome::BothFound);
    }

    #[test]
    fn same_system_endpoints_recommend_two_cables() {
        let g = write_graph(serde_json::json!({
            "nodes": {
                "(0.000, 0.000, 0.000)": { "sys": "A" },
                "(1.000, 0.000, 0.000)": { "sys": "A" },
            },
            "edges": []
        }));
        let candidates = vec![g.path().to_path_buf()];
        let findings = diagnose_endpoints(&p(0.0), &p(1.0), &candidates);
        assert_eq!(
            findings.recommended_cables,
            vec![CableClass::A, CableClass::C]
        );
    }
}
