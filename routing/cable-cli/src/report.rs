//! Human-readable rendering of routing outcomes.

use std::fmt;

use cable_pathfind::{
    DiagnosisOutcome, EndpointDiagnosis, EndpointPresence, OrderingChoice, OrderingComparison,
    RouteFailure,
};
use cable_types::{CableClass, RouteSolution};

fn systems_of(cable: CableClass) -> String {
    let names: Vec<String> = cable.permitted().iter().map(ToString::to_string).collect();
    names.join(", ")
}

/// Prints a successful route: totals first, then the segment breakdown.
pub fn print_solution(solution: &RouteSolution, cable: CableClass) {
    println!("Path found: {} points", solution.point_count());
    println!("Total distance: {:.3} units", solution.length());
    println!("Nodes explored: {}", solution.nodes_explored());
    println!("Cable {cable} (systems: {})", systems_of(cable));
    if solution.segments().len() > 1 {
        println!("Segments:");
        for segment in solution.segments() {
            println!(
                "  {}: {} -> {}  ({} points, {} nodes explored)",
                segment.segment, segment.from, segment.to, segment.points, segment.nodes_explored
            );
        }
    }
}

/// Prints the outcome of an `optimal` ordering comparison.
pub fn print_comparison(comparison: &OrderingComparison, cable: CableClass) {
    for (label, attempt) in [
        ("order 1 (src -> ppo1 -> ppo2 -> dst)", &comparison.original),
        ("order 2 (src -> ppo2 -> ppo1 -> dst)", &comparison.swapped),
    ] {
        match attempt {
            Ok(solution) => println!(
                "{label}: {} points, {:.3} units, {} nodes explored",
                solution.point_count(),
                solution.length(),
                solution.nodes_explored()
            ),
            Err(error) => println!("{label}: failed ({error})"),
        }
    }
    match comparison.choice() {
        Some(OrderingChoice::Original) => println!("Order 1 is optimal"),
        Some(OrderingChoice::Swapped) => println!("Order 2 is optimal"),
        Some(OrderingChoice::Tie) => println!("Both orders have identical length"),
        None => println!("Both orders failed"),
    }
    if let Some(improvement) = comparison.improvement() {
        if improvement > 0.0 {
            println!("Improvement: {improvement:.3} units");
        }
    }
    if let Some(best) = comparison.best() {
        print_solution(best, cable);
    }
}

fn write_presence(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    presence: &EndpointPresence,
) -> fmt::Result {
    if presence.found_in.is_empty() {
        writeln!(f, "  {label} {}: not found in any graph", presence.point)?;
    } else {
        writeln!(f, "  {label} {}:", presence.point)?;
        for entry in &presence.found_in {
            writeln!(f, "    {} (system {})", entry.file.display(), entry.tag)?;
        }
    }
    Ok(())
}

fn write_diagnosis(f: &mut fmt::Formatter<'_>, findings: &EndpointDiagnosis) -> fmt::Result {
    writeln!(f, "Endpoint analysis:")?;
    write_presence(f, "source", &findings.source)?;
    write_presence(f, "destination", &findings.destination)?;
    match findings.outcome() {
        DiagnosisOutcome::NeitherFound => writeln!(f, "  neither endpoint found")?,
        DiagnosisOutcome::OnlySourceFound => writeln!(f, "  only the source was found")?,
        DiagnosisOutcome::OnlyDestinationFound => writeln!(f, "  only the destination was found")?,
        DiagnosisOutcome::BothFound => {
            let cables: Vec<String> = findings
                .recommended_cables
                .iter()
                .map(ToString::to_string)
                .collect();
            if cables.is_empty() {
                writeln!(f, "  no single graph contains both endpoints")?;
            } else {
                writeln!(f, "  recommended cables: {}", cables.join(", "))?;
                for graph in &findings.recommended_graphs {
                    writeln!(f, "  recommended graph: {}", graph.display())?;
                }
            }
        }
    }
    if let Some(command) = &findings.suggested_command {
        writeln!(f, "  try: {command}")?;
    }
    Ok(())
}

/// Writes a failure and any attached diagnosis.
pub fn render_failure(f: &mut fmt::Formatter<'_>, failure: &RouteFailure) -> fmt::Result {
    writeln!(f, "error: {}", failure.error)?;
    if let Some(findings) = &failure.diagnosis {
        write_diagnosis(f, findings)?;
    }
    Ok(())
}

/// Prints standalone `diagnose` findings.
pub fn print_diagnosis(findings: &EndpointDiagnosis) {
    struct Wrapper<'a>(&'a EndpointDiagnosis);
    impl fmt::Display for Wrapper<'_> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write_diagnosis(f, self.0)
        }
    }
    print!("{}", Wrapper(findings));
}
