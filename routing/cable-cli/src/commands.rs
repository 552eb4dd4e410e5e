//! Subcommand execution.

use std::path::{Path, PathBuf};

use cable_pathfind::{diagnose_endpoints, RouteFailure, SystemRouter};
use cable_types::{CableClass, CanonicalPoint, RouteError};

use crate::report;
use crate::{Command, RouteOpts};

/// A failed run, carrying everything the reporter needs and the process
/// exit code.
#[derive(Debug)]
pub struct CommandFailure(RouteFailure);

impl CommandFailure {
    /// 1 for pathfinding failures, 3 for malformed or unreadable inputs.
    pub fn exit_code(&self) -> i32 {
        if self.0.error.is_routing_failure() {
            1
        } else {
            3
        }
    }
}

impl std::fmt::Display for CommandFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        report::render_failure(f, &self.0)
    }
}

impl From<RouteError> for CommandFailure {
    fn from(error: RouteError) -> Self {
        Self(RouteFailure {
            error,
            diagnosis: None,
        })
    }
}

impl From<RouteFailure> for CommandFailure {
    fn from(failure: RouteFailure) -> Self {
        Self(failure)
    }
}

fn point(coords: &[f64]) -> Result<CanonicalPoint, CommandFailure> {
    Ok(CanonicalPoint::new(coords[0], coords[1], coords[2])?)
}

fn points(coords: &[f64]) -> Result<Vec<CanonicalPoint>, CommandFailure> {
    coords.chunks(3).map(point).collect()
}

fn load_router(graph: &Path, opts: &RouteOpts) -> Result<SystemRouter, CommandFailure> {
    Ok(SystemRouter::from_files(
        graph,
        opts.tramo_map.as_deref(),
        opts.forbidden.as_deref(),
    )?)
}

fn run_route(
    graph: &Path,
    opts: &RouteOpts,
    src: &CanonicalPoint,
    ppos: &[CanonicalPoint],
    dst: &CanonicalPoint,
    forward_path: bool,
) -> Result<(), CommandFailure> {
    let router = load_router(graph, opts)?;
    let cable = CableClass::from(opts.cable);
    let candidates = [graph.to_path_buf()];
    let solution = router.route_diagnosed(cable, src, ppos, dst, forward_path, &candidates)?;
    report::print_solution(&solution, cable);
    Ok(())
}

/// Dispatches a parsed command line.
pub fn run(command: Command) -> Result<(), CommandFailure> {
    match command {
        Command::Direct {
            graph,
            coords,
            opts,
        } => {
            let src = point(&coords[0..3])?;
            let dst = point(&coords[3..6])?;
            run_route(&graph, &opts, &src, &[], &dst, false)
        }

        Command::Ppo {
            graph,
            coords,
            opts,
        } => {
            let src = point(&coords[0..3])?;
            let ppo = point(&coords[3..6])?;
            let dst = point(&coords[6..9])?;
            run_route(&graph, &opts, &src, &[ppo], &dst, false)
        }

        Command::MultiPpo {
            graph,
            coords,
            ppos,
            opts,
        } => {
            let src = point(&coords[0..3])?;
            let dst = point(&coords[3..6])?;
            let ppos = points(&ppos)?;
            run_route(&graph, &opts, &src, &ppos, &dst, false)
        }

        Command::ForwardPath {
            graph,
            coords,
            opts,
        } => {
            let src = point(&coords[0..3])?;
            let ppo = point(&coords[3..6])?;
            let dst = point(&coords[6..9])?;
            run_route(&graph, &opts, &src, &[ppo], &dst, true)
        }

        Command::Optimal {
            graph,
            coords,
            opts,
        } => {
            let src = point(&coords[0..3])?;
            let p1 = point(&coords[3..6])?;
            let p2 = point(&coords[6..9])?;
            let dst = point(&coords[9..12])?;
            let router = load_router(&graph, &opts)?;
            let cable = CableClass::from(opts.cable);
            let comparison = router.optimal_order(cable, &src, &p1, &p2, &dst);
            report::print_comparison(&comparison, cable);
            if comparison.best().is_none() {
                // Both orderings failed; surface the first one's error.
                if let Err(error) = comparison.original {
                    return Err(error.into());
                }
            }
            Ok(())
        }

        Command::Diagnose { coords, graphs } => run_diagnose(&coords, &graphs),
    }
}

fn run_diagnose(coords: &[f64], graphs: &[PathBuf]) -> Result<(), CommandFailure> {
    let src = point(&coords[0..3])?;
    let dst = point(&coords[3..6])?;
    let findings = diagnose_endpoints(&src, &dst, graphs);
    report::print_diagnosis(&findings);
    Ok(())
}
