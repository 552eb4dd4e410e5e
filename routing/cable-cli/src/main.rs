//! `cableroute` - constrained shortest paths over dual-system cable graphs.
//!
//! Subcommands:
//!
//! - `direct`: source to destination
//! - `ppo`: via one mandatory waypoint
//! - `multi-ppo`: via several mandatory waypoints, in order
//! - `forward-path`: like `ppo`, forbidding U-turns at the waypoint
//! - `optimal`: compare both orderings of two waypoints
//! - `diagnose`: locate endpoints across graph files and recommend cables
//!
//! Exit codes: 0 success, 1 pathfinding failure, 2 bad arguments (clap),
//! 3 malformed input file.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use cable_types::CableClass;

mod commands;
mod report;

/// Constrained shortest-path routing over dual-system cable graphs.
#[derive(Parser)]
#[command(name = "cableroute", version, about)]
struct Cli {
    /// Verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

/// Cable class selector.
#[derive(Debug, Clone, Copy, ValueEnum)]
#[value(rename_all = "UPPER")]
enum CableArg {
    /// System A only
    A,
    /// System B only
    B,
    /// Both systems
    C,
}

impl From<CableArg> for CableClass {
    fn from(value: CableArg) -> Self {
        match value {
            CableArg::A => Self::A,
            CableArg::B => Self::B,
            CableArg::C => Self::C,
        }
    }
}

/// Options shared by every pathfinding subcommand.
#[derive(Debug, Args)]
struct RouteOpts {
    /// Cable class that dictates which system(s) may be used
    #[arg(long, value_enum, ignore_case = true)]
    cable: CableArg,

    /// Tramo-id mapping JSON file (required for forbidden sections)
    #[arg(long = "tramo-map")]
    tramo_map: Option<PathBuf>,

    /// Forbidden-sections JSON file (a list of tramo ids)
    #[arg(long)]
    forbidden: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Direct pathfinding between two points
    Direct {
        /// Tagged graph JSON file
        graph: PathBuf,
        /// Source and destination as six decimal numbers
        #[arg(value_names = ["SRC_X", "SRC_Y", "SRC_Z", "DST_X", "DST_Y", "DST_Z"],
              num_args = 6)]
        coords: Vec<f64>,
        #[command(flatten)]
        opts: RouteOpts,
    },

    /// Pathfinding through one mandatory waypoint
    Ppo {
        /// Tagged graph JSON file
        graph: PathBuf,
        /// Source, waypoint, and destination as nine decimal numbers
        #[arg(value_names = ["SRC_X", "SRC_Y", "SRC_Z", "PPO_X", "PPO_Y", "PPO_Z",
                             "DST_X", "DST_Y", "DST_Z"],
              num_args = 9)]
        coords: Vec<f64>,
        #[command(flatten)]
        opts: RouteOpts,
    },

    /// Pathfinding through several mandatory waypoints, in order
    #[command(name = "multi-ppo")]
    MultiPpo {
        /// Tagged graph JSON file
        graph: PathBuf,
        /// Source and destination as six decimal numbers
        #[arg(value_names = ["SRC_X", "SRC_Y", "SRC_Z", "DST_X", "DST_Y", "DST_Z"],
              num_args = 6)]
        coords: Vec<f64>,
        /// A mandatory waypoint; repeat for several, visited in order
        #[arg(long = "ppo", value_names = ["X", "Y", "Z"], num_args = 3,
              action = clap::ArgAction::Append, required = true)]
        ppos: Vec<f64>,
        #[command(flatten)]
        opts: RouteOpts,
    },

    /// Like `ppo`, but the waypoint cannot be left over its arrival edge
    #[command(name = "forward-path")]
    ForwardPath {
        /// Tagged graph JSON file
        graph: PathBuf,
        /// Source, waypoint, and destination as nine decimal numbers
        #[arg(value_names = ["SRC_X", "SRC_Y", "SRC_Z", "PPO_X", "PPO_Y", "PPO_Z",
                             "DST_X", "DST_Y", "DST_Z"],
              num_args = 9)]
        coords: Vec<f64>,
        #[command(flatten)]
        opts: RouteOpts,
    },

    /// Compare both orderings of two mandatory waypoints
    Optimal {
        /// Tagged graph JSON file
        graph: PathBuf,
        /// Source, two waypoints, and destination as twelve decimal numbers
        #[arg(value_names = ["SRC_X", "SRC_Y", "SRC_Z", "PPO1_X", "PPO1_Y", "PPO1_Z",
                             "PPO2_X", "PPO2_Y", "PPO2_Z", "DST_X", "DST_Y", "DST_Z"],
              num_args = 12)]
        coords: Vec<f64>,
        #[command(flatten)]
        opts: RouteOpts,
    },

    /// Locate two endpoints across graph files and recommend cables
    Diagnose {
        /// Source and destination as six decimal numbers
        #[arg(value_names = ["SRC_X", "SRC_Y", "SRC_Z", "DST_X", "DST_Y", "DST_Z"],
              num_args = 6)]
        coords: Vec<f64>,
        /// Graph files to check
        #[arg(required = true)]
        graphs: Vec<PathBuf>,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Err(failure) = commands::run(cli.command) {
        eprintln!("{failure}");
        std::process::exit(failure.exit_code());
    }
}
