//! Pathfinder CLI - Command-line interface for constrained path computation.

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use pathfinder::prelude::{BestPathQuery, ConstrainedQuery, MetricValue, PathError};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pathfinder")]
#[command(author, version, about = "Pathfinder - Constrained paths over network topologies", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Topology snapshot JSON (overrides pathfinder.toml)
    #[arg(short, long, global = true)]
    topology: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new Pathfinder project
    Init {
        /// Project directory (default: current directory)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Best paths between two nodes
    Paths {
        source: String,
        destination: String,

        /// Edge attribute to minimise (default: hop count)
        #[arg(short, long)]
        weight: Option<String>,

        /// Maximum paths to return (default: search.max_paths)
        #[arg(short = 'k', long)]
        max_paths: Option<usize>,

        /// Link id every path must traverse (repeatable)
        #[arg(long = "desired")]
        desired: Vec<String>,

        /// Link id no path may traverse (repeatable)
        #[arg(long = "undesired")]
        undesired: Vec<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Shortest paths under mandatory and flexible constraints
    Constrained {
        source: String,
        destination: String,

        /// Constraint every edge must satisfy, as metric=value (repeatable)
        #[arg(short, long = "mandatory", value_name = "METRIC=VALUE", value_parser = commands::constrained::parse_constraint)]
        mandatory: Vec<(String, MetricValue)>,

        /// Constraint that may be relaxed, as metric=value (repeatable)
        #[arg(short, long = "flexible", value_name = "METRIC=VALUE", value_parser = commands::constrained::parse_constraint)]
        flexible: Vec<(String, MetricValue)>,

        /// Fewest flexible constraints a path must satisfy
        #[arg(long, allow_negative_numbers = true)]
        minimum_hits: Option<i64>,

        /// Edge attribute to minimise (default: hop count)
        #[arg(short, long)]
        weight: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show the metadata of the edge between two nodes
    Metadata { a: String, b: String },

    /// Show topology statistics
    Stats,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli) {
        eprintln!("{} {:#}", "✗".red(), err);
        std::process::exit(exit_code(&err));
    }
}

fn run(cli: Cli) -> Result<()> {
    let topology = cli.topology.as_deref();

    match cli.command {
        Commands::Init { path } => commands::init::run(path),
        Commands::Paths {
            source,
            destination,
            weight,
            max_paths,
            desired,
            undesired,
            json,
        } => {
            let mut query = BestPathQuery::new(source, destination);
            query.weight = weight;
            query.max_paths = max_paths;
            query.preferences.desired = desired;
            query.preferences.undesired = undesired;
            commands::paths::run(topology, &query, json)
        }
        Commands::Constrained {
            source,
            destination,
            mandatory,
            flexible,
            minimum_hits,
            weight,
            json,
        } => {
            let mut query = ConstrainedQuery::new(source, destination);
            query.mandatory = mandatory.into_iter().collect();
            query.flexible = flexible.into_iter().collect();
            query.minimum_hits = minimum_hits;
            query.weight = weight;
            commands::constrained::run(topology, &query, json)
        }
        Commands::Metadata { a, b } => commands::metadata::run(topology, &a, &b),
        Commands::Stats => commands::stats::run(topology),
    }
}

/// 2 for bad input, 1 for everything else.
fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<PathError>() {
        Some(e) if e.is_client_error() => 2,
        _ => 1,
    }
}
